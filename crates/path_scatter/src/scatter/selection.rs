//! Image selection over a concrete candidate pool.
use image::RgbaImage;
use rand::Rng;

use crate::error::{Error, Result};
use crate::sampling::PlacementPolicy;

/// Images chosen for each placement, paired with their pool indices.
#[derive(Debug, Clone)]
pub struct ImageSelection<'a> {
    pub images: Vec<&'a RgbaImage>,
    pub assignment: Vec<usize>,
}

impl ImageSelection<'_> {
    pub fn len(&self) -> usize {
        self.assignment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignment.is_empty()
    }

    /// Number of distinct pool entries used.
    pub fn distinct(&self) -> usize {
        let mut seen = self.assignment.clone();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }
}

/// Assign one pool image to each of `count` placements using `policy`.
///
/// An empty pool is a caller error.
pub fn select_images<'a>(
    pool: &'a [RgbaImage],
    count: usize,
    policy: &dyn PlacementPolicy,
    rng: &mut dyn Rng,
) -> Result<ImageSelection<'a>> {
    if pool.is_empty() {
        return Err(Error::EmptyImagePool);
    }

    let assignment = policy.assign_images(pool.len(), count, rng);
    if assignment.len() != count || assignment.iter().any(|&i| i >= pool.len()) {
        return Err(Error::Other(format!(
            "placement policy assigned {} images for {} placements from a pool of {}",
            assignment.len(),
            count,
            pool.len()
        )));
    }

    let images = assignment.iter().map(|&i| &pool[i]).collect();
    Ok(ImageSelection { images, assignment })
}

#[cfg(test)]
mod tests {
    use image::Rgba;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::sampling::PlacementMode;

    fn swatch(v: u8) -> RgbaImage {
        RgbaImage::from_pixel(2, 2, Rgba([v, v, v, 255]))
    }

    #[test]
    fn empty_pool_is_an_error() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = select_images(&[], 3, PlacementMode::Random.policy(), &mut rng).unwrap_err();
        assert!(matches!(err, Error::EmptyImagePool));
    }

    #[test]
    fn images_follow_assignment() {
        let pool = vec![swatch(1), swatch(2), swatch(3)];
        let mut rng = StdRng::seed_from_u64(0);
        let sel = select_images(&pool, 5, PlacementMode::Sequential.policy(), &mut rng).unwrap();
        assert_eq!(sel.assignment, vec![0, 1, 2, 0, 1]);
        assert_eq!(sel.images[3].get_pixel(0, 0)[0], 1);
        assert_eq!(sel.distinct(), 3);
    }

    #[test]
    fn random_mode_uses_each_image_once_when_pool_matches_count() {
        let pool: Vec<RgbaImage> = (0..5).map(swatch).collect();
        let mut rng = StdRng::seed_from_u64(42);
        let sel = select_images(&pool, 5, PlacementMode::Random.policy(), &mut rng).unwrap();
        assert_eq!(sel.len(), 5);
        assert_eq!(sel.distinct(), 5);
    }
}
