//! Isometric placement: evenly spaced points, balanced shuffled images.
use glam::IVec2;
use rand::Rng;

use crate::path::Path;
use crate::sampling::{center_points, evenly_spaced_indices, shuffle, PlacementPolicy};

/// Evenly spaced points along the path; images cycle through the pool and the
/// cycle is shuffled, so every image is used a near-equal number of times.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsometricPolicy;

impl PlacementPolicy for IsometricPolicy {
    fn select_points(&self, path: &Path, count: usize, _rng: &mut dyn Rng) -> Vec<IVec2> {
        if path.is_empty() {
            return center_points(path, count);
        }
        let points = path.points();
        evenly_spaced_indices(points.len(), count)
            .into_iter()
            .map(|i| points[i])
            .collect()
    }

    fn assign_images(&self, pool_len: usize, count: usize, rng: &mut dyn Rng) -> Vec<usize> {
        if pool_len == 0 {
            return Vec::new();
        }
        let mut out: Vec<usize> = (0..count).map(|i| i % pool_len).collect();
        shuffle(&mut out, rng);
        out
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn points_are_evenly_spaced() {
        let path = Path::new((0..101).map(|x| IVec2::new(x, 0)).collect(), 101, 1);
        let mut rng = StdRng::seed_from_u64(0);
        let pts = IsometricPolicy.select_points(&path, 5, &mut rng);
        assert_eq!(
            pts.iter().map(|p| p.x).collect::<Vec<_>>(),
            vec![0, 25, 50, 75, 100]
        );
    }

    #[test]
    fn image_usage_is_balanced() {
        let mut rng = StdRng::seed_from_u64(7);
        let assigned = IsometricPolicy.assign_images(3, 10, &mut rng);
        let mut uses = [0usize; 3];
        for i in &assigned {
            uses[*i] += 1;
        }
        let mut sorted = uses;
        sorted.sort_unstable();
        assert_eq!(sorted, [3, 3, 4]);
    }

    #[test]
    fn point_choice_ignores_the_rng() {
        let path = Path::new((0..9).map(|x| IVec2::new(x, 0)).collect(), 9, 1);
        let a = IsometricPolicy.select_points(&path, 4, &mut StdRng::seed_from_u64(1));
        let b = IsometricPolicy.select_points(&path, 4, &mut StdRng::seed_from_u64(2));
        assert_eq!(a, b);
    }
}
