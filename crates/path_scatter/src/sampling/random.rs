//! Random placement: seeded draws for both points and images.
use glam::IVec2;
use rand::Rng;

use crate::path::Path;
use crate::sampling::{
    center_points, rand_index, sample_without_replacement, shuffle, PlacementPolicy,
};

/// Draws points without replacement when the path is long enough, with
/// replacement otherwise.
///
/// Images are assigned in shuffled rounds: each complete round is a
/// permutation of the whole pool, so with a pool smaller than the placement
/// count every image appears once before any image appears twice.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPolicy;

impl PlacementPolicy for RandomPolicy {
    fn select_points(&self, path: &Path, count: usize, rng: &mut dyn Rng) -> Vec<IVec2> {
        let points = path.points();
        if points.is_empty() {
            return center_points(path, count);
        }

        if points.len() >= count {
            sample_without_replacement(points.len(), count, rng)
                .into_iter()
                .map(|i| points[i])
                .collect()
        } else {
            (0..count)
                .map(|_| points[rand_index(rng, points.len())])
                .collect()
        }
    }

    fn assign_images(&self, pool_len: usize, count: usize, rng: &mut dyn Rng) -> Vec<usize> {
        if pool_len == 0 {
            return Vec::new();
        }
        if pool_len >= count {
            return sample_without_replacement(pool_len, count, rng);
        }

        let mut out = Vec::with_capacity(count);
        while out.len() + pool_len <= count {
            let mut round: Vec<usize> = (0..pool_len).collect();
            shuffle(&mut round, rng);
            out.extend(round);
        }
        let rest = count - out.len();
        out.extend(sample_without_replacement(pool_len, rest, rng));
        out
    }
}
