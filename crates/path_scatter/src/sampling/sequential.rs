//! Sequential placement: evenly spaced points, pool order preserved.
use glam::IVec2;
use rand::Rng;

use crate::path::Path;
use crate::sampling::{center_points, evenly_spaced_indices, PlacementPolicy};

/// Evenly spaced points along the path, image `i % pool_len` at placement `i`.
///
/// Fully deterministic; the RNG is never read.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialPolicy;

impl PlacementPolicy for SequentialPolicy {
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

    fn assign_images(&self, pool_len: usize, count: usize, _rng: &mut dyn Rng) -> Vec<usize> {
        if pool_len == 0 {
            return Vec::new();
        }
        (0..count).map(|i| i % pool_len).collect()
    }
}
