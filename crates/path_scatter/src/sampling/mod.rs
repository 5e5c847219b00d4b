//! Placement policies: which path points receive an image, and which image each
//! point receives.
//!
//! A [`PlacementPolicy`] answers both questions so the point choice and the image
//! assignment of one mode cannot drift apart. [`PlacementMode`] names the three
//! built-in policies. All randomness is drawn from the caller's RNG through the
//! helpers in this module, so results are reproducible for a fixed seed.
use std::fmt;
use std::str::FromStr;

use glam::IVec2;
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::path::Path;

pub mod isometric;
pub mod random;
pub mod sequential;

pub use isometric::IsometricPolicy;
pub use random::RandomPolicy;
pub use sequential::SequentialPolicy;

/// Strategy for choosing placement points and assigning images to them.
pub trait PlacementPolicy: Send + Sync {
    /// Pick exactly `count` points from `path`.
    fn select_points(&self, path: &Path, count: usize, rng: &mut dyn Rng) -> Vec<IVec2>;

    /// Assign an index into a pool of `pool_len` images to each of `count` placements.
    ///
    /// Returns an empty vector when `pool_len` is zero.
    fn assign_images(&self, pool_len: usize, count: usize, rng: &mut dyn Rng) -> Vec<usize>;
}

/// Named placement modes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PlacementMode {
    #[default]
    Random,
    Isometric,
    Sequential,
}

static RANDOM: RandomPolicy = RandomPolicy;
static ISOMETRIC: IsometricPolicy = IsometricPolicy;
static SEQUENTIAL: SequentialPolicy = SequentialPolicy;

impl PlacementMode {
    pub const ALL: [PlacementMode; 3] = [
        PlacementMode::Random,
        PlacementMode::Isometric,
        PlacementMode::Sequential,
    ];

    /// The policy implementing this mode.
    pub fn policy(self) -> &'static dyn PlacementPolicy {
        match self {
            PlacementMode::Random => &RANDOM,
            PlacementMode::Isometric => &ISOMETRIC,
            PlacementMode::Sequential => &SEQUENTIAL,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PlacementMode::Random => "random",
            PlacementMode::Isometric => "isometric",
            PlacementMode::Sequential => "sequential",
        }
    }
}

impl fmt::Display for PlacementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlacementMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlacementMode::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidConfig(format!("unknown placement mode '{s}'")))
    }
}

/// Generate a random float in the range [0, 1].
#[inline]
pub(crate) fn rand01(rng: &mut dyn Rng) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Uniform float in `[lo, hi]`. Always consumes one draw so the stream position
/// does not depend on the range.
#[inline]
pub(crate) fn rand_range(rng: &mut dyn Rng, lo: f32, hi: f32) -> f32 {
    let u = rand01(rng);
    if hi <= lo {
        return lo;
    }
    (lo + u * (hi - lo)).min(hi)
}

/// Uniform index in `0..n`. `n` must be non-zero.
#[inline]
pub(crate) fn rand_index(rng: &mut dyn Rng, n: usize) -> usize {
    debug_assert!(n > 0, "rand_index needs a non-empty range");
    (((rng.next_u64() as u128) * (n as u128)) >> 64) as usize
}

/// In-place Fisher–Yates shuffle.
pub(crate) fn shuffle<T>(items: &mut [T], rng: &mut dyn Rng) {
    for i in (1..items.len()).rev() {
        let j = rand_index(rng, i + 1);
        items.swap(i, j);
    }
}

/// `k` distinct indices from `0..n` in random order. `k` is capped at `n`.
pub(crate) fn sample_without_replacement(n: usize, k: usize, rng: &mut dyn Rng) -> Vec<usize> {
    let k = k.min(n);
    let mut pool: Vec<usize> = (0..n).collect();
    for i in 0..k {
        let j = i + rand_index(rng, n - i);
        pool.swap(i, j);
    }
    pool.truncate(k);
    pool
}

/// `count` indices spread evenly over `0..len`, endpoints included.
///
/// When the path is shorter than `count`, indices cycle (`i % len`) so points
/// repeat rather than run out.
pub fn evenly_spaced_indices(len: usize, count: usize) -> Vec<usize> {
    if len == 0 || count == 0 {
        return Vec::new();
    }
    if len < count {
        return (0..count).map(|i| i % len).collect();
    }
    if count == 1 {
        return vec![0];
    }
    let span = len - 1;
    let steps = count - 1;
    (0..count)
        .map(|i| (i * span + steps / 2) / steps)
        .collect()
}

/// Points used when a path is unexpectedly empty: the image center, repeated.
pub(crate) fn center_points(path: &Path, count: usize) -> Vec<IVec2> {
    vec![path.center(); count]
}


#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::test_support::FixedRng;
    use super::*;

    #[test]
    fn rand01_returns_zero_for_zero_input() {
        let mut rng = FixedRng { value: 0 };
        assert_eq!(rand01(&mut rng), 0.0);
    }

    #[test]
    fn rand01_reaches_one_for_max_input() {
        // f32 rounding makes the top of the u32 range land on 1.0 exactly.
        let mut rng = FixedRng { value: u32::MAX };
        assert_eq!(rand01(&mut rng), 1.0);
    }

    #[test]
    fn rand01_values_in_range() {
        for value in [0, 1, 100, u32::MAX / 2, u32::MAX - 1, u32::MAX] {
            let mut rng = FixedRng { value };
            let result = rand01(&mut rng);
            assert!(
                (0.0..=1.0).contains(&result),
                "rand01({}) = {} is out of range [0,1]",
                value,
                result
            );
        }
    }

    #[test]
    fn rand_range_handles_degenerate_ranges() {
        let mut rng = FixedRng { value: u32::MAX };
        assert_eq!(rand_range(&mut rng, 1.0, 1.0), 1.0);
        assert_eq!(rand_range(&mut rng, 2.0, 1.0), 2.0);
        assert!(rand_range(&mut rng, -3.0, 3.0) <= 3.0);
    }

    #[test]
    fn rand_index_stays_in_bounds() {
        let mut lo = FixedRng { value: 0 };
        let mut hi = FixedRng { value: u32::MAX };
        assert_eq!(rand_index(&mut lo, 7), 0);
        assert_eq!(rand_index(&mut hi, 7), 6);
    }

    #[test]
    fn shuffle_is_a_permutation_and_seed_stable() {
        let mut a: Vec<usize> = (0..20).collect();
        let mut b = a.clone();
        shuffle(&mut a, &mut StdRng::seed_from_u64(9));
        shuffle(&mut b, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
        let mut sorted = a.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn sample_without_replacement_is_distinct() {
        let mut rng = StdRng::seed_from_u64(3);
        let picked = sample_without_replacement(10, 6, &mut rng);
        assert_eq!(picked.len(), 6);
        let mut dedup = picked.clone();
        dedup.sort_unstable();
        dedup.dedup();
        assert_eq!(dedup.len(), 6);
        assert_eq!(sample_without_replacement(3, 8, &mut rng).len(), 3);
    }

    #[test]
    fn evenly_spaced_includes_both_ends() {
        assert_eq!(evenly_spaced_indices(1000, 3), vec![0, 500, 999]);
        assert_eq!(evenly_spaced_indices(5, 5), vec![0, 1, 2, 3, 4]);
        assert_eq!(evenly_spaced_indices(9, 1), vec![0]);
    }

    #[test]
    fn evenly_spaced_wraps_short_paths() {
        assert_eq!(evenly_spaced_indices(3, 7), vec![0, 1, 2, 0, 1, 2, 0]);
        assert!(evenly_spaced_indices(0, 4).is_empty());
    }

    #[test]
    fn mode_round_trips_through_names() {
        for mode in PlacementMode::ALL {
            assert_eq!(mode.name().parse::<PlacementMode>().unwrap(), mode);
        }
        assert!("diagonal".parse::<PlacementMode>().is_err());
        assert_eq!(
            " Sequential ".parse::<PlacementMode>().unwrap(),
            PlacementMode::Sequential
        );
    }
}
