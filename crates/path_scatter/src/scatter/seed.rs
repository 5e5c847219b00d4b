//! Seed resolution for layout runs.
use rand::Rng;

/// Resolve a caller-supplied seed.
///
/// `None` and negative values draw a fresh seed from the thread-local generator;
/// any other value is used as-is.
pub fn resolve_seed(requested: Option<i64>) -> u64 {
    match requested {
        Some(seed) if seed >= 0 => seed as u64,
        _ => rand::rng().next_u64(),
    }
}

/// Whether `requested` pins the run to a fixed seed.
pub fn is_fixed(requested: Option<i64>) -> bool {
    matches!(requested, Some(seed) if seed >= 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_negative_seeds_pass_through() {
        assert_eq!(resolve_seed(Some(0)), 0);
        assert_eq!(resolve_seed(Some(42)), 42);
        assert_eq!(resolve_seed(Some(i64::MAX)), i64::MAX as u64);
    }

    #[test]
    fn negative_and_missing_seeds_are_fresh() {
        assert!(!is_fixed(Some(-1)));
        assert!(!is_fixed(None));
        assert!(is_fixed(Some(7)));
        // Two fresh draws colliding is astronomically unlikely.
        let draws: Vec<u64> = (0..4).map(|_| resolve_seed(Some(-1))).collect();
        assert!(draws.windows(2).any(|w| w[0] != w[1]));
    }
}
