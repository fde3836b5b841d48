//! Concurrency degradation policy.
//!
//! When a batch drops too many matches the upstream is usually overloaded,
//! so the follow-up pass runs with half the workers, down to a floor.

/// Drop-rate-driven concurrency controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegradePolicy {
    /// Drop rate above which a degraded retry pass runs (exclusive).
    pub max_drop_rate: f64,
    /// Lowest concurrency a degraded pass will use.
    pub floor: usize,
}

impl DegradePolicy {
    /// Concurrency for the follow-up pass, or `None` if no pass is needed.
    ///
    /// Halves `current`, never going below `floor`.
    pub fn next_concurrency(&self, drop_rate: f64, current: usize) -> Option<usize> {
        if drop_rate > self.max_drop_rate {
            Some((current / 2).max(self.floor).max(1))
        } else {
            None
        }
    }
}

impl Default for DegradePolicy {
    fn default() -> Self {
        Self {
            max_drop_rate: 0.3,
            floor: 6,
        }
    }
}

/// Fraction of `requested` that was dropped; zero for an empty batch.
pub fn drop_rate(requested: usize, dropped: usize) -> f64 {
    if requested == 0 {
        0.0
    } else {
        dropped as f64 / requested as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_degrade_at_threshold() {
        let policy = DegradePolicy::default();
        assert_eq!(policy.next_concurrency(drop_rate(10, 3), 12), None);
        assert_eq!(policy.next_concurrency(0.0, 12), None);
    }

    #[test]
    fn test_halves_with_floor() {
        let policy = DegradePolicy::default();
        assert_eq!(policy.next_concurrency(drop_rate(10, 4), 12), Some(6));
        assert_eq!(policy.next_concurrency(0.9, 20), Some(10));
        assert_eq!(policy.next_concurrency(0.9, 8), Some(6));
    }

    #[test]
    fn test_floor_applies_below_six_workers() {
        let policy = DegradePolicy::default();
        assert_eq!(policy.next_concurrency(1.0, 4), Some(6));
        assert_eq!(policy.next_concurrency(0.5, 1), Some(6));

        let no_floor = DegradePolicy {
            floor: 0,
            ..DegradePolicy::default()
        };
        assert_eq!(no_floor.next_concurrency(1.0, 1), Some(1));
    }

    #[test]
    fn test_drop_rate_of_empty_batch() {
        assert_eq!(drop_rate(0, 0), 0.0);
        assert_eq!(drop_rate(10, 4), 0.4);
    }
}
