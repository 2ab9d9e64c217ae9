//! Resource id allocation

use std::cell::RefCell;
use std::ops::Range;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use petcheck_core::IdStrategy;

/// Range unique ids are drawn from. Stays clear of the literal ids the
/// not-found scenarios rely on (`0`, `9999`).
pub const UNIQUE_ID_RANGE: Range<i64> = 100_000..1_000_000_000;

pub struct IdAllocator {
    strategy: IdStrategy,
    rng: RefCell<SmallRng>,
}

impl IdAllocator {
    #[must_use]
    pub fn new(strategy: IdStrategy) -> Self {
        Self {
            strategy,
            rng: RefCell::new(SmallRng::from_entropy()),
        }
    }

    /// Deterministic allocator for reproducible runs.
    #[must_use]
    pub fn seeded(strategy: IdStrategy, seed: u64) -> Self {
        Self {
            strategy,
            rng: RefCell::new(SmallRng::seed_from_u64(seed)),
        }
    }

    #[must_use]
    pub fn strategy(&self) -> IdStrategy {
        self.strategy
    }

    /// Id for a resource whose scenario would otherwise use `literal`.
    pub fn next(&self, literal: i64) -> i64 {
        match self.strategy {
            IdStrategy::Fixed => literal,
            IdStrategy::Unique => self.rng.borrow_mut().gen_range(UNIQUE_ID_RANGE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_returns_literal() {
        let ids = IdAllocator::new(IdStrategy::Fixed);
        assert_eq!(ids.next(1), 1);
        assert_eq!(ids.next(10), 10);
        assert_eq!(ids.strategy(), IdStrategy::Fixed);
    }

    #[test]
    fn unique_stays_in_range() {
        let ids = IdAllocator::new(IdStrategy::Unique);
        for _ in 0..1000 {
            let id = ids.next(1);
            assert!(UNIQUE_ID_RANGE.contains(&id), "{id} out of range");
        }
    }

    #[test]
    fn seeded_is_reproducible() {
        let a = IdAllocator::seeded(IdStrategy::Unique, 42);
        let b = IdAllocator::seeded(IdStrategy::Unique, 42);
        let xs: Vec<i64> = (0..5).map(|_| a.next(1)).collect();
        let ys: Vec<i64> = (0..5).map(|_| b.next(1)).collect();
        assert_eq!(xs, ys);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn fixed_is_identity(literal in any::<i64>()) {
                let ids = IdAllocator::new(IdStrategy::Fixed);
                prop_assert_eq!(ids.next(literal), literal);
            }

            #[test]
            fn unique_ignores_literal(seed in any::<u64>(), literal in any::<i64>()) {
                let ids = IdAllocator::seeded(IdStrategy::Unique, seed);
                let id = ids.next(literal);
                prop_assert!(UNIQUE_ID_RANGE.contains(&id));
            }
        }
    }
}
