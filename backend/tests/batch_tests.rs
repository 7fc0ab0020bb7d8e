//! Batch lifecycle tests
//!
//! Tests for batch quantities, product aggregate resync and
//! history change types.

use proptest::prelude::*;
use shared::{BatchChangeType, MovementType};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Batch change type strings
    #[test]
    fn test_change_type_strings() {
        let types = [
            BatchChangeType::Entry,
            BatchChangeType::Use,
            BatchChangeType::Return,
            BatchChangeType::Created,
            BatchChangeType::Deactivated,
        ];

        for t in types {
            // All types are snake_case identifiers
            assert!(t
                .as_str()
                .chars()
                .all(|c| c.is_lowercase() || c == '_'));
        }
    }

    /// Batch quantity validation
    #[test]
    fn test_batch_quantity_validation() {
        // current must stay within [0, initial]
        assert!(shared::validate_batch_quantities(100, 100).is_ok());
        assert!(shared::validate_batch_quantities(100, 0).is_ok());
        assert!(shared::validate_batch_quantities(100, 101).is_err());
        assert!(shared::validate_batch_quantities(100, -1).is_err());
        assert!(shared::validate_batch_quantities(-5, 0).is_err());
    }

    /// A new batch opens at its full initial quantity
    #[test]
    fn test_new_batch_opens_full() {
        let initial = 250;
        let current = initial;
        assert!(shared::validate_batch_quantities(initial, current).is_ok());
    }

    /// Product stock is the sum of active batch quantities
    #[test]
    fn test_aggregate_is_sum_of_active() {
        let batches = [
            (120, true),
            (30, true),
            (999, false), // deactivated, excluded
            (0, true),
        ];

        let total: i32 = batches
            .iter()
            .filter(|(_, active)| *active)
            .map(|(q, _)| q)
            .sum();

        assert_eq!(total, 150);
    }

    /// Deactivating the last active batch drops the aggregate to zero
    #[test]
    fn test_deactivate_last_batch() {
        let batches: [(i32, bool); 1] = [(75, false)];

        let total: i32 = batches
            .iter()
            .filter(|(_, active)| *active)
            .map(|(q, _)| q)
            .sum();

        assert_eq!(total, 0);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn batch_set_strategy() -> impl Strategy<Value = Vec<(i32, bool)>> {
        prop::collection::vec(((0i32..10_000), any::<bool>()), 0..20)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The resynced aggregate is never negative
        #[test]
        fn prop_aggregate_non_negative(batches in batch_set_strategy()) {
            let total: i64 = batches
                .iter()
                .filter(|(_, active)| *active)
                .map(|(q, _)| *q as i64)
                .sum();
            prop_assert!(total >= 0);
        }

        /// Deactivating a batch never increases the aggregate
        #[test]
        fn prop_deactivation_monotonic(batches in batch_set_strategy(), idx in 0usize..20) {
            prop_assume!(!batches.is_empty());
            let idx = idx % batches.len();

            let before: i64 = batches
                .iter()
                .filter(|(_, active)| *active)
                .map(|(q, _)| *q as i64)
                .sum();

            let mut after_set = batches.clone();
            after_set[idx].1 = false;
            let after: i64 = after_set
                .iter()
                .filter(|(_, active)| *active)
                .map(|(q, _)| *q as i64)
                .sum();

            prop_assert!(after <= before);
        }

        /// A batch drained by exits lands exactly at zero, never below
        #[test]
        fn prop_drain_to_zero(initial in 1i32..10_000) {
            let mut quantity = initial;
            while quantity > 0 {
                let take = quantity.min(7);
                quantity = MovementType::Exit.apply(quantity, take);
            }
            prop_assert_eq!(quantity, 0);
        }
    }
}
