//! Movement ledger tests
//!
//! Tests for stock movement semantics including:
//! - Movement type effects on stock
//! - Exit sufficiency checking
//! - Non-negative stock invariant
//! - Batch change type mapping

use proptest::prelude::*;
use shared::{BatchChangeType, MovementType};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Test movement type string round-trip
    #[test]
    fn test_movement_type_strings() {
        let types = [
            MovementType::Entry,
            MovementType::Exit,
            MovementType::Adjustment,
            MovementType::Return,
        ];

        for t in types {
            assert_eq!(MovementType::from_str(t.as_str()), Some(t));
        }

        assert_eq!(MovementType::from_str("transfer"), None);
    }

    /// Entry adds to stock
    #[test]
    fn test_entry_adds() {
        assert_eq!(MovementType::Entry.apply(10, 5), 15);
        assert_eq!(MovementType::Entry.apply(0, 100), 100);
    }

    /// Exit subtracts from stock
    #[test]
    fn test_exit_subtracts() {
        assert_eq!(MovementType::Exit.apply(10, 5), 5);
        assert_eq!(MovementType::Exit.apply(10, 10), 0);
    }

    /// Return adds back to stock like an entry
    #[test]
    fn test_return_adds() {
        assert_eq!(MovementType::Return.apply(10, 3), 13);
    }

    /// Adjustment sets stock to the given quantity
    #[test]
    fn test_adjustment_sets() {
        assert_eq!(MovementType::Adjustment.apply(10, 42), 42);
        assert_eq!(MovementType::Adjustment.apply(100, 0), 0);
    }

    /// Exit never drives stock negative
    #[test]
    fn test_exit_clamps_at_zero() {
        assert_eq!(MovementType::Exit.apply(5, 10), 0);
        assert_eq!(MovementType::Exit.apply(0, 1), 0);
    }

    /// Signed delta for the product aggregate
    #[test]
    fn test_signed_delta() {
        assert_eq!(MovementType::Entry.signed_delta(7), Some(7));
        assert_eq!(MovementType::Return.signed_delta(7), Some(7));
        assert_eq!(MovementType::Exit.signed_delta(7), Some(-7));
        // Adjustments resync from batches, no incremental delta
        assert_eq!(MovementType::Adjustment.signed_delta(7), None);
    }

    /// A named batch bounds an exit; without one the product aggregate does
    #[test]
    fn test_exit_availability_selection() {
        assert_eq!(shared::exit_availability(Some(4), 100), 4);
        assert_eq!(shared::exit_availability(Some(0), 100), 0);
        assert_eq!(shared::exit_availability(None, 100), 100);
        assert_eq!(shared::exit_availability(None, 0), 0);
    }

    /// Batch history change type mapping
    #[test]
    fn test_batch_change_type_mapping() {
        assert_eq!(
            BatchChangeType::from_movement(MovementType::Entry),
            BatchChangeType::Entry
        );
        assert_eq!(
            BatchChangeType::from_movement(MovementType::Exit),
            BatchChangeType::Use
        );
        assert_eq!(
            BatchChangeType::from_movement(MovementType::Adjustment),
            BatchChangeType::Use
        );
        assert_eq!(
            BatchChangeType::from_movement(MovementType::Return),
            BatchChangeType::Return
        );
    }

    /// Quantity validation rejects non-positive values
    #[test]
    fn test_quantity_validation() {
        assert!(shared::validate_movement_quantity(1).is_ok());
        assert!(shared::validate_movement_quantity(0).is_err());
        assert!(shared::validate_movement_quantity(-5).is_err());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn movement_type_strategy() -> impl Strategy<Value = MovementType> {
        prop_oneof![
            Just(MovementType::Entry),
            Just(MovementType::Exit),
            Just(MovementType::Adjustment),
            Just(MovementType::Return),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Stock never goes negative, whatever the movement
        #[test]
        fn prop_stock_never_negative(
            current in 0i32..100_000,
            quantity in 1i32..100_000,
            movement_type in movement_type_strategy(),
        ) {
            let next = movement_type.apply(current, quantity);
            prop_assert!(next >= 0);
        }

        /// Entry then exit of the same quantity is a no-op
        #[test]
        fn prop_entry_exit_roundtrip(
            current in 0i32..100_000,
            quantity in 1i32..1_000,
        ) {
            let after_entry = MovementType::Entry.apply(current, quantity);
            let after_exit = MovementType::Exit.apply(after_entry, quantity);
            prop_assert_eq!(after_exit, current);
        }

        /// A sufficient exit removes exactly the requested quantity
        #[test]
        fn prop_sufficient_exit_exact(
            current in 0i32..100_000,
            quantity in 1i32..1_000,
        ) {
            prop_assume!(quantity <= current);
            let next = MovementType::Exit.apply(current, quantity);
            prop_assert_eq!(next, current - quantity);
        }

        /// Adjustment result is independent of prior stock
        #[test]
        fn prop_adjustment_ignores_prior(
            a in 0i32..100_000,
            b in 0i32..100_000,
            quantity in 0i32..100_000,
        ) {
            prop_assert_eq!(
                MovementType::Adjustment.apply(a, quantity),
                MovementType::Adjustment.apply(b, quantity)
            );
        }

        /// Signed delta agrees with apply for incremental movements
        #[test]
        fn prop_signed_delta_consistent(
            current in 0i32..100_000,
            quantity in 1i32..1_000,
            movement_type in movement_type_strategy(),
        ) {
            if let Some(delta) = movement_type.signed_delta(quantity) {
                let via_delta = (current + delta).max(0);
                prop_assert_eq!(via_delta, movement_type.apply(current, quantity));
            }
        }
    }
}

// ============================================================================
// Simulation Tests
// ============================================================================

#[cfg(test)]
mod simulation_tests {
    use super::*;

    /// Replay a movement sequence the way the recorder applies it
    fn replay(initial: i32, movements: &[(MovementType, i32)]) -> i32 {
        movements
            .iter()
            .fold(initial, |stock, (t, q)| t.apply(stock, *q))
    }

    /// In-memory product with batches, mirroring the recorder's rules: a
    /// movement naming a deactivated batch is rejected, incremental
    /// movements delta-update the aggregate, deactivation and adjustments
    /// resync it from the active batch sum.
    struct ProductModel {
        stock: i32,
        batches: Vec<(i32, bool)>, // (current_quantity, is_active)
    }

    impl ProductModel {
        fn record(&mut self, batch: usize, t: MovementType, q: i32) -> Result<(), &'static str> {
            if !self.batches[batch].1 {
                return Err("batch is deactivated");
            }
            self.batches[batch].0 = t.apply(self.batches[batch].0, q);
            match t.signed_delta(q) {
                Some(delta) => self.stock = (self.stock + delta).max(0),
                None => self.stock = self.active_sum(),
            }
            Ok(())
        }

        fn deactivate(&mut self, batch: usize) {
            self.batches[batch].1 = false;
            self.stock = self.active_sum();
        }

        fn active_sum(&self) -> i32 {
            self.batches
                .iter()
                .filter(|(_, active)| *active)
                .map(|(q, _)| q)
                .sum()
        }
    }

    /// Movements against a deactivated batch are rejected, keeping the
    /// product aggregate equal to the sum of active batch quantities
    #[test]
    fn test_deactivated_batch_rejects_movements() {
        let mut product = ProductModel {
            stock: 0,
            batches: vec![(0, true), (0, true)],
        };

        product.record(0, MovementType::Entry, 25).unwrap();
        product.record(1, MovementType::Entry, 15).unwrap();
        assert_eq!(product.stock, 40);

        product.deactivate(0);
        assert_eq!(product.stock, 15);

        // An entry against the dead batch would put the aggregate out of
        // sync with the active batch sum
        assert!(product.record(0, MovementType::Entry, 10).is_err());
        assert_eq!(product.stock, product.active_sum());

        product.record(1, MovementType::Exit, 5).unwrap();
        assert_eq!(product.stock, 10);
        assert_eq!(product.stock, product.active_sum());
    }

    /// A realistic week of warehouse activity
    #[test]
    fn test_week_of_activity() {
        let movements = [
            (MovementType::Entry, 100),
            (MovementType::Exit, 30),
            (MovementType::Exit, 20),
            (MovementType::Return, 5),
            (MovementType::Exit, 40),
        ];

        // 0 + 100 - 30 - 20 + 5 - 40 = 15
        assert_eq!(replay(0, &movements), 15);
    }

    /// An adjustment mid-sequence resets the running total
    #[test]
    fn test_adjustment_resets_sequence() {
        let movements = [
            (MovementType::Entry, 100),
            (MovementType::Exit, 10),
            (MovementType::Adjustment, 50), // physical count found 50
            (MovementType::Exit, 20),
        ];

        assert_eq!(replay(0, &movements), 30);
    }

    /// The batch history chain is contiguous: each entry's before equals the
    /// previous entry's after
    #[test]
    fn test_history_chain_contiguous() {
        let movements = [
            (MovementType::Entry, 40),
            (MovementType::Exit, 15),
            (MovementType::Return, 5),
            (MovementType::Adjustment, 10),
        ];

        let mut stock = 0;
        let mut history = Vec::new();
        for (t, q) in movements {
            let before = stock;
            stock = t.apply(stock, q);
            history.push((before, stock));
        }

        for pair in history.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
    }
}
