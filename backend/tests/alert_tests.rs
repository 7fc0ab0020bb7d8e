//! Stock alert tests
//!
//! Tests for low-stock detection, alert deduplication and
//! automatic resolution.

use proptest::prelude::*;

/// The detection rule: strictly below minimum
fn is_low(current: i32, minimum: i32) -> bool {
    current < minimum
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Alert triggers strictly below minimum
    #[test]
    fn test_low_stock_detection() {
        assert!(is_low(4, 5));
        assert!(is_low(0, 1));
        // At minimum is not low
        assert!(!is_low(5, 5));
        assert!(!is_low(10, 5));
    }

    /// Zero minimum never triggers
    #[test]
    fn test_zero_minimum_never_triggers() {
        assert!(!is_low(0, 0));
        assert!(!is_low(100, 0));
    }

    /// At most one unattended alert per product: a second check while one
    /// is open creates nothing
    #[test]
    fn test_alert_deduplication() {
        let mut open_alerts = 0;

        // First check: low, no open alert -> create
        if is_low(3, 10) && open_alerts == 0 {
            open_alerts += 1;
        }
        // Second check: still low, alert already open -> skip
        if is_low(2, 10) && open_alerts == 0 {
            open_alerts += 1;
        }

        assert_eq!(open_alerts, 1);
    }

    /// Recovery resolves the open alert
    #[test]
    fn test_alert_resolution_on_recovery() {
        let mut open_alerts = 1;

        if !is_low(12, 10) {
            open_alerts = 0;
        }

        assert_eq!(open_alerts, 0);
    }

    /// Alert message carries the product name and both quantities
    #[test]
    fn test_alert_message_format() {
        let message = format!(
            "Stock of {} is {} units, below the minimum of {}",
            "Hex bolts M8", 3, 10
        );
        assert_eq!(
            message,
            "Stock of Hex bolts M8 is 3 units, below the minimum of 10"
        );
    }

    /// Threshold pair validation: critical strictly below low
    #[test]
    fn test_threshold_validation() {
        assert!(shared::validate_alert_thresholds(5, 10).is_ok());
        assert!(shared::validate_alert_thresholds(10, 10).is_err());
        assert!(shared::validate_alert_thresholds(15, 10).is_err());
        assert!(shared::validate_alert_thresholds(-1, 10).is_err());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Detection and resolution are exact complements
        #[test]
        fn prop_detection_complement(current in 0i32..1_000, minimum in 0i32..1_000) {
            prop_assert_ne!(is_low(current, minimum), current >= minimum);
        }

        /// Replaying checks over a stock trajectory never leaves more than
        /// one open alert
        #[test]
        fn prop_at_most_one_open_alert(
            minimum in 1i32..100,
            trajectory in prop::collection::vec(0i32..200, 1..50),
        ) {
            let mut open = 0u32;
            for current in trajectory {
                if is_low(current, minimum) {
                    if open == 0 {
                        open = 1;
                    }
                } else {
                    open = 0;
                }
                prop_assert!(open <= 1);
            }
        }

        /// A sweep over any product set resolves exactly the recovered ones
        #[test]
        fn prop_sweep_resolves_recovered(
            products in prop::collection::vec((0i32..200, 1i32..100, any::<bool>()), 0..30),
        ) {
            // (current, minimum, has_open_alert)
            let resolved = products
                .iter()
                .filter(|(current, minimum, open)| *open && !is_low(*current, *minimum))
                .count();
            let still_open = products
                .iter()
                .filter(|(current, minimum, open)| *open && is_low(*current, *minimum))
                .count();

            let total_open: usize = products.iter().filter(|(_, _, open)| *open).count();
            prop_assert_eq!(resolved + still_open, total_open);
        }
    }
}
