//! Kit availability tests
//!
//! Tests for derived kit availability: the bottleneck component decides
//! how many kits can be assembled.

use proptest::prelude::*;
use shared::kit_availability;

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Availability is the minimum over floor(stock / per_kit)
    #[test]
    fn test_bottleneck_component() {
        // 10 bolts at 2 per kit -> 5; 9 nuts at 3 per kit -> 3
        let components = [(10, 2), (9, 3)];
        assert_eq!(kit_availability(&components), 3);
    }

    /// A single component kit
    #[test]
    fn test_single_component() {
        assert_eq!(kit_availability(&[(10, 3)]), 3);
        assert_eq!(kit_availability(&[(9, 3)]), 3);
        assert_eq!(kit_availability(&[(2, 3)]), 0);
    }

    /// Out-of-stock component zeroes the kit
    #[test]
    fn test_missing_component() {
        let components = [(100, 1), (0, 1), (50, 2)];
        assert_eq!(kit_availability(&components), 0);
    }

    /// Empty component list yields zero
    #[test]
    fn test_empty_kit() {
        assert_eq!(kit_availability(&[]), 0);
    }

    /// Zero per-kit quantity yields zero availability
    #[test]
    fn test_zero_per_kit() {
        assert_eq!(kit_availability(&[(100, 0)]), 0);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn components_strategy() -> impl Strategy<Value = Vec<(i32, i32)>> {
        prop::collection::vec(((0i32..10_000), (1i32..100)), 1..10)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Availability never exceeds any single component's capacity
        #[test]
        fn prop_bounded_by_each_component(components in components_strategy()) {
            let available = kit_availability(&components);
            for (stock, per_kit) in &components {
                prop_assert!(available <= stock / per_kit);
            }
        }

        /// Assembling the available count never overdraws a component
        #[test]
        fn prop_assembly_feasible(components in components_strategy()) {
            let available = kit_availability(&components);
            for (stock, per_kit) in &components {
                prop_assert!(available * per_kit <= *stock);
            }
        }

        /// Adding stock to one component never lowers availability
        #[test]
        fn prop_monotonic_in_stock(
            components in components_strategy(),
            idx in 0usize..10,
            extra in 0i32..1_000,
        ) {
            let idx = idx % components.len();
            let before = kit_availability(&components);

            let mut more = components.clone();
            more[idx].0 += extra;
            let after = kit_availability(&more);

            prop_assert!(after >= before);
        }
    }
}
