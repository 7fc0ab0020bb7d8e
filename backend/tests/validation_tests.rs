//! Shared validation and pagination tests

use proptest::prelude::*;
use shared::{Pagination, PaginationMeta, UserRole};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Serial number validation
    #[test]
    fn test_serial_number_validation() {
        assert!(shared::validate_serial_number("SKU-00421").is_ok());
        assert!(shared::validate_serial_number("").is_err());
        assert!(shared::validate_serial_number("   ").is_err());
        assert!(shared::validate_serial_number(&"x".repeat(51)).is_err());
        assert!(shared::validate_serial_number(&"x".repeat(50)).is_ok());
    }

    /// Stock level validation
    #[test]
    fn test_stock_level_validation() {
        assert!(shared::validate_stock_levels(0, 0).is_ok());
        assert!(shared::validate_stock_levels(10, 5).is_ok());
        assert!(shared::validate_stock_levels(-1, 0).is_err());
        assert!(shared::validate_stock_levels(0, -1).is_err());
    }

    /// Direct stock edits are only allowed while no active batches exist
    #[test]
    fn test_direct_stock_edit_guard() {
        assert!(shared::validate_direct_stock_edit(0).is_ok());
        assert!(shared::validate_direct_stock_edit(1).is_err());
        assert!(shared::validate_direct_stock_edit(7).is_err());
    }

    /// Role permissions
    #[test]
    fn test_role_permissions() {
        assert!(UserRole::Admin.is_staff());
        assert!(UserRole::Staff.is_staff());
        assert!(!UserRole::Operator.is_staff());
    }

    /// Pagination offset math, pages start at 1
    #[test]
    fn test_pagination_offsets() {
        let p = Pagination { page: 1, per_page: 20 };
        assert_eq!(p.offset(), 0);
        assert_eq!(p.limit(), 20);

        let p = Pagination { page: 3, per_page: 20 };
        assert_eq!(p.offset(), 40);

        // Page 0 is treated as page 1
        let p = Pagination { page: 0, per_page: 20 };
        assert_eq!(p.offset(), 0);
    }

    /// Total pages rounding
    #[test]
    fn test_total_pages() {
        let p = Pagination { page: 1, per_page: 20 };
        assert_eq!(PaginationMeta::new(&p, 0).total_pages, 0);
        assert_eq!(PaginationMeta::new(&p, 1).total_pages, 1);
        assert_eq!(PaginationMeta::new(&p, 20).total_pages, 1);
        assert_eq!(PaginationMeta::new(&p, 21).total_pages, 2);
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

        /// Offsets advance by exactly one page size
        #[test]
        fn prop_offset_stride(page in 1u32..10_000, per_page in 1u32..100) {
            let a = Pagination { page, per_page };
            let b = Pagination { page: page + 1, per_page };
            prop_assert_eq!(b.offset() - a.offset(), per_page as i64);
        }

        /// total_pages is the smallest page count covering all items
        #[test]
        fn prop_total_pages_cover(total in 0u64..1_000_000, per_page in 1u32..100) {
            let p = Pagination { page: 1, per_page };
            let meta = PaginationMeta::new(&p, total);
            let capacity = meta.total_pages as u64 * per_page as u64;
            prop_assert!(capacity >= total);
            if meta.total_pages > 0 {
                let smaller = (meta.total_pages as u64 - 1) * per_page as u64;
                prop_assert!(smaller < total);
            }
        }
    }
}
