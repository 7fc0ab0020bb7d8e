//! Audit lock tests
//!
//! Tests for the audit gate semantics: blocked products reject mutations,
//! at most one active lock per product, finalization is idempotent.

use proptest::prelude::*;

/// Minimal in-memory model of the lock set for one product
#[derive(Debug, Default)]
struct LockModel {
    active: bool,
    finalized: u32,
}

impl LockModel {
    fn block(&mut self) -> Result<(), &'static str> {
        if self.active {
            return Err("already blocked");
        }
        self.active = true;
        Ok(())
    }

    fn unblock(&mut self) {
        if self.active {
            self.active = false;
        }
        self.finalized += 1;
    }

    fn may_mutate(&self) -> bool {
        !self.active
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// A fresh product accepts mutations
    #[test]
    fn test_unlocked_by_default() {
        let model = LockModel::default();
        assert!(model.may_mutate());
    }

    /// Blocking rejects mutations until finalized
    #[test]
    fn test_block_then_unblock() {
        let mut model = LockModel::default();

        model.block().unwrap();
        assert!(!model.may_mutate());

        model.unblock();
        assert!(model.may_mutate());
    }

    /// A second block while one is active conflicts
    #[test]
    fn test_double_block_conflicts() {
        let mut model = LockModel::default();
        model.block().unwrap();
        assert!(model.block().is_err());
    }

    /// Finalizing twice is safe
    #[test]
    fn test_unblock_idempotent() {
        let mut model = LockModel::default();
        model.block().unwrap();
        model.unblock();
        model.unblock();
        assert!(model.may_mutate());
        assert_eq!(model.finalized, 2);
    }

    /// The product can be re-blocked after finalization
    #[test]
    fn test_reblock_after_finalize() {
        let mut model = LockModel::default();
        model.block().unwrap();
        model.unblock();
        assert!(model.block().is_ok());
        assert!(!model.may_mutate());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Block,
        Unblock,
        TryMutate,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![Just(Op::Block), Just(Op::Unblock), Just(Op::TryMutate)]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Under any interleaving: mutations succeed exactly when no lock is
        /// active, and at most one lock is ever active
        #[test]
        fn prop_gate_consistency(ops in prop::collection::vec(op_strategy(), 0..100)) {
            let mut model = LockModel::default();
            let mut active_count = 0u32;

            for op in ops {
                match op {
                    Op::Block => {
                        if model.block().is_ok() {
                            active_count += 1;
                        }
                    }
                    Op::Unblock => {
                        if model.active {
                            active_count -= 1;
                        }
                        model.unblock();
                    }
                    Op::TryMutate => {
                        prop_assert_eq!(model.may_mutate(), active_count == 0);
                    }
                }
                prop_assert!(active_count <= 1);
            }
        }
    }
}
