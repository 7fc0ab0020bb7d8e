//! Inventory movement types and quantity effect rules

use serde::{Deserialize, Serialize};

/// Types of inventory movements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    Entry,
    Exit,
    Adjustment,
    Return,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Entry => "entry",
            MovementType::Exit => "exit",
            MovementType::Adjustment => "adjustment",
            MovementType::Return => "return",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "entry" => Some(MovementType::Entry),
            "exit" => Some(MovementType::Exit),
            "adjustment" => Some(MovementType::Adjustment),
            "return" => Some(MovementType::Return),
            _ => None,
        }
    }

    /// Apply this movement's effect to a quantity.
    ///
    /// Entry and return add, exit subtracts, adjustment replaces the value
    /// outright. The result is clamped at zero, never negative.
    pub fn apply(&self, current: i32, quantity: i32) -> i32 {
        let next = match self {
            MovementType::Entry | MovementType::Return => current + quantity,
            MovementType::Exit => current - quantity,
            MovementType::Adjustment => quantity,
        };
        next.max(0)
    }

    /// Signed delta this movement contributes to an aggregate, if it is an
    /// incremental movement. Adjustments carry no delta: they replace.
    pub fn signed_delta(&self, quantity: i32) -> Option<i32> {
        match self {
            MovementType::Entry | MovementType::Return => Some(quantity),
            MovementType::Exit => Some(-quantity),
            MovementType::Adjustment => None,
        }
    }
}

/// Change types recorded in the batch history log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchChangeType {
    Entry,
    Use,
    Return,
    Created,
    Deactivated,
}

impl BatchChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchChangeType::Entry => "entry",
            BatchChangeType::Use => "use",
            BatchChangeType::Return => "return",
            BatchChangeType::Created => "created",
            BatchChangeType::Deactivated => "deactivated",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "entry" => Some(BatchChangeType::Entry),
            "use" => Some(BatchChangeType::Use),
            "return" => Some(BatchChangeType::Return),
            "created" => Some(BatchChangeType::Created),
            "deactivated" => Some(BatchChangeType::Deactivated),
            _ => None,
        }
    }

    /// History change type for a movement applied to a batch.
    /// Exits and adjustments both log as `use`, returns as `return`.
    pub fn from_movement(movement_type: MovementType) -> Self {
        match movement_type {
            MovementType::Entry => BatchChangeType::Entry,
            MovementType::Exit | MovementType::Adjustment => BatchChangeType::Use,
            MovementType::Return => BatchChangeType::Return,
        }
    }
}
