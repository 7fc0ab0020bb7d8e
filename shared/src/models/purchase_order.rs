//! Purchase order lifecycle

use serde::{Deserialize, Serialize};

/// Purchase order status
///
/// Orders move forward only: suggested orders are auto-generated by the
/// replenishment trigger, staff push them through approval to reception.
/// Cancellation is allowed from any pre-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Suggested,
    Pending,
    Approved,
    Received,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Suggested => "suggested",
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::Received => "received",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "suggested" => Some(OrderStatus::Suggested),
            "pending" => Some(OrderStatus::Pending),
            "approved" => Some(OrderStatus::Approved),
            "received" => Some(OrderStatus::Received),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Received | OrderStatus::Cancelled)
    }

    /// Whether a transition from `self` to `next` is allowed
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        match (self, next) {
            (OrderStatus::Suggested, OrderStatus::Pending)
            | (OrderStatus::Suggested, OrderStatus::Approved)
            | (OrderStatus::Pending, OrderStatus::Approved)
            | (OrderStatus::Approved, OrderStatus::Received) => true,
            (from, OrderStatus::Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}
