//! Order status state machine
//!
//! Pure transition table over the nine order statuses. Every status has an
//! explicit, possibly empty, set of allowed next statuses — there is no
//! fallthrough. Status writes elsewhere in the system must go through
//! [`validate_transition`] first.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Order lifecycle status
///
/// Orders are created in `Pending`. `Cancelled`, `Refunded` and `Failed`
/// are terminal. `Completed` is read-only except for a refund.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    AwaitingPayment,
    Confirmed,
    Processing,
    Shipping,
    Completed,
    Cancelled,
    Refunded,
    Failed,
}

/// Requested transition is not in the allowed table
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot transition from {from} to {to}")]
pub struct InvalidTransition {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

impl OrderStatus {
    /// All statuses, in lifecycle order
    pub const ALL: &'static [OrderStatus] = &[
        OrderStatus::Pending,
        OrderStatus::AwaitingPayment,
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Shipping,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
        OrderStatus::Refunded,
        OrderStatus::Failed,
    ];

    /// Allowed next statuses, in the order the admin UI should offer them
    pub fn valid_next_statuses(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[
                OrderStatus::AwaitingPayment,
                OrderStatus::Confirmed,
                OrderStatus::Cancelled,
                OrderStatus::Failed,
            ],
            OrderStatus::AwaitingPayment => &[
                OrderStatus::Confirmed,
                OrderStatus::Cancelled,
                OrderStatus::Failed,
            ],
            OrderStatus::Confirmed => &[OrderStatus::Processing, OrderStatus::Cancelled],
            OrderStatus::Processing => &[OrderStatus::Shipping, OrderStatus::Cancelled],
            OrderStatus::Shipping => &[OrderStatus::Completed, OrderStatus::Cancelled],
            OrderStatus::Completed => &[OrderStatus::Refunded],
            OrderStatus::Cancelled | OrderStatus::Refunded | OrderStatus::Failed => &[],
        }
    }

    /// No outbound transitions at all
    pub fn is_terminal(&self) -> bool {
        self.valid_next_statuses().is_empty()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::AwaitingPayment => "awaiting_payment",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipping => "shipping",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
            OrderStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check that `from -> to` is a legal transition
///
/// A self-transition is Ok so that bulk updates are idempotent: re-applying
/// a status an order already has is a no-op, not an error.
pub fn validate_transition(from: OrderStatus, to: OrderStatus) -> Result<(), InvalidTransition> {
    if from == to || from.valid_next_statuses().contains(&to) {
        Ok(())
    } else {
        Err(InvalidTransition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_transition_is_ok_for_every_status() {
        for &s in OrderStatus::ALL {
            assert!(validate_transition(s, s).is_ok(), "self transition failed for {s}");
        }
    }

    #[test]
    fn test_valid_next_statuses_defined_for_every_status() {
        // Totality: the table answers for all nine statuses without panicking
        assert_eq!(OrderStatus::ALL.len(), 9);
        for &s in OrderStatus::ALL {
            let _ = s.valid_next_statuses();
        }
    }

    #[test]
    fn test_happy_path() {
        assert!(validate_transition(OrderStatus::Pending, OrderStatus::Confirmed).is_ok());
        assert!(validate_transition(OrderStatus::Confirmed, OrderStatus::Processing).is_ok());
        assert!(validate_transition(OrderStatus::Processing, OrderStatus::Shipping).is_ok());
        assert!(validate_transition(OrderStatus::Shipping, OrderStatus::Completed).is_ok());
    }

    #[test]
    fn test_completed_can_only_refund() {
        assert!(validate_transition(OrderStatus::Completed, OrderStatus::Refunded).is_ok());
        let err = validate_transition(OrderStatus::Completed, OrderStatus::Processing).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot transition from completed to processing"
        );
    }

    #[test]
    fn test_terminal_statuses_have_no_exits() {
        for s in [
            OrderStatus::Cancelled,
            OrderStatus::Refunded,
            OrderStatus::Failed,
        ] {
            assert!(s.is_terminal());
            assert!(s.valid_next_statuses().is_empty());
        }
        // Completed is not terminal: refund is still possible
        assert!(!OrderStatus::Completed.is_terminal());
    }

    #[test]
    fn test_no_backwards_transitions() {
        assert!(validate_transition(OrderStatus::Shipping, OrderStatus::Pending).is_err());
        assert!(validate_transition(OrderStatus::Cancelled, OrderStatus::Pending).is_err());
        assert!(validate_transition(OrderStatus::Refunded, OrderStatus::Completed).is_err());
    }

    #[test]
    fn test_pending_can_fail_or_cancel() {
        assert!(validate_transition(OrderStatus::Pending, OrderStatus::Cancelled).is_ok());
        assert!(validate_transition(OrderStatus::Pending, OrderStatus::Failed).is_ok());
        assert!(validate_transition(OrderStatus::AwaitingPayment, OrderStatus::Failed).is_ok());
    }

    #[test]
    fn test_status_serde_uses_snake_case() {
        let json = serde_json::to_string(&OrderStatus::AwaitingPayment).unwrap();
        assert_eq!(json, "\"awaiting_payment\"");
        let back: OrderStatus = serde_json::from_str("\"shipping\"").unwrap();
        assert_eq!(back, OrderStatus::Shipping);
    }
}
