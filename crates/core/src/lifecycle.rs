//! Guarded work-order status transitions.
//!
//! The allocator itself never enforces lifecycle order -- it just reads
//! whatever status an order carries. This module is the collaborator
//! layer that does enforce it: estimate to awarded when a winning bid
//! is recorded, awarded to paid when the invoice lands, cancellation
//! from any non-terminal stage. The advisory `locked` flag is honored
//! here and nowhere else.
//!
//! No transition ever touches `linked_source_ids`; the pledge list made
//! at the estimate stage is carried forward unchanged.

use rust_decimal::Decimal;
use std::fmt;

use crate::types::{OrderStatus, WorkOrder};

// ──────────────────────────────────────────────
// Transition inputs and effect record
// ──────────────────────────────────────────────

/// Winning bid recorded when a contract is awarded.
#[derive(Debug, Clone, PartialEq)]
pub struct AwardDetails {
    pub winner: String,
    pub contract_value: Decimal,
}

/// Invoice recorded when an order is paid.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDetails {
    pub paid_value: Decimal,
}

/// Record of one applied status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub order_id: String,
    pub from: OrderStatus,
    pub to: OrderStatus,
}

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

/// Rejected transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// The order is not in a status this transition starts from.
    InvalidTransition {
        order_id: String,
        from: OrderStatus,
        attempted: OrderStatus,
    },
    /// The order carries the advisory lock; unlock it first.
    Locked { order_id: String },
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleError::InvalidTransition {
                order_id,
                from,
                attempted,
            } => {
                write!(
                    f,
                    "order '{}' cannot move from {} to {}",
                    order_id, from, attempted
                )
            }
            LifecycleError::Locked { order_id } => {
                write!(f, "order '{}' is locked", order_id)
            }
        }
    }
}

impl std::error::Error for LifecycleError {}

// ──────────────────────────────────────────────
// Transitions
// ──────────────────────────────────────────────

fn guard(
    order: &WorkOrder,
    expected_from: OrderStatus,
    to: OrderStatus,
) -> Result<(), LifecycleError> {
    if order.locked {
        return Err(LifecycleError::Locked {
            order_id: order.id.clone(),
        });
    }
    if order.status != expected_from {
        return Err(LifecycleError::InvalidTransition {
            order_id: order.id.clone(),
            from: order.status,
            attempted: to,
        });
    }
    Ok(())
}

fn applied(order: &WorkOrder, from: OrderStatus) -> StatusChange {
    StatusChange {
        order_id: order.id.clone(),
        from,
        to: order.status,
    }
}

/// Record the winning bid: `Estimate -> Awarded`, setting the winner and
/// the contract value that now counts against the pledged sources.
pub fn record_award(
    order: &mut WorkOrder,
    details: AwardDetails,
) -> Result<StatusChange, LifecycleError> {
    guard(order, OrderStatus::Estimate, OrderStatus::Awarded)?;
    let from = order.status;
    order.status = OrderStatus::Awarded;
    order.winner = Some(details.winner);
    order.contract_value = Some(details.contract_value);
    Ok(applied(order, from))
}

/// Record the paid invoice: `Awarded -> Paid`, setting the paid value
/// that now counts against the pledged sources.
pub fn record_payment(
    order: &mut WorkOrder,
    details: PaymentDetails,
) -> Result<StatusChange, LifecycleError> {
    guard(order, OrderStatus::Awarded, OrderStatus::Paid)?;
    let from = order.status;
    order.status = OrderStatus::Paid;
    order.paid_value = Some(details.paid_value);
    Ok(applied(order, from))
}

/// Cancel an order from any non-terminal stage. A cancelled order keeps
/// its recorded values but consumes nothing.
pub fn cancel(order: &mut WorkOrder) -> Result<StatusChange, LifecycleError> {
    if order.locked {
        return Err(LifecycleError::Locked {
            order_id: order.id.clone(),
        });
    }
    if order.status.is_terminal() {
        return Err(LifecycleError::InvalidTransition {
            order_id: order.id.clone(),
            from: order.status,
            attempted: OrderStatus::Cancelled,
        });
    }
    let from = order.status;
    order.status = OrderStatus::Cancelled;
    Ok(applied(order, from))
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn estimate_order(id: &str) -> WorkOrder {
        WorkOrder {
            id: id.to_string(),
            order_number: "001/2026".to_string(),
            description: "facade restoration".to_string(),
            estimated_value: Decimal::from(1000),
            contract_value: None,
            paid_value: None,
            linked_source_ids: vec!["idv-1".to_string(), "idv-2".to_string()],
            status: OrderStatus::Estimate,
            winner: None,
            created_at: datetime!(2026-03-01 09:00 UTC),
            locked: false,
        }
    }

    #[test]
    fn award_then_payment_walks_the_forward_path() {
        let mut order = estimate_order("w1");

        let change = record_award(
            &mut order,
            AwardDetails {
                winner: "Impresa Rossi".to_string(),
                contract_value: Decimal::from(900),
            },
        )
        .unwrap();
        assert_eq!(change.from, OrderStatus::Estimate);
        assert_eq!(change.to, OrderStatus::Awarded);
        assert_eq!(order.winner.as_deref(), Some("Impresa Rossi"));
        assert_eq!(order.effective_cost(), Decimal::from(900));

        let change = record_payment(
            &mut order,
            PaymentDetails {
                paid_value: Decimal::from(870),
            },
        )
        .unwrap();
        assert_eq!(change.to, OrderStatus::Paid);
        assert_eq!(order.effective_cost(), Decimal::from(870));
    }

    #[test]
    fn payment_before_award_is_rejected() {
        let mut order = estimate_order("w1");
        let err = record_payment(
            &mut order,
            PaymentDetails {
                paid_value: Decimal::from(500),
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            LifecycleError::InvalidTransition {
                order_id: "w1".to_string(),
                from: OrderStatus::Estimate,
                attempted: OrderStatus::Paid,
            }
        );
        assert_eq!(order.status, OrderStatus::Estimate);
    }

    #[test]
    fn double_award_is_rejected() {
        let mut order = estimate_order("w1");
        record_award(
            &mut order,
            AwardDetails {
                winner: "first".to_string(),
                contract_value: Decimal::from(900),
            },
        )
        .unwrap();

        let err = record_award(
            &mut order,
            AwardDetails {
                winner: "second".to_string(),
                contract_value: Decimal::from(800),
            },
        )
        .unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
        assert_eq!(order.winner.as_deref(), Some("first"));
    }

    #[test]
    fn cancel_works_from_estimate_and_awarded_only() {
        let mut order = estimate_order("w1");
        assert!(cancel(&mut order).is_ok());
        assert_eq!(order.status, OrderStatus::Cancelled);

        // Terminal now: a second cancel is rejected.
        let err = cancel(&mut order).unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidTransition { .. }));

        let mut awarded = estimate_order("w3");
        record_award(
            &mut awarded,
            AwardDetails {
                winner: "x".to_string(),
                contract_value: Decimal::from(100),
            },
        )
        .unwrap();
        assert!(cancel(&mut awarded).is_ok());

        let mut paid = estimate_order("w2");
        record_award(
            &mut paid,
            AwardDetails {
                winner: "x".to_string(),
                contract_value: Decimal::from(100),
            },
        )
        .unwrap();
        record_payment(
            &mut paid,
            PaymentDetails {
                paid_value: Decimal::from(100),
            },
        )
        .unwrap();
        assert!(cancel(&mut paid).is_err());
    }

    #[test]
    fn locked_orders_refuse_every_transition() {
        let mut order = estimate_order("w1");
        order.locked = true;

        assert_eq!(
            record_award(
                &mut order,
                AwardDetails {
                    winner: "x".to_string(),
                    contract_value: Decimal::from(1),
                },
            ),
            Err(LifecycleError::Locked {
                order_id: "w1".to_string()
            })
        );
        assert!(cancel(&mut order).is_err());
        assert_eq!(order.status, OrderStatus::Estimate);
    }

    #[test]
    fn transitions_never_touch_the_pledge_list() {
        let mut order = estimate_order("w1");
        let pledges = order.linked_source_ids.clone();
        record_award(
            &mut order,
            AwardDetails {
                winner: "x".to_string(),
                contract_value: Decimal::from(900),
            },
        )
        .unwrap();
        record_payment(
            &mut order,
            PaymentDetails {
                paid_value: Decimal::from(870),
            },
        )
        .unwrap();
        assert_eq!(order.linked_source_ids, pledges);
    }
}
