//! Domain records consumed by the allocation engine.
//!
//! All money values use `rust_decimal::Decimal` -- never `f64`.
//! Timestamps are `time::OffsetDateTime`; the interchange layer carries
//! them as RFC 3339 strings so they stay sortable after a reload.

use rust_decimal::Decimal;
use std::fmt;
use time::OffsetDateTime;

// ──────────────────────────────────────────────
// Order status
// ──────────────────────────────────────────────

/// Lifecycle stage of a work order.
///
/// The stage picks which of the order's three cost fields counts against
/// its funding sources: the paid invoice once paid, the contract value
/// once awarded, the estimate before that. Cancelled orders consume
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Estimate,
    Awarded,
    Paid,
    Cancelled,
}

impl OrderStatus {
    /// Wire name used by the snapshot interchange format.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Estimate => "estimate",
            OrderStatus::Awarded => "awarded",
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a wire name back into a status. Returns `None` for unknown
    /// values; the interchange layer turns that into a record error.
    pub fn parse(s: &str) -> Option<OrderStatus> {
        match s {
            "estimate" => Some(OrderStatus::Estimate),
            "awarded" => Some(OrderStatus::Awarded),
            "paid" => Some(OrderStatus::Paid),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Paid and Cancelled orders accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ──────────────────────────────────────────────
// Funding source (IDV)
// ──────────────────────────────────────────────

/// An immutable grant of money tied to one budget chapter.
///
/// The engine never mutates a source and never reads `locked` -- locking
/// is an authorization concern for the surrounding application, not an
/// allocation concern.
#[derive(Debug, Clone, PartialEq)]
pub struct FundingSource {
    pub id: String,
    /// Human-facing IDV code shown in reports.
    pub code: String,
    /// Budget chapter this grant belongs to.
    pub chapter: String,
    /// Nominal grant size. A non-positive amount provides no capacity.
    pub amount: Decimal,
    pub motivation: String,
    /// Creation time; part of no ordering decision for sources, kept for
    /// the interchange round-trip.
    pub created_at: OffsetDateTime,
    /// Advisory edit lock. Enforced by [`crate::lifecycle`], ignored by
    /// the allocator.
    pub locked: bool,
}

// ──────────────────────────────────────────────
// Work order
// ──────────────────────────────────────────────

/// A tracked unit of work consuming money from one or more pledged
/// funding sources.
///
/// `linked_source_ids` is the pledge list: the order in which it is
/// stored is the order sources are drained when this order's cost is
/// covered. The caller decides that priority, not the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkOrder {
    pub id: String,
    pub order_number: String,
    pub description: String,
    pub estimated_value: Decimal,
    /// Recorded when the contract is awarded.
    pub contract_value: Option<Decimal>,
    /// Recorded when the invoice is paid.
    pub paid_value: Option<Decimal>,
    /// Pledged funding sources, in draw-down priority order.
    pub linked_source_ids: Vec<String>,
    pub status: OrderStatus,
    /// Winning bidder, set on award.
    pub winner: Option<String>,
    /// Creation time; oldest orders get first claim on shared sources.
    pub created_at: OffsetDateTime,
    /// Advisory edit lock, same contract as [`FundingSource::locked`].
    pub locked: bool,
}

impl WorkOrder {
    /// The amount this order counts against its pledged sources right
    /// now, determined solely by its current status.
    ///
    /// A missing contract or paid value counts as zero, and a negative
    /// value clamps to zero -- malformed costs provide no draw rather
    /// than producing an error.
    pub fn effective_cost(&self) -> Decimal {
        let cost = match self.status {
            OrderStatus::Paid => self.paid_value.unwrap_or(Decimal::ZERO),
            OrderStatus::Awarded => self.contract_value.unwrap_or(Decimal::ZERO),
            OrderStatus::Estimate => self.estimated_value,
            OrderStatus::Cancelled => Decimal::ZERO,
        };
        cost.max(Decimal::ZERO)
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
