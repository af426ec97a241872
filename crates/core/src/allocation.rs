//! The residual-budget allocation engine.
//!
//! Two pure functions over an immutable snapshot:
//!
//! - [`compute_residuals`] recomputes every funding source's remaining
//!   balance from the complete order list, every call, from scratch.
//!   Full recomputation is the concurrency story: the caller re-invokes
//!   with whatever snapshot it currently holds and correctness follows,
//!   with no cache to invalidate.
//! - [`plan_coverage`] previews how one proposed order's cost would be
//!   drawn across its pledged sources, against residuals that already
//!   exclude that order.
//!
//! Allocation is greedy and strictly sequential: orders are replayed
//! oldest first ("first pledged, first spent"), and within one order the
//! pledge list is walked in stored order. Neither function can fail --
//! a missing source reference provides zero capacity and a shortfall
//! comes back as an `uncovered` amount for the caller to warn on.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::types::{FundingSource, WorkOrder};

/// Remaining balance per funding source id.
///
/// A `BTreeMap` keeps iteration order deterministic, so two calls over
/// the same snapshot render identically all the way out to a report.
pub type ResidualMap = BTreeMap<String, Decimal>;

// ──────────────────────────────────────────────
// Residual computation
// ──────────────────────────────────────────────

/// Compute the remaining balance of every funding source after replaying
/// all (non-excluded) work orders, oldest first.
///
/// Orders sort by `created_at` with `id` as the tie-break, giving the
/// replay a total order even under coarse clocks. Each order draws
/// `min(outstanding cost, available)` from its pledged sources in pledge
/// order; cancelled orders contribute nothing; ids that match no source
/// provide zero capacity. Cost left uncovered when the pledge list runs
/// dry is silently dropped here -- [`plan_coverage`] is the operation
/// that reports it.
///
/// `exclude_order_id` leaves one order out of the replay, so an order
/// being edited does not double-count against itself.
///
/// Every residual starts at `max(amount, 0)` and only ever decreases by
/// what is actually available, so no residual is ever negative.
pub fn compute_residuals(
    sources: &[FundingSource],
    orders: &[WorkOrder],
    exclude_order_id: Option<&str>,
) -> ResidualMap {
    let mut residuals: ResidualMap = sources
        .iter()
        .map(|s| (s.id.clone(), s.amount.max(Decimal::ZERO)))
        .collect();

    let mut replay: Vec<&WorkOrder> = orders
        .iter()
        .filter(|o| Some(o.id.as_str()) != exclude_order_id)
        .collect();
    replay.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });

    for order in replay {
        let mut outstanding = order.effective_cost();
        if outstanding.is_zero() {
            continue;
        }
        for source_id in &order.linked_source_ids {
            if outstanding.is_zero() {
                break;
            }
            let Some(remaining) = residuals.get_mut(source_id) else {
                continue;
            };
            let taken = outstanding.min(*remaining);
            *remaining -= taken;
            outstanding -= taken;
        }
    }

    residuals
}

// ──────────────────────────────────────────────
// Coverage planning
// ──────────────────────────────────────────────

/// One line of a coverage plan: how much a single pledged source
/// contributes to the proposed cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceDraw {
    pub source_id: String,
    /// Amount drawn from this source.
    pub used: Decimal,
    /// What the source would have left after this draw.
    pub leftover_after: Decimal,
    /// True when this draw consumed the source's last available unit.
    pub depleted: bool,
}

/// Line-item breakdown of how a proposed cost distributes across a
/// pledge list, plus whatever the pledges could not cover.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoveragePlan {
    pub draws: Vec<SourceDraw>,
    /// Cost in excess of the combined pledged capacity. Positive means
    /// the order is over budget; that is advisory data, not an error.
    pub uncovered: Decimal,
}

/// Preview the greedy draw-down of `cost` across `pledged_source_ids`,
/// in pledge order, against a precomputed residual map.
///
/// The residuals should already exclude the order being planned
/// (`compute_residuals` with `exclude_order_id`), otherwise the order
/// competes with its own previous version. Every pledged id gets a plan
/// line, including sources reached after the cost is already covered
/// (`used` = 0) and ids that match nothing (zero capacity). A negative
/// cost plans like zero.
pub fn plan_coverage(
    cost: Decimal,
    pledged_source_ids: &[String],
    residuals: &ResidualMap,
) -> CoveragePlan {
    let mut outstanding = cost.max(Decimal::ZERO);
    let mut draws = Vec::with_capacity(pledged_source_ids.len());

    for source_id in pledged_source_ids {
        let available = residuals
            .get(source_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
            .max(Decimal::ZERO);
        let used = outstanding.min(available);
        outstanding -= used;
        draws.push(SourceDraw {
            source_id: source_id.clone(),
            used,
            leftover_after: available - used,
            depleted: (available - used).is_zero() && used > Decimal::ZERO,
        });
    }

    CoveragePlan {
        draws,
        uncovered: outstanding,
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
