//! Per-chapter budget rollups.
//!
//! A chapter groups funding sources and the orders drawn against them.
//! These helpers feed the listing and dashboard views: a chapter's live
//! residual, and the planned/committed/settled progression of its
//! orders against the chapter's total budget.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::allocation::ResidualMap;
use crate::types::{FundingSource, OrderStatus, WorkOrder};

/// Budget progression of one chapter.
///
/// `planned >= committed >= settled` in the usual forward-only flow:
/// every non-cancelled order is planned, awarded and paid orders are
/// committed, paid orders are settled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterStats {
    pub chapter: String,
    /// Sum of the chapter's source amounts.
    pub total_budget: Decimal,
    /// Effective cost of all non-cancelled orders.
    pub planned: Decimal,
    /// Contract value (estimate when not yet recorded) of awarded and
    /// paid orders.
    pub committed: Decimal,
    /// Effective cost of paid orders.
    pub settled: Decimal,
}

impl ChapterStats {
    /// Budget not yet settled: `total_budget - settled`. Negative when
    /// payments overran the chapter's grants.
    pub fn unsettled(&self) -> Decimal {
        self.total_budget - self.settled
    }
}

/// Residual capacity of one chapter: the sum of its sources' remaining
/// balances from a residual map computed by
/// [`crate::allocation::compute_residuals`].
///
/// Subtracting a proposed order's cost from this is the live
/// over-budget check -- a negative result flags the order before it is
/// ever committed.
pub fn chapter_residual(
    chapter: &str,
    sources: &[FundingSource],
    residuals: &ResidualMap,
) -> Decimal {
    sources
        .iter()
        .filter(|s| s.chapter == chapter)
        .map(|s| residuals.get(&s.id).copied().unwrap_or(Decimal::ZERO))
        .sum()
}

/// Roll up every chapter's budget progression, sorted by chapter key.
///
/// An order belongs to the chapter of the first source in its pledge
/// list that exists in the snapshot; orders whose pledges all dangle are
/// skipped, as are cancelled orders (they consume nothing anywhere
/// else either).
pub fn chapter_stats(sources: &[FundingSource], orders: &[WorkOrder]) -> Vec<ChapterStats> {
    let mut stats: BTreeMap<String, ChapterStats> = BTreeMap::new();
    let chapter_of: BTreeMap<&str, &str> = sources
        .iter()
        .map(|s| (s.id.as_str(), s.chapter.as_str()))
        .collect();

    for s in sources {
        let entry = stats
            .entry(s.chapter.clone())
            .or_insert_with(|| ChapterStats {
                chapter: s.chapter.clone(),
                total_budget: Decimal::ZERO,
                planned: Decimal::ZERO,
                committed: Decimal::ZERO,
                settled: Decimal::ZERO,
            });
        entry.total_budget += s.amount;
    }

    for order in orders {
        if order.status == OrderStatus::Cancelled {
            continue;
        }
        let Some(chapter) = order
            .linked_source_ids
            .iter()
            .find_map(|id| chapter_of.get(id.as_str()))
        else {
            continue;
        };
        // Chapters only exist through their sources, so the entry is
        // always present by now.
        let Some(entry) = stats.get_mut(*chapter) else {
            continue;
        };

        entry.planned += order.effective_cost();
        if matches!(order.status, OrderStatus::Awarded | OrderStatus::Paid) {
            entry.committed += order.contract_value.unwrap_or(order.estimated_value);
        }
        if order.status == OrderStatus::Paid {
            entry.settled += order.effective_cost();
        }
    }

    stats.into_values().collect()
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
