//! Advisory referential-integrity findings over a loaded snapshot.
//!
//! None of these are load errors: the engine evaluates a dangling
//! reference as zero capacity and an empty pledge list as fully
//! uncovered, so a snapshot carrying them still computes. The findings
//! exist so an operator can see why a number looks off.

use std::collections::BTreeSet;
use std::fmt;

use crate::types::Snapshot;

/// One advisory finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityWarning {
    /// An order pledges a source id that matches no funding source.
    DanglingSourceRef { order_id: String, source_id: String },
    /// Two funding sources share an id; the engine keys residuals by id,
    /// so the duplicates collapse into one balance.
    DuplicateSourceId { id: String },
    /// Two work orders share an id; exclusion by id would drop both.
    DuplicateOrderId { id: String },
    /// A non-cancelled order pledges no sources at all.
    NoPledgedSources { order_id: String },
}

impl fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityWarning::DanglingSourceRef {
                order_id,
                source_id,
            } => {
                write!(
                    f,
                    "order '{}' pledges unknown funding source '{}'",
                    order_id, source_id
                )
            }
            IntegrityWarning::DuplicateSourceId { id } => {
                write!(f, "duplicate funding source id '{}'", id)
            }
            IntegrityWarning::DuplicateOrderId { id } => {
                write!(f, "duplicate work order id '{}'", id)
            }
            IntegrityWarning::NoPledgedSources { order_id } => {
                write!(f, "order '{}' pledges no funding sources", order_id)
            }
        }
    }
}

/// Scan a snapshot for advisory findings, in a stable order: duplicate
/// sources, duplicate orders, then per-order pledge problems in
/// snapshot order.
pub fn integrity_warnings(snapshot: &Snapshot) -> Vec<IntegrityWarning> {
    let mut warnings = Vec::new();

    let mut source_ids = BTreeSet::new();
    for s in &snapshot.funding_sources {
        if !source_ids.insert(s.id.as_str()) {
            warnings.push(IntegrityWarning::DuplicateSourceId { id: s.id.clone() });
        }
    }

    let mut order_ids = BTreeSet::new();
    for o in &snapshot.work_orders {
        if !order_ids.insert(o.id.as_str()) {
            warnings.push(IntegrityWarning::DuplicateOrderId { id: o.id.clone() });
        }
    }

    for o in &snapshot.work_orders {
        if o.linked_source_ids.is_empty() {
            if o.status != appia_core::OrderStatus::Cancelled {
                warnings.push(IntegrityWarning::NoPledgedSources {
                    order_id: o.id.clone(),
                });
            }
            continue;
        }
        for source_id in &o.linked_source_ids {
            if !source_ids.contains(source_id.as_str()) {
                warnings.push(IntegrityWarning::DanglingSourceRef {
                    order_id: o.id.clone(),
                    source_id: source_id.clone(),
                });
            }
        }
    }

    warnings
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
