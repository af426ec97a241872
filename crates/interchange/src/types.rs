//! The snapshot envelope and its canonical JSON form.

use serde_json::{json, Value};
use time::format_description::well_known::Rfc3339;

use appia_core::{FundingSource, WorkOrder};

use crate::deserialize::SnapshotError;

/// A complete dataset as handed to the engine: every funding source and
/// every work order, plus the envelope bookkeeping the exporting side
/// stamps on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Format version of the exporting application.
    pub version: u64,
    /// When the exporting side produced this snapshot.
    pub exported_at: time::OffsetDateTime,
    pub funding_sources: Vec<FundingSource>,
    pub work_orders: Vec<WorkOrder>,
}

impl Snapshot {
    /// Serialize back to the canonical JSON form read by
    /// [`crate::from_snapshot`].
    ///
    /// Money renders as decimal strings and timestamps as RFC 3339, so
    /// a reload reproduces bit-identical engine results. Field order and
    /// pledge-list order are preserved verbatim.
    pub fn to_value(&self) -> Result<Value, SnapshotError> {
        let format_ts = |ts: &time::OffsetDateTime| {
            ts.format(&Rfc3339)
                .map_err(|e| SnapshotError::InvalidSnapshot(format!("unformattable timestamp: {}", e)))
        };

        let mut sources = Vec::with_capacity(self.funding_sources.len());
        for s in &self.funding_sources {
            sources.push(json!({
                "id": s.id,
                "code": s.code,
                "chapter": s.chapter,
                "amount": s.amount.to_string(),
                "motivation": s.motivation,
                "created_at": format_ts(&s.created_at)?,
                "locked": s.locked,
            }));
        }

        let mut orders = Vec::with_capacity(self.work_orders.len());
        for o in &self.work_orders {
            orders.push(json!({
                "id": o.id,
                "order_number": o.order_number,
                "description": o.description,
                "estimated_value": o.estimated_value.to_string(),
                "contract_value": o.contract_value.map(|d| d.to_string()),
                "paid_value": o.paid_value.map(|d| d.to_string()),
                "linked_source_ids": o.linked_source_ids,
                "status": o.status.as_str(),
                "winner": o.winner,
                "created_at": format_ts(&o.created_at)?,
                "locked": o.locked,
            }));
        }

        Ok(json!({
            "version": self.version,
            "exported_at": format_ts(&self.exported_at)?,
            "funding_sources": sources,
            "work_orders": orders,
        }))
    }
}
