//! Deserialization from snapshot JSON into domain records.
//!
//! The main entry point is [`from_snapshot`], which takes a
//! `&serde_json::Value` and produces a [`Snapshot`]. Parsing is
//! field-by-field so every failure names the record and field that
//! caused it; unknown fields are skipped for forward compatibility.

use rust_decimal::Decimal;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use appia_core::{FundingSource, OrderStatus, WorkOrder};

use crate::types::Snapshot;

/// Errors during snapshot JSON deserialization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    /// The snapshot is missing a required top-level field.
    #[error("snapshot missing required field: '{field}'")]
    MissingField { field: String },

    /// A funding-source or work-order record is malformed.
    #[error("{kind} '{id}': {message}")]
    RecordError {
        kind: String,
        id: String,
        message: String,
    },

    /// The snapshot structure is invalid.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Deserialize a snapshot JSON value into typed domain records.
pub fn from_snapshot(snapshot: &Value) -> Result<Snapshot, SnapshotError> {
    let obj = snapshot
        .as_object()
        .ok_or_else(|| SnapshotError::InvalidSnapshot("snapshot must be a JSON object".to_string()))?;

    let version = obj
        .get("version")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| SnapshotError::MissingField {
            field: "version".to_string(),
        })?;

    let exported_at = obj
        .get("exported_at")
        .and_then(|v| v.as_str())
        .ok_or_else(|| SnapshotError::MissingField {
            field: "exported_at".to_string(),
        })
        .and_then(|s| {
            OffsetDateTime::parse(s, &Rfc3339)
                .map_err(|e| SnapshotError::InvalidSnapshot(format!("bad exported_at: {}", e)))
        })?;

    let sources_arr = obj
        .get("funding_sources")
        .and_then(|v| v.as_array())
        .ok_or_else(|| SnapshotError::MissingField {
            field: "funding_sources".to_string(),
        })?;
    let mut funding_sources = Vec::with_capacity(sources_arr.len());
    for v in sources_arr {
        funding_sources.push(parse_funding_source(v)?);
    }

    let orders_arr = obj
        .get("work_orders")
        .and_then(|v| v.as_array())
        .ok_or_else(|| SnapshotError::MissingField {
            field: "work_orders".to_string(),
        })?;
    let mut work_orders = Vec::with_capacity(orders_arr.len());
    for v in orders_arr {
        work_orders.push(parse_work_order(v)?);
    }

    Ok(Snapshot {
        version,
        exported_at,
        funding_sources,
        work_orders,
    })
}

// ──────────────────────────────────────────────
// Record parsers
// ──────────────────────────────────────────────

fn parse_funding_source(v: &Value) -> Result<FundingSource, SnapshotError> {
    let id = record_id(v, "funding source")?;
    let err = |message: String| SnapshotError::RecordError {
        kind: "funding source".to_string(),
        id: id.clone(),
        message,
    };

    Ok(FundingSource {
        code: str_field(v, "code").map_err(&err)?,
        chapter: str_field(v, "chapter").map_err(&err)?,
        amount: decimal_field(v, "amount").map_err(&err)?,
        motivation: str_field(v, "motivation").unwrap_or_default(),
        created_at: datetime_field(v, "created_at").map_err(&err)?,
        locked: bool_field(v, "locked"),
        id,
    })
}

fn parse_work_order(v: &Value) -> Result<WorkOrder, SnapshotError> {
    let id = record_id(v, "work order")?;
    let err = |message: String| SnapshotError::RecordError {
        kind: "work order".to_string(),
        id: id.clone(),
        message,
    };

    let status_name = str_field(v, "status").map_err(&err)?;
    let status = OrderStatus::parse(&status_name)
        .ok_or_else(|| err(format!("unknown status '{}'", status_name)))?;

    let linked_source_ids = match v.get("linked_source_ids") {
        Some(Value::Array(items)) => {
            let mut ids = Vec::with_capacity(items.len());
            for item in items {
                let s = item
                    .as_str()
                    .ok_or_else(|| err("linked_source_ids entries must be strings".to_string()))?;
                ids.push(s.to_string());
            }
            ids
        }
        // An absent pledge list loads as empty: the order is simply
        // fully uncovered, which the engine reports as data.
        None | Some(Value::Null) => Vec::new(),
        Some(_) => return Err(err("linked_source_ids must be an array".to_string())),
    };

    Ok(WorkOrder {
        order_number: str_field(v, "order_number").map_err(&err)?,
        description: str_field(v, "description").unwrap_or_default(),
        estimated_value: decimal_field(v, "estimated_value").map_err(&err)?,
        contract_value: opt_decimal_field(v, "contract_value").map_err(&err)?,
        paid_value: opt_decimal_field(v, "paid_value").map_err(&err)?,
        linked_source_ids,
        status,
        winner: opt_str_field(v, "winner"),
        created_at: datetime_field(v, "created_at").map_err(&err)?,
        locked: bool_field(v, "locked"),
        id,
    })
}

// ──────────────────────────────────────────────
// Field helpers
// ──────────────────────────────────────────────

fn record_id(v: &Value, kind: &str) -> Result<String, SnapshotError> {
    v.get("id")
        .and_then(|id| id.as_str())
        .map(|id| id.to_string())
        .ok_or_else(|| SnapshotError::RecordError {
            kind: kind.to_string(),
            id: "?".to_string(),
            message: "missing 'id'".to_string(),
        })
}

fn str_field(v: &Value, field: &str) -> Result<String, String> {
    v.get(field)
        .and_then(|f| f.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| format!("missing or non-string '{}'", field))
}

fn opt_str_field(v: &Value, field: &str) -> Option<String> {
    v.get(field).and_then(|f| f.as_str()).map(|s| s.to_string())
}

fn decimal_field(v: &Value, field: &str) -> Result<Decimal, String> {
    let s = v
        .get(field)
        .and_then(|f| f.as_str())
        .ok_or_else(|| format!("'{}' must be a decimal string", field))?;
    s.parse::<Decimal>()
        .map_err(|e| format!("invalid decimal in '{}': {}", field, e))
}

fn opt_decimal_field(v: &Value, field: &str) -> Result<Option<Decimal>, String> {
    match v.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => decimal_field(v, field).map(Some),
    }
}

fn datetime_field(v: &Value, field: &str) -> Result<OffsetDateTime, String> {
    let s = v
        .get(field)
        .and_then(|f| f.as_str())
        .ok_or_else(|| format!("missing '{}'", field))?;
    OffsetDateTime::parse(s, &Rfc3339).map_err(|e| format!("bad timestamp in '{}': {}", field, e))
}

fn bool_field(v: &Value, field: &str) -> bool {
    v.get(field).and_then(|f| f.as_bool()).unwrap_or(false)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
