//! appia-interchange: the snapshot JSON format.
//!
//! The engine itself knows nothing about storage or transport; whatever
//! layer holds the data hands it a snapshot and reads numbers back.
//! This crate is the one agreed representation of that snapshot: typed
//! records, a single [`from_snapshot`] entry point that deserializes a
//! `serde_json::Value` into domain types, the inverse
//! [`Snapshot::to_value`], and advisory referential-integrity warnings.
//!
//! Deserialization is strict about structure (missing fields,
//! unparseable decimals or dates) and deliberately lax about business
//! values: a dangling source reference or an oversized cost loads fine,
//! because the engine treats those as zero capacity and uncovered
//! remainder rather than errors. Unknown JSON fields are ignored for
//! forward compatibility.

pub mod deserialize;
pub mod integrity;
pub mod types;

pub use deserialize::{from_snapshot, SnapshotError};
pub use integrity::{integrity_warnings, IntegrityWarning};
pub use types::Snapshot;
