//! Shared helpers for the subcommands.

use std::fs;
use std::path::Path;

use appia_interchange::{from_snapshot, Snapshot};

/// Read and parse a snapshot JSON file.
pub(crate) fn load_snapshot(path: &Path) -> Result<Snapshot, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| format!("{} is not valid JSON: {}", path.display(), e))?;
    from_snapshot(&value).map_err(|e| e.to_string())
}
