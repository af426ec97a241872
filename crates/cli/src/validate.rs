//! `appia validate`: structural check, integrity warnings, digest.
//!
//! Parse failures exit 1; advisory warnings do not. The digest is a
//! SHA-256 over the canonical re-serialization, so two files that
//! differ only in formatting or field order hash alike.

use std::path::Path;

use serde_json::json;
use sha2::{Digest, Sha256};

use appia_interchange::integrity_warnings;

use crate::common::load_snapshot;
use crate::OutputFormat;

pub(crate) fn cmd_validate(
    snapshot_path: &Path,
    output: OutputFormat,
    quiet: bool,
) -> Result<(), String> {
    let snapshot = load_snapshot(snapshot_path)?;
    let warnings = integrity_warnings(&snapshot);

    let canonical = snapshot.to_value().map_err(|e| e.to_string())?.to_string();
    let digest = Sha256::digest(canonical.as_bytes());
    let digest_hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();

    match output {
        OutputFormat::Json => {
            let rendered = serde_json::to_string_pretty(&json!({
                "funding_sources": snapshot.funding_sources.len(),
                "work_orders": snapshot.work_orders.len(),
                "warnings": warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
                "sha256": digest_hex,
            }))
            .map_err(|e| e.to_string())?;
            println!("{}", rendered);
        }
        OutputFormat::Text => {
            for w in &warnings {
                println!("warning: {}", w);
            }
            if !quiet {
                println!(
                    "snapshot ok: {} funding sources, {} work orders",
                    snapshot.funding_sources.len(),
                    snapshot.work_orders.len()
                );
            }
            println!("sha256: {}", digest_hex);
        }
    }

    Ok(())
}
