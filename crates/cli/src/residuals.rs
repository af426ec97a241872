//! `appia residuals`: per-source remaining balances.

use std::path::Path;

use serde_json::json;

use appia_core::compute_residuals;
use rust_decimal::Decimal;

use crate::common::load_snapshot;
use crate::OutputFormat;

pub(crate) fn cmd_residuals(
    snapshot_path: &Path,
    exclude: Option<&str>,
    output: OutputFormat,
    quiet: bool,
) -> Result<(), String> {
    let snapshot = load_snapshot(snapshot_path)?;
    let residuals = compute_residuals(&snapshot.funding_sources, &snapshot.work_orders, exclude);

    match output {
        OutputFormat::Json => {
            let rendered = serde_json::to_string_pretty(&json!({ "residuals": residuals }))
                .map_err(|e| e.to_string())?;
            println!("{}", rendered);
        }
        OutputFormat::Text => {
            if !quiet {
                println!(
                    "{:<16} {:<10} {:>14} {:>14}",
                    "CODE", "CHAPTER", "AMOUNT", "RESIDUAL"
                );
            }
            // Snapshot order, like the source listing the numbers feed.
            for s in &snapshot.funding_sources {
                let remaining = residuals.get(&s.id).copied().unwrap_or(Decimal::ZERO);
                println!(
                    "{:<16} {:<10} {:>14} {:>14}",
                    s.code, s.chapter, s.amount, remaining
                );
            }
        }
    }

    Ok(())
}
