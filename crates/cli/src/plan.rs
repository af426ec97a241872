//! `appia plan`: preview a proposed order's coverage.

use std::path::Path;

use rust_decimal::Decimal;

use appia_core::{compute_residuals, plan_coverage};

use crate::common::load_snapshot;
use crate::OutputFormat;

pub(crate) fn cmd_plan(
    snapshot_path: &Path,
    cost: &str,
    sources: &[String],
    exclude: Option<&str>,
    output: OutputFormat,
    quiet: bool,
) -> Result<(), String> {
    let cost: Decimal = cost
        .parse()
        .map_err(|e| format!("invalid --cost '{}': {}", cost, e))?;

    let snapshot = load_snapshot(snapshot_path)?;
    let residuals = compute_residuals(&snapshot.funding_sources, &snapshot.work_orders, exclude);
    let plan = plan_coverage(cost, sources, &residuals);

    match output {
        OutputFormat::Json => {
            let rendered = serde_json::to_string_pretty(&plan).map_err(|e| e.to_string())?;
            println!("{}", rendered);
        }
        OutputFormat::Text => {
            if !quiet {
                println!("{:<16} {:>14} {:>14}", "SOURCE", "USED", "LEFTOVER");
            }
            for draw in &plan.draws {
                let mark = if draw.depleted { "  (depleted)" } else { "" };
                println!(
                    "{:<16} {:>14} {:>14}{}",
                    draw.source_id, draw.used, draw.leftover_after, mark
                );
            }
            // Overrun is advisory data for the caller to warn on, so it
            // prints on stdout and the command still exits 0.
            println!("uncovered: {}", plan.uncovered);
        }
    }

    Ok(())
}
