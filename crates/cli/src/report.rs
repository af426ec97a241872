//! `appia report`: per-chapter budget rollup.

use std::path::Path;

use rust_decimal::Decimal;
use serde_json::json;

use appia_core::{chapter_residual, chapter_stats, compute_residuals};

use crate::common::load_snapshot;
use crate::OutputFormat;

pub(crate) fn cmd_report(
    snapshot_path: &Path,
    output: OutputFormat,
    quiet: bool,
) -> Result<(), String> {
    let snapshot = load_snapshot(snapshot_path)?;
    let residuals = compute_residuals(&snapshot.funding_sources, &snapshot.work_orders, None);
    let stats = chapter_stats(&snapshot.funding_sources, &snapshot.work_orders);

    match output {
        OutputFormat::Json => {
            let mut chapters = Vec::with_capacity(stats.len());
            for c in &stats {
                let residual = chapter_residual(&c.chapter, &snapshot.funding_sources, &residuals);
                let mut v = serde_json::to_value(c).map_err(|e| e.to_string())?;
                v["residual"] = json!(residual.to_string());
                chapters.push(v);
            }
            let rendered = serde_json::to_string_pretty(&json!({ "chapters": chapters }))
                .map_err(|e| e.to_string())?;
            println!("{}", rendered);
        }
        OutputFormat::Text => {
            if !quiet {
                println!(
                    "{:<10} {:>14} {:>14} {:>14} {:>14} {:>14}",
                    "CHAPTER", "BUDGET", "PLANNED", "COMMITTED", "SETTLED", "RESIDUAL"
                );
            }
            let mut totals = (
                Decimal::ZERO,
                Decimal::ZERO,
                Decimal::ZERO,
                Decimal::ZERO,
                Decimal::ZERO,
            );
            for c in &stats {
                let residual = chapter_residual(&c.chapter, &snapshot.funding_sources, &residuals);
                println!(
                    "{:<10} {:>14} {:>14} {:>14} {:>14} {:>14}",
                    c.chapter, c.total_budget, c.planned, c.committed, c.settled, residual
                );
                totals.0 += c.total_budget;
                totals.1 += c.planned;
                totals.2 += c.committed;
                totals.3 += c.settled;
                totals.4 += residual;
            }
            println!(
                "{:<10} {:>14} {:>14} {:>14} {:>14} {:>14}",
                "TOTAL", totals.0, totals.1, totals.2, totals.3, totals.4
            );
        }
    }

    Ok(())
}
