//! Product view-count report.
//!
//! Single-pass pipeline over a CSV export of product page views:
//!
//! - `loader`    — reads rows and accumulates views per (parent org, brand).
//! - `aggregate` — reduces the nested mapping to per-parent-org totals.
//! - `report`    — renders both, sorted by descending views.

pub mod aggregate;
pub mod loader;
pub mod report;

use std::io::Write;
use std::path::Path;

use crate::model::LoadStats;
use loader::Columns;

/// Runs loader → aggregator → reporter over the file at `path`, writing the
/// report to `out`.
pub fn run_report<W: Write>(
    path: &Path,
    columns: &Columns,
    out: &mut W,
) -> Result<LoadStats, Box<dyn std::error::Error>> {
    let (grouped, stats) = loader::load_views(path, columns)?;
    let totals = aggregate::compute_totals(&grouped);
    report::write_report(&grouped, &totals, out)?;
    Ok(stats)
}
