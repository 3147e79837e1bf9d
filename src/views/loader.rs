//! CSV loader for product view counts.
//!
//! Reads a comma-separated file whose header names a group column, a
//! subgroup column and a numeric measure column, and accumulates the measure
//! per normalized (group, subgroup) pair in a single pass.
//!
//! Rows whose measure does not parse are skipped with a warning: nothing is
//! accumulated for them and no zero entry is created for their pair. A
//! missing measure *column* is different: every row then contributes zero.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::config::ViewsConfig;
use crate::logging::{self, Component};
use crate::model::{
    GroupedMeasures, LoadError, LoadStats, COLUMN_GROUP, COLUMN_MEASURE, COLUMN_SUBGROUP,
};

// ---------------------------------------------------------------------------
// Column selection
// ---------------------------------------------------------------------------

/// Header names of the three semantic columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    pub group: String,
    pub subgroup: String,
    pub measure: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            group: COLUMN_GROUP.to_string(),
            subgroup: COLUMN_SUBGROUP.to_string(),
            measure: COLUMN_MEASURE.to_string(),
        }
    }
}

impl From<&ViewsConfig> for Columns {
    fn from(config: &ViewsConfig) -> Self {
        Self {
            group: config.group_column.clone(),
            subgroup: config.subgroup_column.clone(),
            measure: config.measure_column.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Trims surrounding whitespace and lowercases a grouping key.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Parses a measure cell. Surrounding whitespace is ignored.
pub fn parse_measure(raw: &str) -> Result<u64, String> {
    let trimmed = raw.trim();
    trimmed
        .parse::<u64>()
        .map_err(|e| format!("invalid measure '{}': {}", trimmed, e))
}

/// Loads and groups a views CSV file from disk.
pub fn load_views(path: &Path, columns: &Columns) -> Result<(GroupedMeasures, LoadStats), LoadError> {
    let display = path.display().to_string();
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(display.clone()),
        _ => LoadError::Io {
            path: display.clone(),
            message: e.to_string(),
        },
    })?;

    let (grouped, stats) = load_from_reader(file, columns, &display)?;
    logging::log_load_summary(&display, stats.rows_read, stats.rows_accumulated, stats.rows_skipped);
    Ok((grouped, stats))
}

/// Loads and groups views from any reader. `source` names the input in
/// diagnostics.
pub fn load_from_reader<R: Read>(
    reader: R,
    columns: &Columns,
    source: &str,
) -> Result<(GroupedMeasures, LoadStats), LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers = rdr.headers().map_err(malformed)?.clone();
    if headers.is_empty() {
        // Zero-byte input: no header and no rows, so nothing to report.
        logging::debug(Component::Views, Some(source), "empty input, no header row");
        return Ok((GroupedMeasures::new(), LoadStats::default()));
    }
    let position = |name: &str| headers.iter().position(|h| h.trim() == name);

    let group_idx = position(&columns.group)
        .ok_or_else(|| LoadError::MissingColumn(columns.group.clone()))?;
    let subgroup_idx = position(&columns.subgroup)
        .ok_or_else(|| LoadError::MissingColumn(columns.subgroup.clone()))?;
    let measure_idx = position(&columns.measure);

    if measure_idx.is_none() {
        logging::warn(
            Component::Views,
            Some(source),
            &format!("no '{}' column; every row counts as zero", columns.measure),
        );
    }

    let mut grouped = GroupedMeasures::new();
    let mut stats = LoadStats::default();

    for result in rdr.records() {
        let record = result.map_err(malformed)?;
        stats.rows_read += 1;

        let measure = match measure_idx {
            None => 0,
            Some(idx) => match parse_measure(record.get(idx).unwrap_or_default()) {
                Ok(value) => value,
                Err(reason) => {
                    let line = record
                        .position()
                        .map(|p| p.line().to_string())
                        .unwrap_or_else(|| "?".to_string());
                    logging::warn(
                        Component::Views,
                        Some(source),
                        &format!("line {}: {}, row skipped", line, reason),
                    );
                    stats.rows_skipped += 1;
                    continue;
                }
            },
        };

        let group = normalize_key(record.get(group_idx).unwrap_or_default());
        let subgroup = normalize_key(record.get(subgroup_idx).unwrap_or_default());
        grouped.add(&group, &subgroup, measure);
        stats.rows_accumulated += 1;
    }

    Ok((grouped, stats))
}

fn malformed(err: csv::Error) -> LoadError {
    let line = err.position().map(|p| p.line());
    LoadError::Malformed {
        line,
        message: err.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
