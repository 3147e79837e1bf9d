//! Text rendering of grouped view counts.
//!
//! Output format, one group after another:
//!
//! ```text
//! <group> : <total>
//!   <subgroup> : <measure>
//! ```
//!
//! Groups are ordered by total, subgroups by measure, both descending. Both
//! sorts are stable, so equal values keep the order in which their keys
//! first appeared in the input.

use std::io::{self, Write};

use crate::model::{GroupTotals, GroupedMeasures};

/// Group totals ordered by descending total (stable).
pub fn ranked_groups(totals: &GroupTotals) -> Vec<(&str, u64)> {
    let mut ranked: Vec<(&str, u64)> = totals
        .entries()
        .iter()
        .map(|(key, total)| (key.as_str(), *total))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// Subgroups of `group` ordered by descending measure (stable). Unknown
/// groups have no subgroups.
pub fn ranked_subgroups<'a>(grouped: &'a GroupedMeasures, group: &str) -> Vec<(&'a str, u64)> {
    let mut ranked: Vec<(&str, u64)> = grouped
        .get(group)
        .map(|entry| {
            entry
                .subgroups()
                .iter()
                .map(|(key, measure)| (key.as_str(), *measure))
                .collect()
        })
        .unwrap_or_default();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// Writes the report to `out`.
pub fn write_report<W: Write>(
    grouped: &GroupedMeasures,
    totals: &GroupTotals,
    out: &mut W,
) -> io::Result<()> {
    for (group, total) in ranked_groups(totals) {
        writeln!(out, "{} : {}", group, total)?;
        for (subgroup, measure) in ranked_subgroups(grouped, group) {
            writeln!(out, "  {} : {}", subgroup, measure)?;
        }
    }
    Ok(())
}

/// Renders the report into a `String`.
pub fn format_report(grouped: &GroupedMeasures, totals: &GroupTotals) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec<u8> cannot fail.
    let _ = write_report(grouped, totals, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}
