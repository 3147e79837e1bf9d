//! Reduction of the two-level view mapping to per-group totals.

use crate::model::{GroupTotals, GroupedMeasures};

/// Sums every subgroup measure per group.
///
/// total(group) = Σ measure(group, subgroup). Totals saturate at `u64::MAX`
/// rather than wrapping. Entry order follows `grouped`.
pub fn compute_totals(grouped: &GroupedMeasures) -> GroupTotals {
    let entries = grouped
        .iter()
        .map(|group| {
            let total = group
                .subgroups()
                .iter()
                .fold(0u64, |acc, (_, measure)| acc.saturating_add(*measure));
            (group.key.clone(), total)
        })
        .collect();
    GroupTotals::from_entries(entries)
}
