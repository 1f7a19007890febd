use std::collections::HashMap;

use super::super::domain::{CandidateRecord, SelectionStatus};
use super::percentage;
use super::views::{GroupCountEntry, StatusCountEntry};

pub const COLLEGE_TOP_N: usize = 8;
pub const BRANCH_TOP_N: usize = 6;

/// Per-status counts, always emitting the selected, pending, and rejected buckets.
pub fn status_counts(records: &[CandidateRecord]) -> Vec<StatusCountEntry> {
    SelectionStatus::ordered()
        .into_iter()
        .map(|status| StatusCountEntry {
            status,
            status_label: status.title(),
            count: records
                .iter()
                .filter(|record| record.selection_status == status)
                .count(),
        })
        .collect()
}

pub fn college_distribution(records: &[CandidateRecord]) -> Vec<GroupCountEntry> {
    top_groups(records, CandidateRecord::college_key, COLLEGE_TOP_N)
}

pub fn branch_distribution(records: &[CandidateRecord]) -> Vec<GroupCountEntry> {
    top_groups(records, CandidateRecord::branch_key, BRANCH_TOP_N)
}

/// Counts records per key, sorted by descending count and truncated to `limit`. Ties keep the
/// order in which each group was first seen.
pub fn top_groups<F>(records: &[CandidateRecord], key: F, limit: usize) -> Vec<GroupCountEntry>
where
    F: Fn(&CandidateRecord) -> &str,
{
    let mut groups: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for record in records {
        let group = key(record);
        match positions.get(group) {
            Some(&position) => groups[position].1 += 1,
            None => {
                positions.insert(group.to_string(), groups.len());
                groups.push((group.to_string(), 1));
            }
        }
    }

    // stable sort keeps first-seen order among equal counts
    groups.sort_by(|a, b| b.1.cmp(&a.1));
    groups.truncate(limit);

    groups
        .into_iter()
        .map(|(group, count)| GroupCountEntry {
            percentage: percentage(count, records.len()),
            group,
            count,
        })
        .collect()
}
