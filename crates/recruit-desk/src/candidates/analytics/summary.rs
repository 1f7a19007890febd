use super::super::domain::{CandidateRecord, SelectionStatus};
use super::super::filter::FilterCriteria;
use super::distribution::{branch_distribution, college_distribution, status_counts};
use super::percentage;
use super::scores::{average_scores_by_college, score_histogram};
use super::views::{AnalyticsReport, DashboardStats};

impl DashboardStats {
    pub fn compute(
        all: &[CandidateRecord],
        filtered: &[CandidateRecord],
        criteria: &FilterCriteria,
    ) -> Self {
        let count = |status: SelectionStatus| {
            filtered
                .iter()
                .filter(|record| record.selection_status == status)
                .count()
        };

        Self {
            total: all.len(),
            filtered: filtered.len(),
            selected: count(SelectionStatus::Selected),
            pending: count(SelectionStatus::Pending),
            rejected: count(SelectionStatus::Rejected),
            filtered_pct: percentage(filtered.len(), all.len()).round() as u32,
            active_filters: criteria.active_count(),
        }
    }
}

impl AnalyticsReport {
    pub fn build(all: &[CandidateRecord], filtered: &[CandidateRecord]) -> Self {
        Self {
            total: all.len(),
            filtered: filtered.len(),
            college_distribution: college_distribution(all),
            status_distribution: status_counts(filtered),
            score_distribution: score_histogram(filtered),
            average_scores_by_college: average_scores_by_college(all),
            branch_distribution: branch_distribution(filtered),
        }
    }
}
