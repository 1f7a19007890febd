use serde::Serialize;

use super::super::domain::SelectionStatus;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCountEntry {
    pub status: SelectionStatus,
    pub status_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCountEntry {
    pub group: String,
    pub count: usize,
    /// Share of the aggregated list, 0 for an empty list.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBucketEntry {
    pub range: &'static str,
    pub github: usize,
    pub hackerearth: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollegeAverageEntry {
    pub college: String,
    pub avg_github: f64,
    pub avg_hackerearth: f64,
    pub avg_cgpa: f64,
}

/// Headline numbers shown above the roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub filtered: usize,
    pub selected: usize,
    pub pending: usize,
    pub rejected: usize,
    pub filtered_pct: u32,
    pub active_filters: usize,
}

/// Chart data for the analytics panel. College charts cover the whole roster, the rest cover
/// the filtered subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub total: usize,
    pub filtered: usize,
    pub college_distribution: Vec<GroupCountEntry>,
    pub status_distribution: Vec<StatusCountEntry>,
    pub score_distribution: Vec<ScoreBucketEntry>,
    pub average_scores_by_college: Vec<CollegeAverageEntry>,
    pub branch_distribution: Vec<GroupCountEntry>,
}
