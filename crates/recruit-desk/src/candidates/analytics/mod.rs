mod distribution;
mod scores;
mod summary;
pub mod views;

pub use distribution::{
    branch_distribution, college_distribution, status_counts, top_groups, BRANCH_TOP_N,
    COLLEGE_TOP_N,
};
pub use scores::{
    average_scores_by_college, score_bucket, score_histogram, AVERAGE_TOP_N, SCORE_BUCKETS,
};
pub use views::{AnalyticsReport, DashboardStats};

/// `part / whole * 100`, or 0 when `whole` is empty.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
