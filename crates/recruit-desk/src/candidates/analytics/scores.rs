use std::collections::HashMap;

use super::super::domain::CandidateRecord;
use super::views::{CollegeAverageEntry, ScoreBucketEntry};

pub const AVERAGE_TOP_N: usize = 6;

/// Fixed 0-100 score ranges as `(label, inclusive upper bound)`. Each bucket starts just above
/// the previous bound, so 20 lands in "0-20" and 20.5 or 21 in "21-40".
pub const SCORE_BUCKETS: [(&str, f64); 5] = [
    ("0-20", 20.0),
    ("21-40", 40.0),
    ("41-60", 60.0),
    ("61-80", 80.0),
    ("81-100", 100.0),
];

pub fn score_bucket(score: f64) -> Option<usize> {
    if !(0.0..=100.0).contains(&score) {
        return None;
    }
    SCORE_BUCKETS.iter().position(|(_, upper)| score <= *upper)
}

/// GitHub and HackerEarth score histogram, one row per bucket.
pub fn score_histogram(records: &[CandidateRecord]) -> Vec<ScoreBucketEntry> {
    let mut github = [0usize; SCORE_BUCKETS.len()];
    let mut hackerearth = [0usize; SCORE_BUCKETS.len()];

    for record in records {
        if let Some(bucket) = score_bucket(record.github_score) {
            github[bucket] += 1;
        }
        if let Some(bucket) = score_bucket(record.hackerearth_score) {
            hackerearth[bucket] += 1;
        }
    }

    SCORE_BUCKETS
        .iter()
        .enumerate()
        .map(|(index, (range, _))| ScoreBucketEntry {
            range: *range,
            github: github[index],
            hackerearth: hackerearth[index],
        })
        .collect()
}

#[derive(Default)]
struct CollegeScores {
    github: Vec<f64>,
    hackerearth: Vec<f64>,
    cgpa: Vec<f64>,
}

/// Per-college means over the records that actually carry each value; zero or absent values
/// are left out of the denominator. Colleges whose three averages are all zero are dropped.
pub fn average_scores_by_college(records: &[CandidateRecord]) -> Vec<CollegeAverageEntry> {
    let mut order: Vec<String> = Vec::new();
    let mut colleges: HashMap<String, CollegeScores> = HashMap::new();

    for record in records {
        let college = record.college_key();
        if !colleges.contains_key(college) {
            order.push(college.to_string());
        }
        let scores = colleges.entry(college.to_string()).or_default();

        if record.github_score != 0.0 {
            scores.github.push(record.github_score);
        }
        if record.hackerearth_score != 0.0 {
            scores.hackerearth.push(record.hackerearth_score);
        }
        if let Some(cgpa) = record.cgpa.filter(|cgpa| *cgpa != 0.0) {
            scores.cgpa.push(cgpa);
        }
    }

    let mut averages: Vec<CollegeAverageEntry> = order
        .into_iter()
        .filter_map(|college| {
            let scores = colleges.remove(&college)?;
            Some(CollegeAverageEntry {
                avg_github: mean(&scores.github).round(),
                avg_hackerearth: mean(&scores.hackerearth).round(),
                avg_cgpa: (mean(&scores.cgpa) * 100.0).round() / 100.0,
                college,
            })
        })
        .filter(|entry| {
            entry.avg_github != 0.0 || entry.avg_hackerearth != 0.0 || entry.avg_cgpa != 0.0
        })
        .collect();

    averages.sort_by(|a, b| {
        let left = a.avg_github + a.avg_hackerearth;
        let right = b.avg_github + b.avg_hackerearth;
        right.total_cmp(&left)
    });
    averages.truncate(AVERAGE_TOP_N);
    averages
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
