use serde::Serialize;

use super::domain::{InterviewRound, RoundResult, UNKNOWN_GROUP};

/// Pass/fail/pending tally across a candidate's rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoundTally {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pending: usize,
}

impl RoundTally {
    pub fn of(rounds: &[InterviewRound]) -> Self {
        rounds.iter().fold(
            Self {
                total: rounds.len(),
                ..Self::default()
            },
            |mut tally, round| {
                match round.result {
                    RoundResult::Pass => tally.passed += 1,
                    RoundResult::Fail => tally.failed += 1,
                    RoundResult::Pending => tally.pending += 1,
                }
                tally
            },
        )
    }
}

/// Rounds sharing a label, e.g. several reviewers each running an "L1".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundGroup {
    pub label: String,
    /// Positions in the owning record's sequence, usable for edit and delete.
    pub positions: Vec<usize>,
    pub average_score: i64,
    pub reviewers: Vec<String>,
    pub overall: RoundResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundSummary {
    pub tally: RoundTally,
    pub groups: Vec<RoundGroup>,
}

impl RoundSummary {
    pub fn of(rounds: &[InterviewRound]) -> Self {
        Self {
            tally: RoundTally::of(rounds),
            groups: group_rounds(rounds),
        }
    }
}

/// Groups rounds by label in first-seen order. A group fails if any round failed, stays pending
/// while any round is pending, and passes otherwise.
pub fn group_rounds(rounds: &[InterviewRound]) -> Vec<RoundGroup> {
    let mut groups: Vec<RoundGroup> = Vec::new();

    for (position, round) in rounds.iter().enumerate() {
        let label = if round.round.is_empty() {
            UNKNOWN_GROUP
        } else {
            round.round.as_str()
        };

        let index = match groups.iter().position(|group| group.label == label) {
            Some(index) => index,
            None => {
                groups.push(RoundGroup {
                    label: label.to_string(),
                    positions: Vec::new(),
                    average_score: 0,
                    reviewers: Vec::new(),
                    overall: RoundResult::Pending,
                });
                groups.len() - 1
            }
        };

        let group = &mut groups[index];
        group.positions.push(position);
        if let Some(reviewer) = &round.reviewer {
            if !group.reviewers.contains(reviewer) {
                group.reviewers.push(reviewer.clone());
            }
        }
    }

    for group in &mut groups {
        let members: Vec<&InterviewRound> = group
            .positions
            .iter()
            .map(|position| &rounds[*position])
            .collect();

        let total: f64 = members.iter().map(|round| round.score).sum();
        group.average_score = (total / members.len() as f64).round() as i64;

        group.overall = if members.iter().any(|round| round.result == RoundResult::Fail) {
            RoundResult::Fail
        } else if members
            .iter()
            .any(|round| round.result == RoundResult::Pending)
        {
            RoundResult::Pending
        } else {
            RoundResult::Pass
        };
    }

    groups
}
