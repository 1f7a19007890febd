use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::super::domain::{RoundResult, SelectionStatus};
use super::super::normalizer::number;

/// Sentinel used by the round-label filter to mean "no restriction".
pub const ANY_ROUND: &str = "all";

/// Selection status filter; `All` disables the category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Selected,
    Pending,
    Rejected,
}

impl StatusFilter {
    pub fn status(self) -> Option<SelectionStatus> {
        match self {
            Self::All => None,
            Self::Selected => Some(SelectionStatus::Selected),
            Self::Pending => Some(SelectionStatus::Pending),
            Self::Rejected => Some(SelectionStatus::Rejected),
        }
    }
}

impl From<SelectionStatus> for StatusFilter {
    fn from(status: SelectionStatus) -> Self {
        match status {
            SelectionStatus::Selected => Self::Selected,
            SelectionStatus::Pending => Self::Pending,
            SelectionStatus::Rejected => Self::Rejected,
        }
    }
}

/// Interview result filter; `All` disables the category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultFilter {
    #[default]
    All,
    Pass,
    Fail,
    Pending,
}

impl ResultFilter {
    pub fn result(self) -> Option<RoundResult> {
        match self {
            Self::All => None,
            Self::Pass => Some(RoundResult::Pass),
            Self::Fail => Some(RoundResult::Fail),
            Self::Pending => Some(RoundResult::Pending),
        }
    }
}

/// Snapshot of every predicate input. Pure data, persisted as JSON by the view layer.
///
/// Deserialization is forgiving: missing fields take their defaults, malformed values fall
/// back to the inactive setting, and numeric strings are accepted for thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    #[serde(deserialize_with = "or_default")]
    pub search: String,
    #[serde(deserialize_with = "or_default")]
    pub colleges: Vec<String>,
    #[serde(deserialize_with = "or_default")]
    pub branch: String,
    #[serde(deserialize_with = "or_default")]
    pub selection_status: StatusFilter,
    #[serde(deserialize_with = "threshold")]
    pub min_cgpa: Option<f64>,
    #[serde(deserialize_with = "threshold")]
    pub min_github_score: Option<f64>,
    #[serde(deserialize_with = "threshold")]
    pub min_hackerearth_score: Option<f64>,
    #[serde(deserialize_with = "or_default")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "round_label")]
    pub interview_round: String,
    #[serde(deserialize_with = "or_default")]
    pub interview_result: ResultFilter,
    #[serde(deserialize_with = "threshold")]
    pub min_interview_score: Option<f64>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search: String::new(),
            colleges: Vec::new(),
            branch: String::new(),
            selection_status: StatusFilter::All,
            min_cgpa: None,
            min_github_score: None,
            min_hackerearth_score: None,
            skills: Vec::new(),
            interview_round: ANY_ROUND.to_string(),
            interview_result: ResultFilter::All,
            min_interview_score: None,
        }
    }
}

impl FilterCriteria {
    /// Restores persisted criteria, merging with defaults. Unreadable input yields the
    /// default criteria instead of an error.
    pub fn from_persisted(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    pub fn to_persisted(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn round_filter(&self) -> Option<&str> {
        if self.interview_round == ANY_ROUND {
            None
        } else {
            Some(self.interview_round.as_str())
        }
    }

    /// Number of categories currently constraining the roster.
    pub fn active_count(&self) -> usize {
        [
            !self.search.is_empty(),
            !self.colleges.is_empty(),
            !self.branch.is_empty(),
            self.selection_status != StatusFilter::All,
            self.min_cgpa.is_some(),
            self.min_github_score.is_some(),
            self.min_hackerearth_score.is_some(),
            !self.skills.is_empty(),
            self.round_filter().is_some(),
            self.interview_result != ResultFilter::All,
            self.min_interview_score.is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn is_unrestricted(&self) -> bool {
        self.active_count() == 0
    }
}

/// Parses threshold text typed into a filter form. Blank or non-numeric text means no
/// constraint.
pub fn parse_threshold(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Splits the comma separated skills input into trimmed, non-empty entries.
pub fn parse_skills_input(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect()
}

fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn threshold<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number(Some(&value)))
}

fn round_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| ANY_ROUND.to_string()))
}
