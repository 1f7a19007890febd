use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier wrapper for candidate documents held by the record store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

impl CandidateId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw document as delivered by the record store, before any defaults are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDocument {
    pub id: CandidateId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl CandidateDocument {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: CandidateId(id.into()),
            fields,
        }
    }
}

/// Hiring decision tracked per candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStatus {
    Selected,
    #[default]
    Pending,
    Rejected,
}

impl SelectionStatus {
    /// Dashboard ordering used for status buckets.
    pub const fn ordered() -> [Self; 3] {
        [Self::Selected, Self::Pending, Self::Rejected]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Selected => "selected",
            Self::Pending => "pending",
            Self::Rejected => "rejected",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Selected => "Selected",
            Self::Pending => "Pending",
            Self::Rejected => "Rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "selected" => Some(Self::Selected),
            "pending" => Some(Self::Pending),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Outcome recorded for a single interview round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundResult {
    Pass,
    Fail,
    #[default]
    Pending,
}

impl RoundResult {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Pending => "pending",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pass" => Some(Self::Pass),
            "fail" => Some(Self::Fail),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// Round names offered by the editor form. Any other label is accepted as well.
pub const SUGGESTED_ROUND_LABELS: [&str; 4] = ["Group Discussion", "L1", "L2", "Final"];

/// One interview round. Rounds have no identity beyond their position in the owning record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewRound {
    pub round: String,
    pub score: f64,
    pub result: RoundResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl InterviewRound {
    pub fn new(round: impl Into<String>, score: f64, result: RoundResult) -> Self {
        Self {
            round: round.into(),
            score,
            result,
            reviewer: None,
            notes: None,
            date: None,
        }
    }
}

/// Fully-defaulted candidate produced by the normalizer. Filters, analytics, and the editor
/// only ever see this shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateRecord {
    pub id: CandidateId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<u64>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub college_name: Option<String>,
    pub branch: Option<String>,
    pub cgpa: Option<f64>,
    pub github_score: f64,
    pub hackerearth_score: f64,
    pub skills: Vec<String>,
    pub selection_status: SelectionStatus,
    pub interview_rounds: Vec<InterviewRound>,
    pub resume_url: String,
    pub github_url: String,
    pub code_quality_score: f64,
    pub followers: u64,
    pub public_repos: u64,
    pub commit_frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Document attributes without a typed field, carried through to the API views.
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

pub const UNKNOWN_GROUP: &str = "Unknown";

impl CandidateRecord {
    pub fn cgpa_or_zero(&self) -> f64 {
        self.cgpa.unwrap_or(0.0)
    }

    /// CGPA on a 0-10 scale as a percentage, capped at 100.
    pub fn cgpa_percent(&self) -> f64 {
        (self.cgpa_or_zero() / 10.0 * 100.0).clamp(0.0, 100.0)
    }

    pub fn college_key(&self) -> &str {
        self.college_name.as_deref().unwrap_or(UNKNOWN_GROUP)
    }

    pub fn branch_key(&self) -> &str {
        self.branch.as_deref().unwrap_or(UNKNOWN_GROUP)
    }
}
