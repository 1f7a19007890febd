use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};

use super::domain::{
    CandidateDocument, CandidateRecord, InterviewRound, RoundResult, SelectionStatus,
};

/// Document keys with a typed counterpart on [`CandidateRecord`].
const TYPED_FIELDS: [&str; 22] = [
    "id",
    "student_id",
    "name",
    "email",
    "phone",
    "college_name",
    "branch",
    "cgpa",
    "github_score",
    "github_overall_score",
    "hackerearth_score",
    "skills",
    "selection_status",
    "interview_rounds",
    "resume_url",
    "github_url",
    "code_quality_score",
    "followers",
    "public_repos",
    "commit_frequency",
    "created_at",
    "updated_at",
];

/// Turns a raw store document into a fully-defaulted record. Never fails: missing or
/// malformed fields fall back to their defaults.
pub fn normalize(document: &CandidateDocument) -> CandidateRecord {
    let fields = &document.fields;

    let attributes: BTreeMap<String, Value> = fields
        .iter()
        .filter(|(key, _)| !TYPED_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    CandidateRecord {
        id: document.id.clone(),
        student_id: count(fields.get("student_id")),
        name: text(fields.get("name")).unwrap_or_default(),
        email: text(fields.get("email")).unwrap_or_default(),
        phone: text(fields.get("phone")).unwrap_or_default(),
        college_name: text(fields.get("college_name")),
        branch: text(fields.get("branch")),
        cgpa: number(fields.get("cgpa")),
        github_score: github_score(fields),
        hackerearth_score: number(fields.get("hackerearth_score")).unwrap_or(0.0),
        skills: skills(fields.get("skills")),
        selection_status: fields
            .get("selection_status")
            .and_then(Value::as_str)
            .and_then(SelectionStatus::parse)
            .unwrap_or_default(),
        interview_rounds: interview_rounds(fields.get("interview_rounds")),
        resume_url: text(fields.get("resume_url")).unwrap_or_default(),
        github_url: text(fields.get("github_url")).unwrap_or_default(),
        code_quality_score: number(fields.get("code_quality_score")).unwrap_or(0.0),
        followers: count(fields.get("followers")).unwrap_or(0),
        public_repos: count(fields.get("public_repos")).unwrap_or(0),
        commit_frequency: commit_frequency(fields.get("commit_frequency")),
        created_at: text(fields.get("created_at")),
        updated_at: text(fields.get("updated_at")),
        attributes,
    }
}

pub fn normalize_all(documents: &[CandidateDocument]) -> Vec<CandidateRecord> {
    documents.iter().map(normalize).collect()
}

/// Primary `github_score`, then the legacy `github_overall_score`, then zero. A zero primary
/// counts as unset.
fn github_score(fields: &Map<String, Value>) -> f64 {
    number(fields.get("github_score"))
        .filter(|score| *score != 0.0)
        .or_else(|| number(fields.get("github_overall_score")).filter(|score| *score != 0.0))
        .unwrap_or(0.0)
}

fn interview_rounds(value: Option<&Value>) -> Vec<InterviewRound> {
    value
        .and_then(Value::as_array)
        .map(|rounds| {
            rounds
                .iter()
                .filter_map(Value::as_object)
                .map(interview_round)
                .collect()
        })
        .unwrap_or_default()
}

fn interview_round(fields: &Map<String, Value>) -> InterviewRound {
    InterviewRound {
        round: text(fields.get("round")).unwrap_or_default(),
        score: number(fields.get("score")).unwrap_or(0.0),
        result: fields
            .get("result")
            .and_then(Value::as_str)
            .and_then(RoundResult::parse)
            .unwrap_or_default(),
        reviewer: text(fields.get("reviewer")),
        notes: text(fields.get("notes")),
        date: fields.get("date").and_then(Value::as_str).and_then(parse_date),
    }
}

fn skills(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(joined)) => joined
            .split(',')
            .map(str::trim)
            .filter(|skill| !skill.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn commit_frequency(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::Number(number)) => Some(number.to_string()),
        other => text(other),
    }
}

/// Numbers or numeric strings; anything else (including NaN) is absent.
pub(crate) fn number(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|value| value.is_finite())
}

fn count(value: Option<&Value>) -> Option<u64> {
    number(value)
        .filter(|value| *value >= 0.0)
        .map(|value| value.round() as u64)
}

/// Non-blank strings only.
fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|raw| !raw.trim().is_empty())
        .map(str::to_string)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(fields: Value) -> CandidateDocument {
        let Value::Object(fields) = fields else {
            panic!("fixture must be an object");
        };
        CandidateDocument::new("cand-1", fields)
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let record = normalize(&document(json!({})));

        assert_eq!(record.name, "");
        assert_eq!(record.college_name, None);
        assert_eq!(record.cgpa, None);
        assert_eq!(record.github_score, 0.0);
        assert_eq!(record.hackerearth_score, 0.0);
        assert_eq!(record.selection_status, SelectionStatus::Pending);
        assert!(record.interview_rounds.is_empty());
        assert!(record.attributes.is_empty());
    }

    #[test]
    fn github_score_prefers_primary_then_legacy_field() {
        let primary = normalize(&document(
            json!({ "github_score": 72, "github_overall_score": 40 }),
        ));
        assert_eq!(primary.github_score, 72.0);

        let legacy = normalize(&document(json!({ "github_overall_score": 40 })));
        assert_eq!(legacy.github_score, 40.0);

        let zero_primary = normalize(&document(
            json!({ "github_score": 0, "github_overall_score": 55 }),
        ));
        assert_eq!(zero_primary.github_score, 55.0);
    }

    #[test]
    fn malformed_values_are_tolerated() {
        let record = normalize(&document(json!({
            "cgpa": "8.25",
            "hackerearth_score": "not a number",
            "selection_status": "on hold",
            "skills": ["Rust", 42, null, "Go"],
            "interview_rounds": [
                { "round": "L1", "score": "64", "result": "PASS", "date": "2025-03-14" },
                "garbage",
                { "score": 10, "result": "maybe", "date": "yesterday" }
            ],
            "commit_frequency": 12
        })));

        assert_eq!(record.cgpa, Some(8.25));
        assert_eq!(record.hackerearth_score, 0.0);
        assert_eq!(record.selection_status, SelectionStatus::Pending);
        assert_eq!(record.skills, vec!["Rust".to_string(), "Go".to_string()]);
        assert_eq!(record.interview_rounds.len(), 2);
        assert_eq!(record.interview_rounds[0].result, RoundResult::Pass);
        assert_eq!(record.interview_rounds[0].score, 64.0);
        assert_eq!(
            record.interview_rounds[0].date,
            NaiveDate::from_ymd_opt(2025, 3, 14)
        );
        assert_eq!(record.interview_rounds[1].round, "");
        assert_eq!(record.interview_rounds[1].result, RoundResult::Pending);
        assert_eq!(record.interview_rounds[1].date, None);
        assert_eq!(record.commit_frequency.as_deref(), Some("12"));
    }

    #[test]
    fn blank_college_and_branch_are_absent() {
        let record = normalize(&document(json!({ "college_name": "  ", "branch": null })));
        assert_eq!(record.college_key(), "Unknown");
        assert_eq!(record.branch_key(), "Unknown");
    }

    #[test]
    fn untyped_attributes_are_preserved() {
        let record = normalize(&document(json!({
            "name": "Asha",
            "executive_summary": "Strong systems background",
            "updated_at": "2025-01-01T00:00:00Z"
        })));

        assert_eq!(
            record.attributes.get("executive_summary"),
            Some(&json!("Strong systems background"))
        );
        assert!(!record.attributes.contains_key("updated_at"));
        assert_eq!(record.updated_at.as_deref(), Some("2025-01-01T00:00:00Z"));
    }
}
