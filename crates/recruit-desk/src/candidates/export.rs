use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::domain::{CandidateDocument, CandidateRecord, InterviewRound};

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Json => "application/json; charset=utf-8",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Rendered export ready to be written to disk or streamed as an attachment.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: String,
    pub rows: usize,
}

pub fn export_file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "candidates_export_{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Renders `records` in the requested format. An empty list is refused.
///
/// `documents` are the store documents behind `records`; the JSON export writes them verbatim.
pub fn export(
    records: &[CandidateRecord],
    documents: &[CandidateDocument],
    format: ExportFormat,
    date: NaiveDate,
) -> Result<ExportArtifact, ExportError> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }

    let body = match format {
        ExportFormat::Csv => to_csv(records)?,
        ExportFormat::Json => to_json(documents)?,
    };

    Ok(ExportArtifact {
        file_name: export_file_name(format, date),
        content_type: format.content_type(),
        body,
        rows: records.len(),
    })
}

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Email")]
    email: &'a str,
    #[serde(rename = "Phone")]
    phone: &'a str,
    #[serde(rename = "College")]
    college: &'a str,
    #[serde(rename = "Branch")]
    branch: &'a str,
    #[serde(rename = "CGPA")]
    cgpa: String,
    #[serde(rename = "GitHub Score")]
    github_score: String,
    #[serde(rename = "HackerEarth Score")]
    hackerearth_score: String,
    #[serde(rename = "Selection Status")]
    selection_status: &'static str,
    #[serde(rename = "Code Quality Score")]
    code_quality_score: String,
    #[serde(rename = "GitHub Followers")]
    followers: u64,
    #[serde(rename = "Public Repos")]
    public_repos: u64,
    #[serde(rename = "Commit Frequency")]
    commit_frequency: &'a str,
    #[serde(rename = "Skills")]
    skills: String,
    #[serde(rename = "Resume URL")]
    resume_url: &'a str,
    #[serde(rename = "GitHub URL")]
    github_url: &'a str,
    #[serde(rename = "Interview Rounds")]
    interview_rounds: String,
}

impl<'a> CsvRow<'a> {
    fn from_record(record: &'a CandidateRecord) -> Self {
        Self {
            name: &record.name,
            email: &record.email,
            phone: &record.phone,
            college: record.college_name.as_deref().unwrap_or_default(),
            branch: record.branch.as_deref().unwrap_or(NOT_AVAILABLE),
            cgpa: record
                .cgpa
                .filter(|cgpa| *cgpa != 0.0)
                .map_or_else(|| NOT_AVAILABLE.to_string(), |cgpa| cgpa.to_string()),
            github_score: record.github_score.to_string(),
            hackerearth_score: record.hackerearth_score.to_string(),
            selection_status: record.selection_status.label(),
            code_quality_score: record.code_quality_score.to_string(),
            followers: record.followers,
            public_repos: record.public_repos,
            commit_frequency: record.commit_frequency.as_deref().unwrap_or(NOT_AVAILABLE),
            skills: join_or_na(record.skills.iter().map(String::as_str)),
            resume_url: &record.resume_url,
            github_url: &record.github_url,
            interview_rounds: join_or_na(record.interview_rounds.iter().map(round_cell)),
        }
    }
}

fn round_cell(round: &InterviewRound) -> String {
    format!("{}: {} ({})", round.round, round.score, round.result.label())
}

fn join_or_na<I, T>(values: I) -> String
where
    I: Iterator<Item = T>,
    T: AsRef<str>,
{
    let joined = values
        .map(|value| value.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("; ");
    if joined.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        joined
    }
}

/// Flattened one-row-per-candidate CSV with a header row.
pub fn to_csv(records: &[CandidateRecord]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(CsvRow::from_record(record))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|error| ExportError::Io(error.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Pretty-printed list of the documents as stored, each with its `id`. No defaults applied.
pub fn to_json(documents: &[CandidateDocument]) -> Result<String, ExportError> {
    let rows: Vec<Value> = documents
        .iter()
        .map(|document| {
            let mut row = Map::with_capacity(document.fields.len() + 1);
            row.insert("id".to_string(), Value::String(document.id.as_str().to_string()));
            for (key, value) in &document.fields {
                if key != "id" {
                    row.insert(key.clone(), value.clone());
                }
            }
            Value::Object(row)
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

/// Error raised while rendering an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no candidates to export")]
    Empty,
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to encode json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to flush export buffer: {0}")]
    Io(std::io::Error),
    #[error("export produced invalid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
