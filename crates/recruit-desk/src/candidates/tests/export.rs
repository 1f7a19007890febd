use super::common::*;
use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::candidates::export::{export, to_csv, ExportError, ExportFormat};
use crate::candidates::filter::FilterCriteria;
use crate::candidates::normalizer::{normalize, normalize_all};

fn export_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date")
}

#[test]
fn empty_list_is_refused() {
    let result = export(&[], &[], ExportFormat::Csv, export_date());
    assert!(matches!(result, Err(ExportError::Empty)));
}

#[test]
fn csv_flattens_rounds_skills_and_missing_values() {
    let documents = roster_documents();
    let records = normalize_all(&documents);
    let artifact =
        export(&records, &documents, ExportFormat::Csv, export_date()).expect("csv export");

    assert_eq!(artifact.file_name, "candidates_export_2025-03-14.csv");
    assert_eq!(artifact.rows, 5);
    assert!(artifact.content_type.starts_with("text/csv"));

    let mut reader = csv::Reader::from_reader(artifact.body.as_bytes());
    let headers = reader.headers().expect("headers").clone();
    assert_eq!(&headers[0], "Name");
    assert_eq!(&headers[16], "Interview Rounds");

    let rows: Vec<csv::StringRecord> = reader.records().map(|row| row.expect("row")).collect();
    assert_eq!(rows.len(), 5);

    let asha = &rows[0];
    assert_eq!(&asha[0], "Asha Rao");
    assert_eq!(&asha[5], "9.1");
    assert_eq!(&asha[6], "85");
    assert_eq!(&asha[13], "Rust; React");
    assert_eq!(&asha[16], "L1: 80 (pass); L2: 72 (pass)");

    let rahul = &rows[1];
    assert_eq!(&rahul[6], "40");
    assert_eq!(&rahul[8], "pending");

    let meera = &rows[2];
    assert_eq!(&meera[16], "N/A");

    let kabir = &rows[3];
    assert_eq!(&kabir[4], "N/A");
    assert_eq!(&kabir[5], "N/A");
    assert_eq!(&kabir[12], "N/A");
    assert_eq!(&kabir[13], "N/A");
}

#[test]
fn csv_quotes_embedded_delimiters() {
    let record = normalize(&document(
        "q",
        json!({ "name": "Rao, Asha", "skills": ["C, C++"] }),
    ));
    let body = to_csv(&[record]).expect("csv");

    let mut reader = csv::Reader::from_reader(body.as_bytes());
    let row = reader
        .records()
        .next()
        .expect("one row")
        .expect("valid row");
    assert_eq!(&row[0], "Rao, Asha");
    assert_eq!(&row[13], "C, C++");
}

#[test]
fn json_export_keeps_extra_attributes() {
    let documents = roster_documents();
    let records = normalize_all(&documents);
    let artifact = export(&records[4..], &documents[4..], ExportFormat::Json, export_date())
        .expect("json export");

    assert_eq!(artifact.file_name, "candidates_export_2025-03-14.json");
    assert!(artifact.body.contains("\n  "));

    let payload: Value = serde_json::from_str(&artifact.body).expect("json body");
    let first = &payload[0];
    assert_eq!(first["id"], json!("c5"));
    assert_eq!(first["linkedin"], json!("https://linkedin.example/zoya"));
    assert_eq!(first["selection_status"], json!("selected"));
}

#[test]
fn json_export_writes_documents_as_stored() {
    let documents = vec![document(
        "raw",
        json!({
            "name": "Ira Das",
            "github_overall_score": 40,
            "cgpa": "8.25",
            "selection_status": "on hold",
            "interview_rounds": [
                { "round": "L1", "score": 70, "result": "pass" },
                "not a round"
            ]
        }),
    )];
    let records = normalize_all(&documents);
    let artifact =
        export(&records, &documents, ExportFormat::Json, export_date()).expect("json export");

    let payload: Value = serde_json::from_str(&artifact.body).expect("json body");
    let row = &payload[0];
    assert_eq!(row["id"], json!("raw"));
    assert_eq!(row["github_overall_score"], json!(40));
    assert_eq!(row["cgpa"], json!("8.25"));
    assert_eq!(row["selection_status"], json!("on hold"));
    assert_eq!(row["interview_rounds"][1], json!("not a round"));
    assert!(row.get("github_score").is_none());
    assert!(row.get("hackerearth_score").is_none());
}

#[test]
fn service_json_export_follows_the_filtered_roster() {
    let (service, _store) = build_service();
    let criteria = FilterCriteria {
        colleges: vec!["NIT Trichy".to_string()],
        ..FilterCriteria::default()
    };

    let artifact = service
        .export(&criteria, ExportFormat::Json, export_date())
        .expect("json export");
    assert_eq!(artifact.rows, 2);

    let payload: Value = serde_json::from_str(&artifact.body).expect("json body");
    assert_eq!(payload[0]["id"], json!("c2"));
    assert_eq!(payload[0]["github_overall_score"], json!(40));
    assert_eq!(payload[0]["skills"], json!("Python, Django"));
    assert_eq!(payload[1]["id"], json!("c5"));
}

#[test]
fn format_parsing_accepts_known_names() {
    assert_eq!(ExportFormat::parse("CSV"), Some(ExportFormat::Csv));
    assert_eq!(ExportFormat::parse("json"), Some(ExportFormat::Json));
    assert_eq!(ExportFormat::parse("xlsx"), None);
}
