use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use recruit_desk::candidates::{
    CandidateDocument, ExportFormat, FilterCriteria, MemoryCandidateStore,
};
use recruit_desk::error::AppError;
use serde::de::Error as _;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) filters: Arc<SavedFilters>,
}

/// Last applied filter criteria, optionally mirrored to a JSON file.
pub(crate) struct SavedFilters {
    path: Option<PathBuf>,
    current: RwLock<FilterCriteria>,
}

impl SavedFilters {
    /// Restores the persisted criteria. A missing or unreadable file yields the defaults.
    pub(crate) fn load(path: Option<PathBuf>) -> Self {
        let current = path
            .as_deref()
            .map(read_filters)
            .unwrap_or_default();

        Self {
            path,
            current: RwLock::new(current),
        }
    }

    pub(crate) fn current(&self) -> FilterCriteria {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn replace(&self, criteria: FilterCriteria) -> Result<(), AppError> {
        if let Some(path) = &self.path {
            std::fs::write(path, criteria.to_persisted())?;
        }
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = criteria;
        Ok(())
    }
}

pub(crate) fn read_filters(path: &Path) -> FilterCriteria {
    match std::fs::read_to_string(path) {
        Ok(raw) => FilterCriteria::from_persisted(&raw),
        Err(err) => {
            if path.exists() {
                warn!(path = %path.display(), %err, "saved filters unreadable, using defaults");
            }
            FilterCriteria::default()
        }
    }
}

/// Reads seed documents: either an array of objects carrying an `id`, or an object keyed by
/// document id.
pub(crate) fn load_documents(path: &Path) -> Result<Vec<CandidateDocument>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let documents = parse_documents(&raw)?;
    info!(path = %path.display(), count = documents.len(), "candidate roster loaded");
    Ok(documents)
}

pub(crate) fn parse_documents(raw: &str) -> Result<Vec<CandidateDocument>, serde_json::Error> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value::<CandidateDocument>)
            .collect(),
        Value::Object(entries) => entries
            .into_iter()
            .map(|(id, fields)| match fields {
                Value::Object(fields) => Ok(CandidateDocument::new(id, fields)),
                _ => Err(serde_json::Error::custom(format!(
                    "candidate '{id}' must be a JSON object"
                ))),
            })
            .collect(),
        _ => Err(serde_json::Error::custom(
            "roster must be a JSON array or object",
        )),
    }
}

pub(crate) fn build_store(seed: Option<&Path>) -> Result<MemoryCandidateStore, AppError> {
    match seed {
        Some(path) => Ok(MemoryCandidateStore::with_documents(load_documents(path)?)),
        None => Ok(MemoryCandidateStore::default()),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_format(raw: &str) -> Result<ExportFormat, String> {
    ExportFormat::parse(raw).ok_or_else(|| format!("unsupported export format '{raw}' (csv|json)"))
}
