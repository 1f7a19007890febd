use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::domain::{CandidateDocument, CandidateId, InterviewRound, SelectionStatus};

/// Record store seam. Implementations wrap the managed document database; the realtime
/// transport behind `subscribe` is theirs to provide.
pub trait CandidateStore: Send + Sync {
    /// Registers a listener that receives the full document set on every change. The listener
    /// stays registered until the returned [`Subscription`] is dropped.
    fn subscribe(&self, listener: Arc<dyn SnapshotListener>) -> Result<Subscription, StoreError>;

    /// Reads one document outside the subscription.
    fn fetch(&self, id: &CandidateId) -> Result<Option<CandidateDocument>, StoreError>;

    /// Merges the update into the document; fields outside the patch are left untouched.
    /// Single attempt, no retry.
    fn apply(&self, id: &CandidateId, update: CandidateUpdate) -> Result<(), StoreError>;
}

/// Callbacks driven by a live subscription.
pub trait SnapshotListener: Send + Sync {
    fn on_snapshot(&self, documents: Vec<CandidateDocument>);
    fn on_error(&self, error: StoreError);
}

/// Releases its subscription when dropped.
pub struct Subscription {
    cancel: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl Subscription {
    pub fn new<F>(cancel: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            cancel: Mutex::new(Some(Box::new(cancel))),
        }
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let slot = self.cancel.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(cancel) = slot.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

/// The field groups the dashboard is allowed to change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidatePatch {
    HackerearthScore(i64),
    InterviewRounds(Vec<InterviewRound>),
    SelectionStatus(SelectionStatus),
}

impl CandidatePatch {
    pub const fn field(&self) -> &'static str {
        match self {
            Self::HackerearthScore(_) => "hackerearth_score",
            Self::InterviewRounds(_) => "interview_rounds",
            Self::SelectionStatus(_) => "selection_status",
        }
    }

    fn value(&self) -> Result<Value, serde_json::Error> {
        match self {
            Self::HackerearthScore(score) => Ok(Value::from(*score)),
            Self::InterviewRounds(rounds) => serde_json::to_value(rounds),
            Self::SelectionStatus(status) => Ok(Value::from(status.label())),
        }
    }
}

/// Marker asking the store to stamp `updated_at` with its own clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerTimestamp;

/// One partial write: a single field group plus the last-modified stamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateUpdate {
    pub patch: CandidatePatch,
    pub updated_at: ServerTimestamp,
}

impl CandidateUpdate {
    pub fn new(patch: CandidatePatch) -> Self {
        Self {
            patch,
            updated_at: ServerTimestamp,
        }
    }

    /// Document fields to merge, with the server timestamp resolved to `now`.
    pub fn into_fields(self, now: DateTime<Utc>) -> Result<Map<String, Value>, StoreError> {
        let mut fields = Map::new();
        fields.insert(self.patch.field().to_string(), self.patch.value()?);
        fields.insert(
            "updated_at".to_string(),
            Value::from(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        Ok(fields)
    }
}

/// Error enumeration for store transport failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("candidate {0} not found")]
    NotFound(CandidateId),
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error("subscription failed: {0}")]
    Subscription(String),
    #[error("could not encode update: {0}")]
    Encoding(#[from] serde_json::Error),
}
