use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::analytics::{AnalyticsReport, DashboardStats};
use super::domain::{
    CandidateId, CandidateRecord, InterviewRound, SelectionStatus, SUGGESTED_ROUND_LABELS,
};
use super::editor::{CandidateDraft, CandidateEditor, EditorError};
use super::export::{export, ExportArtifact, ExportError, ExportFormat};
use super::filter::{apply_filters, FilterCriteria};
use super::roster::{branch_options, college_options, source_documents, Roster};
use super::rounds::RoundSummary;
use super::store::{CandidateStore, StoreError};

/// Service composing the live roster, filter and analytics engines, export, and the editor.
pub struct RecruitmentService<S: ?Sized> {
    store: Arc<S>,
    roster: Roster,
    edit_locks: Mutex<HashMap<CandidateId, Arc<Mutex<()>>>>,
}

/// Filtered candidates with the dashboard counters for the same pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub records: Vec<CandidateRecord>,
    pub stats: DashboardStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateDetail {
    pub record: CandidateRecord,
    pub rounds: RoundSummary,
    pub cgpa_percent: f64,
}

/// Choices offered by the filter and round forms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub colleges: Vec<String>,
    pub branches: Vec<String>,
    pub round_labels: Vec<&'static str>,
}

impl<S> RecruitmentService<S>
where
    S: CandidateStore + ?Sized + 'static,
{
    /// Subscribes to the store; the subscription lives as long as the service.
    pub fn new(store: Arc<S>) -> Result<Self, ServiceError> {
        let roster = Roster::attach(store.as_ref())?;
        info!(
            candidates = roster.records().len(),
            "recruitment service attached to candidate store"
        );
        Ok(Self {
            store,
            roster,
            edit_locks: Mutex::new(HashMap::new()),
        })
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn search(&self, criteria: &FilterCriteria) -> SearchResult {
        let all = self.roster.records();
        let records = apply_filters(&all, criteria);
        let stats = DashboardStats::compute(&all, &records, criteria);
        SearchResult { records, stats }
    }

    pub fn analytics(&self, criteria: &FilterCriteria) -> AnalyticsReport {
        let all = self.roster.records();
        let filtered = apply_filters(&all, criteria);
        AnalyticsReport::build(&all, &filtered)
    }

    /// Exports the candidates matching `criteria`.
    pub fn export(
        &self,
        criteria: &FilterCriteria,
        format: ExportFormat,
        today: NaiveDate,
    ) -> Result<ExportArtifact, ServiceError> {
        let (all, documents) = self.roster.current();
        let filtered = apply_filters(&all, criteria);
        let sources = source_documents(&documents, &filtered);
        let artifact = export(&filtered, &sources, format, today)?;
        info!(
            rows = artifact.rows,
            file = %artifact.file_name,
            "candidate export rendered"
        );
        Ok(artifact)
    }

    pub fn candidate(&self, id: &CandidateId) -> Result<CandidateDetail, ServiceError> {
        let record = self
            .roster
            .find(id)
            .ok_or_else(|| ServiceError::NotFound(id.clone()))?;

        Ok(CandidateDetail {
            rounds: RoundSummary::of(&record.interview_rounds),
            cgpa_percent: record.cgpa_percent(),
            record,
        })
    }

    pub fn filter_options(&self) -> FilterOptions {
        let records = self.roster.records();
        FilterOptions {
            colleges: college_options(&records),
            branches: branch_options(&records),
            round_labels: SUGGESTED_ROUND_LABELS.to_vec(),
        }
    }

    /// Opens an editing session, seeded from the roster when the candidate is already known.
    pub fn editor(&self, id: &CandidateId) -> Result<CandidateEditor<S>, ServiceError> {
        match self.roster.find(id) {
            Some(record) => Ok(CandidateEditor::from_record(self.store.clone(), &record)),
            None => CandidateEditor::open(self.store.clone(), id.clone()).map_err(ServiceError::from),
        }
    }

    pub fn update_score(&self, id: &CandidateId, score: i64) -> Result<CandidateDraft, ServiceError> {
        self.edit(id, |editor| editor.update_score(score))
            .map(|((), draft)| draft)
    }

    pub fn add_round(
        &self,
        id: &CandidateId,
        round: InterviewRound,
    ) -> Result<(usize, CandidateDraft), ServiceError> {
        self.edit(id, |editor| editor.add_round(round))
    }

    pub fn edit_round(
        &self,
        id: &CandidateId,
        position: usize,
        round: InterviewRound,
    ) -> Result<CandidateDraft, ServiceError> {
        self.edit(id, |editor| editor.edit_round(position, round))
            .map(|((), draft)| draft)
    }

    pub fn delete_round(
        &self,
        id: &CandidateId,
        position: usize,
    ) -> Result<(InterviewRound, CandidateDraft), ServiceError> {
        self.edit(id, |editor| editor.delete_round(position))
    }

    pub fn update_status(
        &self,
        id: &CandidateId,
        status: SelectionStatus,
    ) -> Result<CandidateDraft, ServiceError> {
        self.edit(id, |editor| editor.update_status(status))
            .map(|((), draft)| draft)
    }

    /// Runs one read-modify-write against the stored document. Edits to the same candidate
    /// are serialized, so positions and round sequences are always read after the previous
    /// write landed.
    fn edit<T>(
        &self,
        id: &CandidateId,
        operation: impl FnOnce(&mut CandidateEditor<S>) -> Result<T, EditorError>,
    ) -> Result<(T, CandidateDraft), ServiceError> {
        let lock = self.edit_lock(id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut editor = CandidateEditor::open(self.store.clone(), id.clone())?;
        let value = operation(&mut editor)?;
        Ok((value, editor.draft().clone()))
    }

    fn edit_lock(&self, id: &CandidateId) -> Arc<Mutex<()>> {
        self.edit_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(id.clone())
            .or_default()
            .clone()
    }
}

/// Error raised by the recruitment service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("candidate {0} not found")]
    NotFound(CandidateId),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::Store(StoreError::NotFound(_))
                | Self::Editor(EditorError::NotFound(_))
                | Self::Editor(EditorError::Store(StoreError::NotFound(_)))
        )
    }
}
