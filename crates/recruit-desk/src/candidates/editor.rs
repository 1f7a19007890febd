use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use super::domain::{CandidateId, CandidateRecord, InterviewRound, SelectionStatus};
use super::normalizer::normalize;
use super::store::{CandidatePatch, CandidateStore, CandidateUpdate, StoreError};

/// Local copy of the fields the dashboard may change on one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateDraft {
    pub hackerearth_score: f64,
    pub interview_rounds: Vec<InterviewRound>,
    pub selection_status: SelectionStatus,
}

impl From<&CandidateRecord> for CandidateDraft {
    fn from(record: &CandidateRecord) -> Self {
        Self {
            hackerearth_score: record.hackerearth_score,
            interview_rounds: record.interview_rounds.clone(),
            selection_status: record.selection_status,
        }
    }
}

/// Editing session for a single candidate. Each operation sends exactly one partial update and
/// only touches the draft once the store has accepted it.
pub struct CandidateEditor<S: ?Sized> {
    store: Arc<S>,
    candidate_id: CandidateId,
    draft: CandidateDraft,
}

impl<S> CandidateEditor<S>
where
    S: CandidateStore + ?Sized,
{
    /// Loads the candidate once from the store.
    pub fn open(store: Arc<S>, candidate_id: CandidateId) -> Result<Self, EditorError> {
        let document = store
            .fetch(&candidate_id)?
            .ok_or_else(|| EditorError::NotFound(candidate_id.clone()))?;
        let record = normalize(&document);
        Ok(Self::from_record(store, &record))
    }

    pub fn from_record(store: Arc<S>, record: &CandidateRecord) -> Self {
        Self {
            store,
            candidate_id: record.id.clone(),
            draft: CandidateDraft::from(record),
        }
    }

    pub fn candidate_id(&self) -> &CandidateId {
        &self.candidate_id
    }

    pub fn draft(&self) -> &CandidateDraft {
        &self.draft
    }

    /// Replaces the draft with a freshly pushed copy of the record.
    pub fn sync_from(&mut self, record: &CandidateRecord) {
        if record.id == self.candidate_id {
            self.draft = CandidateDraft::from(record);
        }
    }

    pub fn update_score(&mut self, score: i64) -> Result<(), EditorError> {
        self.write(CandidatePatch::HackerearthScore(score))?;
        self.draft.hackerearth_score = score as f64;
        Ok(())
    }

    /// Appends a round and returns its position.
    pub fn add_round(&mut self, round: InterviewRound) -> Result<usize, EditorError> {
        if round.round.trim().is_empty() {
            return Err(EditorError::EmptyRoundLabel);
        }

        let mut rounds = self.draft.interview_rounds.clone();
        rounds.push(round);
        let position = rounds.len() - 1;
        self.write_rounds(rounds)?;
        Ok(position)
    }

    pub fn edit_round(&mut self, position: usize, round: InterviewRound) -> Result<(), EditorError> {
        self.check_position(position)?;

        let mut rounds = self.draft.interview_rounds.clone();
        rounds[position] = round;
        self.write_rounds(rounds)
    }

    /// Removes the round at `position`; later rounds shift down by one.
    pub fn delete_round(&mut self, position: usize) -> Result<InterviewRound, EditorError> {
        self.check_position(position)?;

        let mut rounds = self.draft.interview_rounds.clone();
        let removed = rounds.remove(position);
        self.write_rounds(rounds)?;
        Ok(removed)
    }

    pub fn update_status(&mut self, status: SelectionStatus) -> Result<(), EditorError> {
        self.write(CandidatePatch::SelectionStatus(status))?;
        self.draft.selection_status = status;
        Ok(())
    }

    fn check_position(&self, position: usize) -> Result<(), EditorError> {
        let len = self.draft.interview_rounds.len();
        if position >= len {
            return Err(EditorError::RoundOutOfRange { position, len });
        }
        Ok(())
    }

    fn write_rounds(&mut self, rounds: Vec<InterviewRound>) -> Result<(), EditorError> {
        self.write(CandidatePatch::InterviewRounds(rounds.clone()))?;
        self.draft.interview_rounds = rounds;
        Ok(())
    }

    fn write(&self, patch: CandidatePatch) -> Result<(), EditorError> {
        let field = patch.field();
        match self
            .store
            .apply(&self.candidate_id, CandidateUpdate::new(patch))
        {
            Ok(()) => {
                debug!(candidate = %self.candidate_id, field, "candidate update saved");
                Ok(())
            }
            Err(error) => {
                warn!(candidate = %self.candidate_id, field, %error, "candidate update failed");
                Err(error.into())
            }
        }
    }
}

/// Error raised by editor operations.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("candidate {0} not found")]
    NotFound(CandidateId),
    #[error("interview round label must not be empty")]
    EmptyRoundLabel,
    #[error("interview round {position} does not exist (candidate has {len} rounds)")]
    RoundOutOfRange { position: usize, len: usize },
    #[error(transparent)]
    Store(#[from] StoreError),
}
