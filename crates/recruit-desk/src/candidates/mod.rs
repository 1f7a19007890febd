//! Candidate roster: normalization of store documents, the filter and analytics engines,
//! exports, and the single-record editor.

pub mod analytics;
pub mod domain;
pub mod editor;
pub mod export;
pub mod filter;
pub mod memory;
pub(crate) mod normalizer;
pub mod roster;
pub mod rounds;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use analytics::{AnalyticsReport, DashboardStats};
pub use domain::{
    CandidateDocument, CandidateId, CandidateRecord, InterviewRound, RoundResult,
    SelectionStatus, SUGGESTED_ROUND_LABELS,
};
pub use editor::{CandidateDraft, CandidateEditor, EditorError};
pub use export::{ExportArtifact, ExportError, ExportFormat};
pub use filter::{apply_filters, FilterCriteria, FilterSession, ResultFilter, StatusFilter};
pub use memory::MemoryCandidateStore;
pub use normalizer::{normalize, normalize_all};
pub use roster::Roster;
pub use rounds::{RoundSummary, RoundTally};
pub use router::candidate_router;
pub use service::{CandidateDetail, FilterOptions, RecruitmentService, SearchResult, ServiceError};
pub use store::{
    CandidatePatch, CandidateStore, CandidateUpdate, SnapshotListener, StoreError, Subscription,
};
