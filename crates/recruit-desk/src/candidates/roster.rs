use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use super::domain::{CandidateDocument, CandidateId, CandidateRecord};
use super::normalizer::normalize_all;
use super::store::{CandidateStore, SnapshotListener, StoreError, Subscription};

/// Live, normalized view of the candidate collection. Holds the store subscription and
/// releases it when dropped.
pub struct Roster {
    state: Arc<RosterState>,
    _subscription: Subscription,
}

/// Documents as pushed by the store and their normalized records, index for index.
#[derive(Default, Clone)]
struct Snapshot {
    documents: Arc<Vec<CandidateDocument>>,
    records: Arc<Vec<CandidateRecord>>,
}

#[derive(Default)]
struct RosterState {
    snapshot: RwLock<Snapshot>,
    last_error: RwLock<Option<String>>,
    revision: AtomicU64,
}

impl SnapshotListener for RosterState {
    fn on_snapshot(&self, documents: Vec<CandidateDocument>) {
        let records = Arc::new(normalize_all(&documents));
        let count = records.len();
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Snapshot {
            documents: Arc::new(documents),
            records,
        };
        *self.last_error.write().unwrap_or_else(PoisonError::into_inner) = None;
        let revision = self.revision.fetch_add(1, Ordering::AcqRel) + 1;
        info!(count, revision, "candidate roster refreshed");
    }

    fn on_error(&self, error: StoreError) {
        warn!(%error, "candidate subscription failed");
        *self.last_error.write().unwrap_or_else(PoisonError::into_inner) = Some(error.to_string());
    }
}

impl Roster {
    pub fn attach<S>(store: &S) -> Result<Self, StoreError>
    where
        S: CandidateStore + ?Sized,
    {
        let state = Arc::new(RosterState::default());
        let listener: Arc<dyn SnapshotListener> = state.clone();
        let subscription = store.subscribe(listener)?;

        Ok(Self {
            state,
            _subscription: subscription,
        })
    }

    /// Current snapshot. Callers get an immutable handle; later pushes swap in a new one.
    pub fn records(&self) -> Arc<Vec<CandidateRecord>> {
        self.snapshot().records
    }

    /// Records and the documents they were normalized from, taken from the same push.
    pub fn current(&self) -> (Arc<Vec<CandidateRecord>>, Arc<Vec<CandidateDocument>>) {
        let snapshot = self.snapshot();
        (snapshot.records, snapshot.documents)
    }

    fn snapshot(&self) -> Snapshot {
        self.state
            .snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn find(&self, id: &CandidateId) -> Option<CandidateRecord> {
        self.records().iter().find(|record| record.id == *id).cloned()
    }

    /// Message of the most recent transport failure, cleared by the next snapshot.
    pub fn last_error(&self) -> Option<String> {
        self.state
            .last_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of snapshots received so far.
    pub fn revision(&self) -> u64 {
        self.state.revision.load(Ordering::Acquire)
    }
}

/// Source documents of `records`, in the order of `records`.
pub fn source_documents(
    documents: &[CandidateDocument],
    records: &[CandidateRecord],
) -> Vec<CandidateDocument> {
    let by_id: HashMap<&CandidateId, &CandidateDocument> = documents
        .iter()
        .map(|document| (&document.id, document))
        .collect();

    records
        .iter()
        .filter_map(|record| by_id.get(&record.id).map(|document| (*document).clone()))
        .collect()
}

/// Distinct, sorted college names for the filter form.
pub fn college_options(records: &[CandidateRecord]) -> Vec<String> {
    distinct(records.iter().filter_map(|record| record.college_name.as_deref()))
}

/// Distinct, sorted branches for the filter form.
pub fn branch_options(records: &[CandidateRecord]) -> Vec<String> {
    distinct(records.iter().filter_map(|record| record.branch.as_deref()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
