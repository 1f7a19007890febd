use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use serde_json::{json, Value};

use crate::candidates::domain::{CandidateDocument, CandidateId, CandidateRecord};
use crate::candidates::memory::MemoryCandidateStore;
use crate::candidates::normalizer::normalize_all;
use crate::candidates::service::RecruitmentService;
use crate::candidates::store::{
    CandidateStore, CandidateUpdate, SnapshotListener, StoreError, Subscription,
};

pub(super) fn document(id: &str, fields: Value) -> CandidateDocument {
    let Value::Object(fields) = fields else {
        panic!("fixture documents must be JSON objects");
    };
    CandidateDocument::new(id, fields)
}

/// Five candidates across three colleges covering every status, the legacy GitHub field,
/// string-typed CGPA, and missing branch/CGPA/status.
pub(super) fn roster_documents() -> Vec<CandidateDocument> {
    vec![
        document(
            "c1",
            json!({
                "name": "Asha Rao",
                "email": "asha@iitb.ac.in",
                "phone": "+91 98200 11111",
                "college_name": "IIT Bombay",
                "branch": "CSE",
                "cgpa": 9.1,
                "github_score": 85,
                "hackerearth_score": 78,
                "skills": ["Rust", "React"],
                "selection_status": "selected",
                "interview_rounds": [
                    { "round": "L1", "score": 80, "result": "pass", "reviewer": "Priya" },
                    { "round": "L2", "score": 72, "result": "pass" }
                ]
            }),
        ),
        document(
            "c2",
            json!({
                "name": "Rahul Mehta",
                "email": "rahul@nitt.edu",
                "college_name": "NIT Trichy",
                "branch": "ECE",
                "cgpa": 7.4,
                "github_overall_score": 40,
                "hackerearth_score": 55,
                "skills": "Python, Django",
                "selection_status": "pending",
                "interview_rounds": [
                    { "round": "L1", "score": 45, "result": "fail" }
                ]
            }),
        ),
        document(
            "c3",
            json!({
                "name": "Meera Iyer",
                "email": "meera@iitb.ac.in",
                "college_name": "IIT Bombay",
                "branch": "CSE",
                "cgpa": "8.2",
                "github_score": 62,
                "hackerearth_score": 0,
                "skills": ["Java"],
                "selection_status": "rejected"
            }),
        ),
        document(
            "c4",
            json!({
                "name": "Kabir Singh",
                "email": "kabir@bits-pilani.ac.in",
                "college_name": "BITS Pilani",
                "github_score": 21,
                "hackerearth_score": 20,
                "interview_rounds": [
                    { "round": "Group Discussion", "score": 60, "result": "pending" }
                ]
            }),
        ),
        document(
            "c5",
            json!({
                "name": "Zoya Khan",
                "email": "zoya@nitt.edu",
                "college_name": "NIT Trichy",
                "branch": "CSE",
                "cgpa": 8.8,
                "github_score": 91,
                "hackerearth_score": 88,
                "skills": ["React Native", "Go"],
                "selection_status": "selected",
                "interview_rounds": [
                    { "round": "L1", "score": 90, "result": "pass" },
                    { "round": "Final", "score": 85, "result": "pending" }
                ],
                "linkedin": "https://linkedin.example/zoya"
            }),
        ),
    ]
}

pub(super) fn roster() -> Vec<CandidateRecord> {
    normalize_all(&roster_documents())
}

pub(super) fn ids(records: &[CandidateRecord]) -> Vec<&str> {
    records.iter().map(|record| record.id.as_str()).collect()
}

pub(super) fn candidate(id: &str) -> CandidateId {
    CandidateId(id.to_string())
}

pub(super) fn build_service() -> (
    Arc<RecruitmentService<CountingStore>>,
    Arc<CountingStore>,
) {
    let store = Arc::new(CountingStore::with_documents(roster_documents()));
    let service = RecruitmentService::new(store.clone()).expect("service attaches");
    (Arc::new(service), store)
}

/// Memory store that counts write attempts and can be switched to reject them.
#[derive(Default)]
pub(super) struct CountingStore {
    inner: MemoryCandidateStore,
    writes: AtomicUsize,
    reject_writes: AtomicBool,
}

impl CountingStore {
    pub(super) fn with_documents(documents: Vec<CandidateDocument>) -> Self {
        Self {
            inner: MemoryCandidateStore::with_documents(documents),
            ..Self::default()
        }
    }

    pub(super) fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub(super) fn reject_writes(&self) {
        self.reject_writes.store(true, Ordering::SeqCst);
    }

    pub(super) fn memory(&self) -> &MemoryCandidateStore {
        &self.inner
    }
}

impl CandidateStore for CountingStore {
    fn subscribe(&self, listener: Arc<dyn SnapshotListener>) -> Result<Subscription, StoreError> {
        self.inner.subscribe(listener)
    }

    fn fetch(&self, id: &CandidateId) -> Result<Option<CandidateDocument>, StoreError> {
        self.inner.fetch(id)
    }

    fn apply(&self, id: &CandidateId, update: CandidateUpdate) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("database offline".to_string()));
        }
        self.inner.apply(id, update)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_str(&body).expect("json payload")
}

pub(super) async fn read_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
