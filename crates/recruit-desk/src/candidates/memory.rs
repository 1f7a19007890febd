use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::domain::{CandidateDocument, CandidateId};
use super::store::{
    CandidateStore, CandidateUpdate, SnapshotListener, StoreError, Subscription,
};

/// Process-local store that behaves like the managed document database: every write is pushed
/// to all live subscribers as a full snapshot.
#[derive(Default, Clone)]
pub struct MemoryCandidateStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    documents: Mutex<BTreeMap<CandidateId, Map<String, Value>>>,
    listeners: Mutex<BTreeMap<u64, Arc<dyn SnapshotListener>>>,
    next_listener: AtomicU64,
}

impl MemoryCandidateStore {
    pub fn with_documents<I>(documents: I) -> Self
    where
        I: IntoIterator<Item = CandidateDocument>,
    {
        let store = Self::default();
        if let Ok(mut guard) = store.inner.documents.lock() {
            for document in documents {
                guard.insert(document.id, document.fields);
            }
        }
        store
    }

    /// Inserts or replaces a document, as an upstream import would, and notifies subscribers.
    pub fn upsert(&self, document: CandidateDocument) -> Result<(), StoreError> {
        lock(&self.inner.documents)?.insert(document.id, document.fields);
        self.inner.notify();
        Ok(())
    }

    pub fn len(&self) -> usize {
        lock(&self.inner.documents).map_or(0, |guard| guard.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner.listeners).map_or(0, |guard| guard.len())
    }

    /// Delivers a transport failure to every subscriber.
    pub fn broadcast_error(&self, message: &str) -> Result<(), StoreError> {
        for listener in self.inner.listeners()? {
            listener.on_error(StoreError::Subscription(message.to_string()));
        }
        Ok(())
    }
}

impl MemoryInner {
    fn snapshot(&self) -> Result<Vec<CandidateDocument>, StoreError> {
        Ok(lock(&self.documents)?
            .iter()
            .map(|(id, fields)| CandidateDocument {
                id: id.clone(),
                fields: fields.clone(),
            })
            .collect())
    }

    fn listeners(&self) -> Result<Vec<Arc<dyn SnapshotListener>>, StoreError> {
        Ok(lock(&self.listeners)?.values().cloned().collect())
    }

    fn broadcast(&self) -> Result<(), StoreError> {
        let listeners = self.listeners()?;
        if listeners.is_empty() {
            return Ok(());
        }

        let snapshot = self.snapshot()?;
        for listener in listeners {
            listener.on_snapshot(snapshot.clone());
        }
        Ok(())
    }

    /// Pushes the new snapshot after a committed write. A failed push does not undo the write.
    fn notify(&self) {
        if let Err(error) = self.broadcast() {
            warn!(%error, "candidate snapshot push failed");
        }
    }
}

impl CandidateStore for MemoryCandidateStore {
    fn subscribe(&self, listener: Arc<dyn SnapshotListener>) -> Result<Subscription, StoreError> {
        let key = self.inner.next_listener.fetch_add(1, Ordering::Relaxed);
        lock(&self.inner.listeners)?.insert(key, listener.clone());
        debug!(listener = key, "candidate subscription opened");

        listener.on_snapshot(self.inner.snapshot()?);

        let inner: Weak<MemoryInner> = Arc::downgrade(&self.inner);
        Ok(Subscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                if let Ok(mut listeners) = inner.listeners.lock() {
                    listeners.remove(&key);
                }
                debug!(listener = key, "candidate subscription released");
            }
        }))
    }

    fn fetch(&self, id: &CandidateId) -> Result<Option<CandidateDocument>, StoreError> {
        Ok(lock(&self.inner.documents)?
            .get(id)
            .map(|fields| CandidateDocument {
                id: id.clone(),
                fields: fields.clone(),
            }))
    }

    fn apply(&self, id: &CandidateId, update: CandidateUpdate) -> Result<(), StoreError> {
        let field = update.patch.field();
        let fields = update.into_fields(Utc::now())?;
        {
            let mut documents = lock(&self.inner.documents)?;
            let document = documents
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            document.extend(fields);
        }
        debug!(candidate = %id, field, "candidate document updated");
        self.inner.notify();
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
}
