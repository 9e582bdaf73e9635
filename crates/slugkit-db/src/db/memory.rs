//! In-memory collection (no database required).

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{Map, Value};
use tokio::sync::RwLock;

use slugkit_core::constants::ID_FIELD;

use crate::db::{Collection, Filter};
use crate::error::DbResult;
use crate::model::{Document, JsonDocument};

/// Collection holding stored documents in memory. Thread-safe.
///
/// Each stored document carries its identity under `_id`. Duplicate counts
/// evaluate the [`Filter`] against every stored document and are tallied in
/// [`MemoryCollection::count_calls`] for assertions.
#[derive(Debug)]
pub struct MemoryCollection {
    name: String,
    records: RwLock<Vec<Map<String, Value>>>,
    count_calls: AtomicUsize,
}

impl MemoryCollection {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: RwLock::new(Vec::new()),
            count_calls: AtomicUsize::new(0),
        }
    }

    /// Stores a document under `id`, replacing any document with the same id.
    pub async fn insert(&self, id: Value, mut fields: Map<String, Value>) {
        fields.insert(ID_FIELD.to_owned(), id.clone());
        let mut records = self.records.write().await;
        match records
            .iter_mut()
            .find(|record| record.get(ID_FIELD) == Some(&id))
        {
            Some(existing) => *existing = fields,
            None => records.push(fields),
        }
    }

    /// ## Summary
    /// Persists a document's current fields and clears its change tracking,
    /// as a save pipeline does after its pre-save hooks succeed.
    pub async fn save(&self, doc: &mut JsonDocument) {
        self.insert(doc.id(), doc.fields().clone()).await;
        doc.mark_saved();
    }

    /// Values stored under `field`, in insertion order.
    pub async fn values(&self, field: &str) -> Vec<Value> {
        self.records
            .read()
            .await
            .iter()
            .map(|record| record.get(field).cloned().unwrap_or(Value::Null))
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Number of duplicate-count queries served so far.
    #[must_use]
    pub fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }
}

impl Collection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn count<'a>(
        &'a self,
        filter: &'a Filter,
    ) -> Pin<Box<dyn Future<Output = DbResult<u64>> + Send + 'a>> {
        Box::pin(async move {
            self.count_calls.fetch_add(1, Ordering::SeqCst);
            let matcher = filter.matcher()?;
            let records = self.records.read().await;
            let matched = records
                .iter()
                .filter(|record| matcher.matches(record))
                .count();
            let count = u64::try_from(matched).unwrap_or(u64::MAX);
            tracing::trace!(collection = %self.name, %filter, count, "Counted in memory");
            Ok(count)
        })
    }
}
