//! Shared fixtures: documents, seeded collections and a collection that
//! always fails.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{Map, Value};

use slugkit_db::db::memory::MemoryCollection;
use slugkit_db::db::{Collection, Filter};
use slugkit_db::error::{DbError, DbResult};
use slugkit_db::model::JsonDocument;

/// ## Summary
/// Builds a new, unsaved document from a JSON object.
///
/// Non-objects produce an empty document.
#[must_use]
pub fn new_document(value: Value) -> JsonDocument {
    JsonDocument::new(object(value))
}

/// Extracts the map of a JSON object, or an empty map.
#[must_use]
pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// ## Summary
/// Creates a memory collection holding one stored record per entry of
/// `records`, with ids `1..`.
pub async fn seeded(name: &str, records: Vec<Value>) -> Arc<MemoryCollection> {
    let collection = Arc::new(MemoryCollection::new(name));
    for (id, record) in (1_u64..).zip(records) {
        collection.insert(Value::from(id), object(record)).await;
    }
    collection
}

/// Collection whose every count fails, as a lost database connection would.
#[derive(Debug, Default)]
pub struct FailingCollection {
    attempts: AtomicUsize,
}

impl FailingCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Collection for FailingCollection {
    fn name(&self) -> &str {
        "unreachable"
    }

    fn count<'a>(
        &'a self,
        _filter: &'a Filter,
    ) -> Pin<Box<dyn Future<Output = DbResult<u64>> + Send + 'a>> {
        Box::pin(async move {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(DbError::QueryFailed {
                collection: self.name().to_owned(),
                message: "connection refused".to_owned(),
            })
        })
    }
}
