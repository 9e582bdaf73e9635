#![allow(dead_code)]
//! Test helpers for integration tests.
//!
//! Provides a save cycle that runs a hook and then persists the document,
//! mirroring what a persistence layer does for its pre-save hooks.

use std::sync::Arc;

use slugkit_test::component::db::memory::MemoryCollection;
use slugkit_test::component::error::DbResult;
use slugkit_test::component::hook::{HookOptions, SlugHook, SlugOutcome};
use slugkit_test::component::model::JsonDocument;

pub use slugkit_test::fixtures::{FailingCollection, new_document, object, seeded};

/// Runs `hook` and saves `doc` into `collection` if the hook left it valid.
pub async fn save(
    hook: &SlugHook,
    collection: &MemoryCollection,
    doc: &mut JsonDocument,
) -> DbResult<SlugOutcome> {
    let outcome = hook.apply(doc).await?;
    if doc.is_valid() {
        collection.save(doc).await;
    }
    Ok(outcome)
}

/// Hook writing `title` into `slug` on `collection`.
pub fn title_hook(collection: &Arc<MemoryCollection>, options: HookOptions) -> SlugHook {
    SlugHook::new(collection.clone(), "title", "slug", options).expect("valid hook")
}
