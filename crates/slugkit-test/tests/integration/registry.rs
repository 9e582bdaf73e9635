//! Hooks declared in configuration.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use slugkit_test::component::config::Settings;
use slugkit_test::component::db::Collection;
use slugkit_test::component::db::memory::MemoryCollection;
use slugkit_test::component::hook::{HookRegistry, SlugOutcome};

use super::helpers::{new_document, seeded};

const CONFIG: &str = r#"
[logging]
level = "debug"

[[hooks]]
collection = "chapters"
source = "title"
destination = "slug"
scope_fields = ["book_id"]

[[hooks]]
collection = "authors"
source = ["first_name", "last_name"]
destination = "handle"
invalidate_on_duplicate = true
"#;

fn registry(chapters: &Arc<MemoryCollection>, authors: &Arc<MemoryCollection>) -> HookRegistry {
    let settings = Settings::from_toml(CONFIG).expect("valid config");
    let collections: HashMap<String, Arc<dyn Collection>> = HashMap::from([
        ("chapters".to_owned(), chapters.clone() as Arc<dyn Collection>),
        ("authors".to_owned(), authors.clone() as Arc<dyn Collection>),
    ]);
    HookRegistry::from_config(&settings.hooks, &collections).expect("valid hooks")
}

#[test_log::test(tokio::test)]
async fn configured_scope_applies() {
    let chapters = seeded("chapters", vec![json!({ "slug": "intro", "book_id": 7 })]).await;
    let authors = seeded("authors", Vec::new()).await;
    let registry = registry(&chapters, &authors);

    let mut same_book = new_document(json!({ "title": "Intro", "slug": null, "book_id": 7 }));
    let outcomes = registry.run("chapters", &mut same_book).await.expect("run");
    assert_eq!(outcomes.len(), 1);
    assert_eq!(same_book.field_str("slug"), Some("intro-1"));

    let mut other_book = new_document(json!({ "title": "Intro", "slug": null, "book_id": 8 }));
    registry.run("chapters", &mut other_book).await.expect("run");
    assert_eq!(other_book.field_str("slug"), Some("intro"));
}

#[test_log::test(tokio::test)]
async fn configured_invalidation_applies() {
    let chapters = seeded("chapters", Vec::new()).await;
    let authors = seeded("authors", vec![json!({ "handle": "ada-lovelace" })]).await;
    let registry = registry(&chapters, &authors);

    let mut doc = new_document(json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "handle": null
    }));
    let outcomes = registry.run("authors", &mut doc).await.expect("run");

    assert!(matches!(
        outcomes.as_slice(),
        [SlugOutcome::Invalidated { count: 1, .. }]
    ));
    assert!(!doc.is_valid());
}

#[test_log::test(tokio::test)]
async fn unconfigured_collection_runs_nothing() {
    let chapters = seeded("chapters", Vec::new()).await;
    let authors = seeded("authors", Vec::new()).await;
    let registry = registry(&chapters, &authors);

    let mut doc = new_document(json!({ "title": "Intro", "slug": null }));
    let outcomes = registry.run("books", &mut doc).await.expect("run");

    assert!(outcomes.is_empty());
    assert_eq!(doc.field_str("slug"), None);
}
