//! Uniqueness negotiation: suffixing, invalidation, self-exclusion, scopes
//! and query failures.

use std::sync::Arc;

use serde_json::json;

use slugkit_test::component::constants::DUPLICATE_MESSAGE;
use slugkit_test::component::db::Filter;
use slugkit_test::component::error::{CoreError, DbError};
use slugkit_test::component::hook::{HookOptions, Scope, SlugHook, SlugOutcome};

use super::helpers::{FailingCollection, new_document, save, seeded, title_hook};

#[test_log::test(tokio::test)]
async fn suffix_is_the_sibling_count() {
    let posts = seeded(
        "posts",
        vec![json!({ "slug": "foo" }), json!({ "slug": "foo-1" })],
    )
    .await;
    let hook = title_hook(&posts, HookOptions::default());

    let mut doc = new_document(json!({ "title": "Foo", "slug": null }));
    let outcome = save(&hook, &posts, &mut doc).await.expect("save");

    assert_eq!(
        outcome,
        SlugOutcome::Suffixed {
            slug: "foo-2".to_owned(),
            count: 2
        }
    );
    assert_eq!(posts.count_calls(), 1);
}

/// Near misses (`foobar`, `bar-foo`, `foo-x`) never count as duplicates.
#[test_log::test(tokio::test)]
async fn only_exact_or_numbered_slugs_collide() {
    let posts = seeded(
        "posts",
        vec![
            json!({ "slug": "foobar" }),
            json!({ "slug": "bar-foo" }),
            json!({ "slug": "foo-x" }),
            json!({ "slug": "foo-12" }),
        ],
    )
    .await;
    let hook = title_hook(&posts, HookOptions::default());

    let mut doc = new_document(json!({ "title": "foo", "slug": null }));
    save(&hook, &posts, &mut doc).await.expect("save");
    assert_eq!(doc.field_str("slug"), Some("foo-1"));
}

/// Saving the same title repeatedly yields foo, foo-1, foo-2.
#[test_log::test(tokio::test)]
async fn repeated_titles_are_numbered() {
    let posts = seeded("posts", Vec::new()).await;
    let hook = title_hook(&posts, HookOptions::default());

    for _ in 0..3 {
        let mut doc = new_document(json!({ "title": "Foo", "slug": null }));
        save(&hook, &posts, &mut doc).await.expect("save");
    }

    assert_eq!(
        posts.values("slug").await,
        vec![json!("foo"), json!("foo-1"), json!("foo-2")]
    );
}

/// Stored slugs are compared case-insensitively.
#[test_log::test(tokio::test)]
async fn differently_cased_siblings_collide() {
    let posts = seeded("posts", vec![json!({ "slug": "FOO" })]).await;
    let hook = title_hook(&posts, HookOptions::default());

    let mut doc = new_document(json!({ "title": "foo", "slug": null }));
    save(&hook, &posts, &mut doc).await.expect("save");
    assert_eq!(doc.field_str("slug"), Some("foo-1"));
}

#[test_log::test(tokio::test)]
async fn allow_duplication_skips_the_query() {
    let posts = seeded("posts", vec![json!({ "slug": "foo" })]).await;
    let hook = title_hook(&posts, HookOptions::default().allow_duplication(true));

    let mut doc = new_document(json!({ "title": "Foo", "slug": null }));
    let outcome = save(&hook, &posts, &mut doc).await.expect("save");

    assert_eq!(outcome.slug(), Some("foo"));
    assert_eq!(posts.count_calls(), 0);
    assert_eq!(posts.values("slug").await, vec![json!("foo"), json!("foo")]);
}

#[test_log::test(tokio::test)]
async fn invalidate_leaves_slug_unsuffixed() {
    let posts = seeded("posts", vec![json!({ "slug": "foo" })]).await;
    let hook = title_hook(&posts, HookOptions::default().invalidate_on_duplicate(true));

    let mut doc = new_document(json!({ "title": "Foo", "slug": null }));
    let outcome = save(&hook, &posts, &mut doc).await.expect("hook succeeds");

    assert_eq!(
        outcome,
        SlugOutcome::Invalidated {
            slug: "foo".to_owned(),
            count: 1
        }
    );
    assert_eq!(doc.field_str("slug"), Some("foo"));
    assert_eq!(
        doc.errors().get("slug").map(String::as_str),
        Some(DUPLICATE_MESSAGE)
    );
    // The invalid document was not saved.
    assert_eq!(posts.len().await, 1);
}

/// `allow_duplication` takes precedence over `invalidate_on_duplicate`.
#[test_log::test(tokio::test)]
async fn allow_duplication_wins_over_invalidate() {
    let posts = seeded("posts", vec![json!({ "slug": "foo" })]).await;
    let hook = title_hook(
        &posts,
        HookOptions::default()
            .allow_duplication(true)
            .invalidate_on_duplicate(true),
    );

    let mut doc = new_document(json!({ "title": "Foo", "slug": null }));
    save(&hook, &posts, &mut doc).await.expect("save");
    assert!(doc.is_valid());
    assert_eq!(posts.count_calls(), 0);
}

/// A stored record whose slug is touched again never collides with itself.
#[test_log::test(tokio::test)]
async fn own_slug_never_counts() {
    let posts = seeded("posts", Vec::new()).await;
    let hook = title_hook(&posts, HookOptions::default());

    let mut doc = new_document(json!({ "title": "Foo", "slug": null }));
    save(&hook, &posts, &mut doc).await.expect("first save");

    doc.assign("slug", json!("foo")).expect("slug is declared");
    let outcome = save(&hook, &posts, &mut doc).await.expect("second save");

    assert_eq!(
        outcome,
        SlugOutcome::Generated {
            slug: "foo".to_owned()
        }
    );
}

#[test_log::test(tokio::test)]
async fn field_scope_limits_siblings() {
    let chapters = seeded(
        "chapters",
        vec![
            json!({ "slug": "intro", "book_id": 1 }),
            json!({ "slug": "intro", "book_id": 2 }),
            json!({ "slug": "intro-1", "book_id": 2 }),
        ],
    )
    .await;
    let hook = title_hook(
        &chapters,
        HookOptions::default().scope(Scope::fields(vec!["book_id".to_owned()])),
    );

    let mut first = new_document(json!({ "title": "Intro", "slug": null, "book_id": 1 }));
    save(&hook, &chapters, &mut first).await.expect("save");
    assert_eq!(first.field_str("slug"), Some("intro-1"));

    let mut second = new_document(json!({ "title": "Intro", "slug": null, "book_id": 3 }));
    save(&hook, &chapters, &mut second).await.expect("save");
    assert_eq!(second.field_str("slug"), Some("intro"));
}

/// A scope naming a field the record does not declare is a configuration
/// error; nothing is counted and no suffix is added.
#[test_log::test(tokio::test)]
async fn undeclared_scope_field_is_reported() {
    let posts = seeded("posts", vec![json!({ "slug": "foo" })]).await;
    let hook = title_hook(
        &posts,
        HookOptions::default().scope(Scope::fields(vec!["parent_id".to_owned()])),
    );

    let mut doc = new_document(json!({ "title": "Foo", "slug": null, "book_id": 2 }));
    let result = save(&hook, &posts, &mut doc).await;

    assert!(matches!(
        result,
        Err(DbError::CoreError(CoreError::ConfigError(_)))
    ));
    assert_eq!(posts.count_calls(), 0);
    assert_eq!(doc.field_str("slug"), Some("foo"));
    assert_eq!(posts.len().await, 1);
}

/// Closure scopes see the record as it is at save time.
#[test_log::test(tokio::test)]
async fn closure_scope_is_evaluated_per_save() {
    let pages = seeded(
        "pages",
        vec![
            json!({ "slug": "about", "lang": "en" }),
            json!({ "slug": "about", "lang": "de" }),
        ],
    )
    .await;
    let scope = Scope::new(|doc| {
        Ok(Filter::new().equals("lang", doc.get("lang").unwrap_or_default()))
    });
    let hook = title_hook(&pages, HookOptions::default().scope(scope));

    let mut doc = new_document(json!({ "title": "About", "slug": null, "lang": "fr" }));
    save(&hook, &pages, &mut doc).await.expect("save");
    assert_eq!(doc.field_str("slug"), Some("about"));

    let mut doc = new_document(json!({ "title": "About", "slug": null, "lang": "de" }));
    save(&hook, &pages, &mut doc).await.expect("save");
    assert_eq!(doc.field_str("slug"), Some("about-1"));
}

#[test_log::test(tokio::test)]
async fn query_failure_is_returned() {
    let unreachable = Arc::new(FailingCollection::new());
    let hook = SlugHook::new(
        unreachable.clone(),
        "title",
        "slug",
        HookOptions::default(),
    )
    .expect("valid hook");

    let mut doc = new_document(json!({ "title": "Foo", "slug": null }));
    let result = hook.apply(&mut doc).await;

    assert!(matches!(result, Err(DbError::QueryFailed { .. })));
    assert_eq!(unreachable.attempts(), 1);
    // The candidate was written before the lookup; no suffix was added.
    assert_eq!(doc.field_str("slug"), Some("foo"));
    assert!(doc.is_valid());
}
