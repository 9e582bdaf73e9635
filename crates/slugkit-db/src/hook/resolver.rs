//! Uniqueness negotiation against sibling records.
//!
//! ## Summary
//! Counts siblings whose destination value is the candidate slug, optionally
//! followed by `-<digits>`, and applies the collision policy. The count and
//! the eventual write are not isolated from concurrent saves; a unique index
//! in storage is the only hard guarantee.

use slugkit_core::constants::{DUPLICATE_MESSAGE, ID_FIELD, SUFFIX_PATTERN, SUFFIX_SEPARATOR};
use slugkit_core::error::CoreResult;

use crate::db::{Collection, Filter};
use crate::error::DbResult;
use crate::hook::scope::Scope;
use crate::hook::source::field_text;
use crate::model::Document;

/// What to do when siblings already use the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Append `-<count>` to the candidate.
    Suffix,
    /// Leave the candidate and mark the destination field invalid.
    Invalidate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Unique,
    Suffixed { slug: String, count: u64 },
    Invalidated { count: u64 },
}

/// ## Summary
/// Anchored pattern matching `candidate` and `candidate-<digits>`.
///
/// Regex metacharacters in the candidate are escaped.
#[must_use]
pub fn duplicate_pattern(candidate: &str) -> String {
    format!("^{}{SUFFIX_PATTERN}", regex_lite::escape(candidate))
}

/// ## Summary
/// Builds the duplicate-count filter: destination matches the pattern
/// (case-insensitive), identity differs from the record's, merged with the
/// scope's constraints.
///
/// ## Errors
/// Returns the scope's error if it cannot be evaluated for `doc`.
pub fn duplicate_filter(
    doc: &dyn Document,
    destination: &str,
    candidate: &str,
    scope: Option<&Scope>,
) -> CoreResult<Filter> {
    let mut filter = Filter::new()
        .matches_regex(destination, &duplicate_pattern(candidate), true)
        .not_equals(ID_FIELD, doc.id());
    if let Some(scope) = scope {
        filter.merge(scope.evaluate(doc)?);
    }
    Ok(filter)
}

/// ## Summary
/// Counts siblings sharing the record's destination value and applies
/// `policy` when any exist.
///
/// With [`CollisionPolicy::Suffix`] the raw sibling count is appended, so
/// `foo` with siblings `foo` and `foo-1` becomes `foo-2`. The suffixed value
/// is not re-checked.
///
/// ## Errors
/// Returns the collection's error if the count fails; the record is left
/// untouched in that case. Returns a configuration error, before any query
/// runs, if the record does not declare `destination` or a field the scope
/// reads.
#[tracing::instrument(skip(doc, collection, scope), fields(collection = %collection.name()))]
pub async fn resolve(
    doc: &mut dyn Document,
    collection: &dyn Collection,
    destination: &str,
    scope: Option<&Scope>,
    policy: CollisionPolicy,
) -> DbResult<Resolution> {
    let candidate = field_text(&*doc, destination)?;
    let filter = duplicate_filter(&*doc, destination, &candidate, scope)?;

    let count = collection.count(&filter).await?;
    if count == 0 {
        tracing::debug!(slug = %candidate, "Slug is unique");
        return Ok(Resolution::Unique);
    }

    match policy {
        CollisionPolicy::Invalidate => {
            tracing::warn!(slug = %candidate, count, "Slug already taken, invalidating");
            doc.invalidate(destination, DUPLICATE_MESSAGE);
            Ok(Resolution::Invalidated { count })
        }
        CollisionPolicy::Suffix => {
            let slug = format!("{candidate}{SUFFIX_SEPARATOR}{count}");
            tracing::debug!(%slug, count, "Slug collides, appending sibling count");
            doc.set(destination, slug.clone())?;
            Ok(Resolution::Suffixed { slug, count })
        }
    }
}
