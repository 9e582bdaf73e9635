//! Change detection for slug regeneration.

use slugkit_core::types::SourceFields;

use crate::model::Document;

/// ## Summary
/// Returns true if `field` changed since the record was loaded.
#[must_use]
pub fn is_modified(doc: &dyn Document, field: &str) -> bool {
    doc.modified_paths().iter().any(|path| path == field)
}

/// ## Summary
/// Returns true if any of `fields` changed since the record was loaded.
#[must_use]
pub fn was_modified(doc: &dyn Document, fields: &SourceFields) -> bool {
    let modified = doc.modified_paths();
    fields
        .names()
        .iter()
        .any(|field| modified.iter().any(|path| path == field))
}
