//! Source text for slug generation.

use serde_json::Value;

use slugkit_core::error::{CoreError, CoreResult};
use slugkit_core::types::SourceFields;

use crate::model::Document;

/// ## Summary
/// Joins the current values of `fields` with single spaces and trims the
/// result.
///
/// Inner whitespace is kept; the tokenizer collapses it later.
///
/// ## Errors
/// Returns [`CoreError::ConfigError`] if the record does not declare one of
/// the fields.
pub fn derive_source(doc: &dyn Document, fields: &SourceFields) -> CoreResult<String> {
    let values = fields
        .names()
        .iter()
        .map(|field| field_text(doc, field))
        .collect::<CoreResult<Vec<_>>>()?;

    Ok(values.join(" ").trim().to_owned())
}

/// ## Summary
/// Reads a field and coerces it to text.
///
/// ## Errors
/// Returns [`CoreError::ConfigError`] if the record does not declare the field.
pub fn field_text(doc: &dyn Document, field: &str) -> CoreResult<String> {
    doc.get(field)
        .map(|value| coerce_to_string(&value))
        .ok_or_else(|| CoreError::ConfigError(format!("record has no field `{field}`")))
}

/// Strings as-is, `null` as empty, everything else in its JSON form.
#[must_use]
pub fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
