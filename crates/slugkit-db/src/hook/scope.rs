//! Collision scopes: extra constraints on the duplicate count.

use std::sync::Arc;

use slugkit_core::error::{CoreError, CoreResult};

use crate::db::Filter;
use crate::model::Document;

type ScopeFn = dyn Fn(&dyn Document) -> CoreResult<Filter> + Send + Sync;

/// Narrows the duplicate count to a subset of sibling records.
///
/// Evaluated against the record on every invocation. The resulting filter is
/// deep-merged over the hook's own constraints, so scope keys win. A scope
/// that cannot be evaluated aborts the hook before any query runs.
#[derive(Clone)]
pub struct Scope(Arc<ScopeFn>);

impl Scope {
    pub fn new<F>(scope: F) -> Self
    where
        F: Fn(&dyn Document) -> CoreResult<Filter> + Send + Sync + 'static,
    {
        Self(Arc::new(scope))
    }

    /// ## Summary
    /// Only counts siblings holding the same values as the record for every
    /// one of `fields` (e.g. "unique within this parent").
    ///
    /// Evaluation fails with [`CoreError::ConfigError`] if the record does
    /// not declare one of the fields.
    #[must_use]
    pub fn fields(fields: Vec<String>) -> Self {
        Self::new(move |doc| {
            fields.iter().try_fold(Filter::new(), |filter, field| {
                let value = doc.get(field).ok_or_else(|| {
                    CoreError::ConfigError(format!("record has no scope field `{field}`"))
                })?;
                Ok(filter.equals(field, value))
            })
        })
    }

    /// ## Summary
    /// Produces the scope's constraints for `doc`.
    ///
    /// ## Errors
    /// Returns whatever the scope function reports, typically a
    /// configuration error for an undeclared field.
    pub fn evaluate(&self, doc: &dyn Document) -> CoreResult<Filter> {
        (self.0)(doc)
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Scope(..)")
    }
}
