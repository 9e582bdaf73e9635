//! The pre-save slug hook.
//!
//! ## Summary
//! A [`SlugHook`] is built once per collection and applied to every record
//! the persistence layer is about to save. It regenerates the destination
//! slug when the destination or one of the source fields changed, then
//! negotiates uniqueness against sibling records.

use std::sync::Arc;

use slugkit_core::error::{CoreError, CoreResult};
use slugkit_core::types::SourceFields;
use slugkit_core::util::slug::to_slug;

use crate::db::Collection;
use crate::error::DbResult;
use crate::hook::change::{is_modified, was_modified};
use crate::hook::resolver::{CollisionPolicy, Resolution, resolve};
use crate::hook::scope::Scope;
use crate::hook::source::{derive_source, field_text};
use crate::model::Document;

/// Collision behaviour of a [`SlugHook`].
///
/// `allow_duplication` skips the uniqueness query altogether and takes
/// precedence over `invalidate_on_duplicate`.
#[derive(Debug, Clone, Default)]
pub struct HookOptions {
    pub allow_duplication: bool,
    pub invalidate_on_duplicate: bool,
    pub scope: Option<Scope>,
}

impl HookOptions {
    #[must_use]
    pub const fn allow_duplication(mut self, allow: bool) -> Self {
        self.allow_duplication = allow;
        self
    }

    #[must_use]
    pub const fn invalidate_on_duplicate(mut self, invalidate: bool) -> Self {
        self.invalidate_on_duplicate = invalidate;
        self
    }

    #[must_use]
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Collision policy used when siblings already hold the candidate.
    #[must_use]
    pub const fn policy(&self) -> CollisionPolicy {
        if self.invalidate_on_duplicate {
            CollisionPolicy::Invalidate
        } else {
            CollisionPolicy::Suffix
        }
    }
}

/// What a hook invocation did to the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugOutcome {
    /// Neither the destination nor any source field changed.
    Unchanged,
    /// The destination now holds a freshly generated slug.
    Generated { slug: String },
    /// Siblings held the candidate; the sibling count was appended.
    Suffixed { slug: String, count: u64 },
    /// Siblings held the candidate; the destination was marked invalid.
    Invalidated { slug: String, count: u64 },
}

impl SlugOutcome {
    /// Slug written to the destination, if any.
    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        match self {
            Self::Unchanged => None,
            Self::Generated { slug }
            | Self::Suffixed { slug, .. }
            | Self::Invalidated { slug, .. } => Some(slug),
        }
    }
}

/// Slug generator bound to one collection, source and destination.
#[derive(Clone)]
pub struct SlugHook {
    collection: Arc<dyn Collection>,
    source: SourceFields,
    destination: String,
    options: HookOptions,
}

impl SlugHook {
    /// ## Summary
    /// Builds a hook writing slugs derived from `source` into `destination`,
    /// counting duplicates in `collection`.
    ///
    /// ## Errors
    /// Returns [`CoreError::ConfigError`] if the source list is empty or any
    /// field name is blank.
    pub fn new(
        collection: Arc<dyn Collection>,
        source: impl Into<SourceFields>,
        destination: impl Into<String>,
        options: HookOptions,
    ) -> CoreResult<Self> {
        let source = source.into();
        let destination = destination.into();

        source.validate()?;
        if destination.trim().is_empty() {
            return Err(CoreError::ConfigError(
                "slug destination field name must not be empty".to_owned(),
            ));
        }

        Ok(Self {
            collection,
            source,
            destination,
            options,
        })
    }

    /// ## Summary
    /// Runs the hook against a record about to be saved.
    ///
    /// A modified destination is treated as a manual override: its own value
    /// is slugified instead of the source fields.
    ///
    /// ## Errors
    /// Returns [`DbError`](crate::error::DbError) if the duplicate count
    /// fails, or a configuration error if the record lacks a configured
    /// field. Duplicate slugs under the invalidate policy are not errors;
    /// they are reported on the record and as [`SlugOutcome::Invalidated`].
    #[tracing::instrument(
        skip(self, doc),
        fields(collection = %self.collection.name(), destination = %self.destination)
    )]
    pub async fn apply(&self, doc: &mut dyn Document) -> DbResult<SlugOutcome> {
        let manual = is_modified(&*doc, &self.destination);
        if !manual && !was_modified(&*doc, &self.source) {
            tracing::trace!(source = %self.source, "Slug sources unchanged, skipping");
            return Ok(SlugOutcome::Unchanged);
        }

        let text = if manual {
            field_text(&*doc, &self.destination)?
        } else {
            derive_source(&*doc, &self.source)?
        };

        let slug = to_slug(&text);
        tracing::debug!(%slug, manual, "Generated slug");
        doc.set(&self.destination, slug.clone())?;

        if self.options.allow_duplication {
            return Ok(SlugOutcome::Generated { slug });
        }

        let resolution = resolve(
            doc,
            self.collection.as_ref(),
            &self.destination,
            self.options.scope.as_ref(),
            self.options.policy(),
        )
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Duplicate slug lookup failed"))?;

        Ok(match resolution {
            Resolution::Unique => SlugOutcome::Generated { slug },
            Resolution::Suffixed { slug, count } => SlugOutcome::Suffixed { slug, count },
            Resolution::Invalidated { count } => SlugOutcome::Invalidated { slug, count },
        })
    }

    #[must_use]
    pub const fn source(&self) -> &SourceFields {
        &self.source
    }

    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }

    #[must_use]
    pub const fn options(&self) -> &HookOptions {
        &self.options
    }
}

impl std::fmt::Debug for SlugHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlugHook")
            .field("collection", &self.collection.name())
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("options", &self.options)
            .finish()
    }
}
