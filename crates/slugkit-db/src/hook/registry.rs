//! Slug hooks declared in configuration.

use std::collections::HashMap;
use std::sync::Arc;

use slugkit_core::config::HookConfig;
use slugkit_core::error::{CoreError, CoreResult};

use crate::db::Collection;
use crate::error::DbResult;
use crate::hook::scope::Scope;
use crate::hook::slug_hook::{HookOptions, SlugHook, SlugOutcome};
use crate::model::Document;

/// Slug hooks grouped by the collection they run on.
#[derive(Debug, Default)]
pub struct HookRegistry {
    hooks: HashMap<String, Vec<SlugHook>>,
}

impl HookRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Builds hooks from configuration entries, resolving each entry's
    /// collection name against `collections`.
    ///
    /// ## Errors
    /// Returns [`CoreError::ConfigError`] if an entry names a collection
    /// missing from `collections`, or if the entry itself is invalid.
    pub fn from_config(
        configs: &[HookConfig],
        collections: &HashMap<String, Arc<dyn Collection>>,
    ) -> CoreResult<Self> {
        let mut registry = Self::new();
        for config in configs {
            let collection = collections.get(&config.collection).ok_or_else(|| {
                CoreError::ConfigError(format!(
                    "slug hook on `{}` references an unknown collection",
                    config.collection
                ))
            })?;

            let mut options = HookOptions::default()
                .allow_duplication(config.allow_duplication)
                .invalidate_on_duplicate(config.invalidate_on_duplicate);
            if !config.scope_fields.is_empty() {
                options = options.scope(Scope::fields(config.scope_fields.clone()));
            }

            let hook = SlugHook::new(
                Arc::clone(collection),
                config.source.clone(),
                config.destination.clone(),
                options,
            )?;
            registry.register(&config.collection, hook);
        }

        tracing::debug!(
            collections = registry.hooks.len(),
            hooks = configs.len(),
            "Slug hooks registered"
        );
        Ok(registry)
    }

    pub fn register(&mut self, collection: &str, hook: SlugHook) {
        self.hooks
            .entry(collection.to_owned())
            .or_default()
            .push(hook);
    }

    /// Hooks registered for `collection`, in registration order.
    #[must_use]
    pub fn hooks_for(&self, collection: &str) -> &[SlugHook] {
        self.hooks.get(collection).map(Vec::as_slice).unwrap_or_default()
    }

    /// ## Summary
    /// Applies every hook registered for `collection` to `doc`, in order.
    ///
    /// ## Errors
    /// Stops at and returns the first hook error.
    pub async fn run(&self, collection: &str, doc: &mut dyn Document) -> DbResult<Vec<SlugOutcome>> {
        let mut outcomes = Vec::new();
        for hook in self.hooks_for(collection) {
            outcomes.push(hook.apply(doc).await?);
        }
        Ok(outcomes)
    }
}
