use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

/// One source field name or an ordered list of them.
///
/// Deserializes from either a bare string or a list of strings so hook
/// definitions can be written as `source = "title"` or
/// `source = ["first_name", "last_name"]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SourceFields {
    Single(String),
    Many(Vec<String>),
}

impl SourceFields {
    /// ## Summary
    /// Returns the field names in declaration order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        match self {
            Self::Single(name) => std::slice::from_ref(name),
            Self::Many(names) => names,
        }
    }

    /// ## Summary
    /// Checks that at least one field is named and that no name is blank.
    ///
    /// ## Errors
    /// Returns [`CoreError::ConfigError`] describing the first problem found.
    pub fn validate(&self) -> CoreResult<()> {
        if self.names().is_empty() {
            return Err(CoreError::ConfigError(
                "at least one source field is required".to_owned(),
            ));
        }
        if self.names().iter().any(|name| name.trim().is_empty()) {
            return Err(CoreError::ConfigError(
                "source field names must not be blank".to_owned(),
            ));
        }
        Ok(())
    }
}

impl From<&str> for SourceFields {
    fn from(name: &str) -> Self {
        Self::Single(name.to_owned())
    }
}

impl From<String> for SourceFields {
    fn from(name: String) -> Self {
        Self::Single(name)
    }
}

impl From<Vec<String>> for SourceFields {
    fn from(names: Vec<String>) -> Self {
        Self::Many(names)
    }
}

impl From<Vec<&str>> for SourceFields {
    fn from(names: Vec<&str>) -> Self {
        Self::Many(names.into_iter().map(str::to_owned).collect())
    }
}

impl<const N: usize> From<[&str; N]> for SourceFields {
    fn from(names: [&str; N]) -> Self {
        Self::Many(names.into_iter().map(str::to_owned).collect())
    }
}

impl std::fmt::Display for SourceFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.names().join(","))
    }
}
