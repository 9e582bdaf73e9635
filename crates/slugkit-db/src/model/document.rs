use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use slugkit_core::error::{CoreError, CoreResult};

/// A record passing through the save pipeline.
///
/// Implemented by the persistence layer. Field access is by name and limited
/// to the fields the record declares; the hook never sees the record's
/// storage representation.
pub trait Document: Send + Sync {
    /// Identity value used to exclude the record from its own duplicate count.
    fn id(&self) -> Value;

    /// Names of fields changed since the record was loaded or instantiated.
    fn modified_paths(&self) -> Vec<String>;

    /// Current value of a declared field; `None` if the record has no such field.
    fn get(&self, field: &str) -> Option<Value>;

    /// ## Summary
    /// Writes a string into a declared field.
    ///
    /// ## Errors
    /// Returns [`CoreError::InvalidInput`] if the record has no such field.
    fn set(&mut self, field: &str, value: String) -> CoreResult<()>;

    /// Records a field-level validation failure for the persistence layer's
    /// own validation stage to reject.
    fn invalidate(&mut self, field: &str, message: &str);
}

/// JSON-backed [`Document`] with change tracking.
///
/// Fields are declared when the document is built; setting an undeclared
/// field is an error. Every `set` marks the field modified until
/// [`JsonDocument::mark_saved`] is called.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonDocument {
    id: Value,
    fields: Map<String, Value>,
    modified: BTreeSet<String>,
    errors: BTreeMap<String, String>,
}

impl JsonDocument {
    /// ## Summary
    /// Instantiates a new, unsaved document with a fresh identity. Every
    /// provided non-null field counts as modified.
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        let modified = fields
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(name, _)| name.clone())
            .collect();
        Self {
            id: Value::String(uuid::Uuid::now_v7().to_string()),
            fields,
            modified,
            errors: BTreeMap::new(),
        }
    }

    /// ## Summary
    /// Builds a document as loaded from storage: nothing is modified.
    #[must_use]
    pub fn loaded(id: impl Into<Value>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
            modified: BTreeSet::new(),
            errors: BTreeMap::new(),
        }
    }

    /// ## Summary
    /// Builds a new document from a JSON object literal.
    ///
    /// ## Errors
    /// Returns [`CoreError::InvalidInput`] if `value` is not an object.
    pub fn from_value(value: Value) -> CoreResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self::new(fields)),
            other => Err(CoreError::InvalidInput(format!(
                "document must be a JSON object, got {other}"
            ))),
        }
    }

    /// ## Summary
    /// Assigns any JSON value to a declared field and marks it modified.
    ///
    /// ## Errors
    /// Returns [`CoreError::InvalidInput`] if the field is not declared.
    pub fn assign(&mut self, field: &str, value: Value) -> CoreResult<()> {
        let slot = self
            .fields
            .get_mut(field)
            .ok_or_else(|| CoreError::InvalidInput(format!("unknown field `{field}`")))?;
        *slot = value;
        self.modified.insert(field.to_owned());
        Ok(())
    }

    /// Clears change tracking and validation errors, as after a successful save.
    pub fn mark_saved(&mut self) {
        self.modified.clear();
        self.errors.clear();
    }

    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    #[must_use]
    pub fn field_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Validation errors keyed by field name.
    #[must_use]
    pub const fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Document for JsonDocument {
    fn id(&self) -> Value {
        self.id.clone()
    }

    fn modified_paths(&self) -> Vec<String> {
        self.modified.iter().cloned().collect()
    }

    fn get(&self, field: &str) -> Option<Value> {
        self.fields.get(field).cloned()
    }

    fn set(&mut self, field: &str, value: String) -> CoreResult<()> {
        self.assign(field, Value::String(value))
    }

    fn invalidate(&mut self, field: &str, message: &str) {
        self.errors.insert(field.to_owned(), message.to_owned());
    }
}
