//! Document-store style filters for duplicate counts.
//!
//! A [`Filter`] is a JSON object keyed by field name. A field maps either to
//! a literal (equality) or to an operator object using `$eq`, `$ne`,
//! `$regex` and `$options`, the subset the slug hook and its scopes need.

use regex_lite::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use slugkit_core::constants::{EQUAL_OPERATOR, NOT_EQUAL_OPERATOR, REGEX_OPERATOR, REGEX_OPTIONS};

use crate::error::{DbError, DbResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(Map<String, Value>);

/// A single parsed constraint on one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition<'a> {
    Equals(&'a Value),
    NotEquals(&'a Value),
    Matches {
        pattern: &'a str,
        case_insensitive: bool,
    },
}

impl Filter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Builds a filter from a JSON value.
    ///
    /// ## Errors
    /// Returns [`DbError::UnsupportedFilter`] if `value` is not an object.
    pub fn from_value(value: Value) -> DbResult<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(DbError::UnsupportedFilter(format!(
                "filter must be a JSON object, got {other}"
            ))),
        }
    }

    /// Requires `field` to equal `value`.
    #[must_use]
    pub fn equals(mut self, field: &str, value: Value) -> Self {
        self.0.insert(field.to_owned(), value);
        self
    }

    /// Requires `field` to differ from `value`.
    #[must_use]
    pub fn not_equals(mut self, field: &str, value: Value) -> Self {
        let mut op = Map::new();
        op.insert(NOT_EQUAL_OPERATOR.to_owned(), value);
        self.0.insert(field.to_owned(), Value::Object(op));
        self
    }

    /// Requires `field` to be a string matching `pattern`.
    #[must_use]
    pub fn matches_regex(mut self, field: &str, pattern: &str, case_insensitive: bool) -> Self {
        let mut op = Map::new();
        op.insert(REGEX_OPERATOR.to_owned(), Value::String(pattern.to_owned()));
        if case_insensitive {
            op.insert(REGEX_OPTIONS.to_owned(), Value::String("i".to_owned()));
        }
        self.0.insert(field.to_owned(), Value::Object(op));
        self
    }

    /// ## Summary
    /// Deep-merges `other` into this filter.
    ///
    /// Keys from `other` win. Where both sides hold an object for the same
    /// key the objects are merged key by key; any other value is replaced.
    pub fn merge(&mut self, other: Self) {
        deep_merge(&mut self.0, other.0);
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// ## Summary
    /// Parses the filter into per-field conditions, in key order.
    ///
    /// ## Errors
    /// Returns [`DbError::UnsupportedFilter`] for unknown operators, a
    /// non-string `$regex`, unsupported `$options` or `$options` without
    /// `$regex`.
    pub fn conditions(&self) -> DbResult<Vec<(&str, Condition<'_>)>> {
        let mut conditions = Vec::with_capacity(self.0.len());
        for (field, value) in &self.0 {
            match value {
                Value::Object(ops) if is_operator_object(ops) => {
                    for condition in parse_operators(field, ops)? {
                        conditions.push((field.as_str(), condition));
                    }
                }
                literal => conditions.push((field.as_str(), Condition::Equals(literal))),
            }
        }
        Ok(conditions)
    }

    /// ## Summary
    /// Parses the filter and compiles its regular expressions once, for
    /// evaluating many stored documents.
    ///
    /// ## Errors
    /// Returns [`DbError::UnsupportedFilter`] if the filter cannot be parsed
    /// or holds an invalid regular expression.
    pub fn matcher(&self) -> DbResult<Matcher<'_>> {
        let checks = self
            .conditions()?
            .into_iter()
            .map(|(field, condition)| {
                let check = match condition {
                    Condition::Equals(expected) => Check::Equals(expected),
                    Condition::NotEquals(expected) => Check::NotEquals(expected),
                    Condition::Matches {
                        pattern,
                        case_insensitive,
                    } => Check::Matches(compile(pattern, case_insensitive)?),
                };
                Ok((field, check))
            })
            .collect::<DbResult<Vec<_>>>()?;
        Ok(Matcher { checks })
    }

    /// ## Summary
    /// Evaluates the filter against a stored document's fields.
    ///
    /// ## Errors
    /// Same as [`Filter::matcher`].
    pub fn matches(&self, fields: &Map<String, Value>) -> DbResult<bool> {
        Ok(self.matcher()?.matches(fields))
    }
}

/// A parsed [`Filter`] ready to evaluate stored documents.
///
/// Missing fields compare as `null`; a regex only matches string values.
#[derive(Debug)]
pub struct Matcher<'a> {
    checks: Vec<(&'a str, Check<'a>)>,
}

#[derive(Debug)]
enum Check<'a> {
    Equals(&'a Value),
    NotEquals(&'a Value),
    Matches(Regex),
}

impl Matcher<'_> {
    #[must_use]
    pub fn matches(&self, fields: &Map<String, Value>) -> bool {
        self.checks.iter().all(|(field, check)| {
            let actual = fields.get(*field).unwrap_or(&Value::Null);
            match check {
                Check::Equals(expected) => actual == *expected,
                Check::NotEquals(expected) => actual != *expected,
                Check::Matches(regex) => actual.as_str().is_some_and(|text| regex.is_match(text)),
            }
        })
    }
}

impl From<Map<String, Value>> for Filter {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Value::Object(self.0.clone()))
    }
}

fn deep_merge(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, value) in source {
        if let Value::Object(incoming) = value {
            if let Some(Value::Object(existing)) = target.get_mut(&key) {
                deep_merge(existing, incoming);
                continue;
            }
            target.insert(key, Value::Object(incoming));
        } else {
            target.insert(key, value);
        }
    }
}

fn is_operator_object(ops: &Map<String, Value>) -> bool {
    !ops.is_empty() && ops.keys().all(|key| key.starts_with('$'))
}

fn parse_operators<'a>(field: &str, ops: &'a Map<String, Value>) -> DbResult<Vec<Condition<'a>>> {
    let case_insensitive = match ops.get(REGEX_OPTIONS) {
        None => false,
        Some(Value::String(options)) => parse_regex_options(field, options)?,
        Some(other) => {
            return Err(DbError::UnsupportedFilter(format!(
                "`{field}`: {REGEX_OPTIONS} must be a string, got {other}"
            )));
        }
    };

    let mut conditions = Vec::with_capacity(ops.len());
    for (op, operand) in ops {
        match op.as_str() {
            EQUAL_OPERATOR => conditions.push(Condition::Equals(operand)),
            NOT_EQUAL_OPERATOR => conditions.push(Condition::NotEquals(operand)),
            REGEX_OPERATOR => {
                let Value::String(pattern) = operand else {
                    return Err(DbError::UnsupportedFilter(format!(
                        "`{field}`: {REGEX_OPERATOR} must be a string, got {operand}"
                    )));
                };
                conditions.push(Condition::Matches {
                    pattern,
                    case_insensitive,
                });
            }
            REGEX_OPTIONS => {
                if !ops.contains_key(REGEX_OPERATOR) {
                    return Err(DbError::UnsupportedFilter(format!(
                        "`{field}`: {REGEX_OPTIONS} without {REGEX_OPERATOR}"
                    )));
                }
            }
            unknown => {
                return Err(DbError::UnsupportedFilter(format!(
                    "`{field}`: unknown operator {unknown}"
                )));
            }
        }
    }
    Ok(conditions)
}

fn parse_regex_options(field: &str, options: &str) -> DbResult<bool> {
    let mut case_insensitive = false;
    for flag in options.chars() {
        match flag {
            'i' => case_insensitive = true,
            // Global matching is meaningless for a count
            'g' => {}
            other => {
                return Err(DbError::UnsupportedFilter(format!(
                    "`{field}`: unsupported regex option `{other}`"
                )));
            }
        }
    }
    Ok(case_insensitive)
}

fn compile(pattern: &str, case_insensitive: bool) -> DbResult<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| DbError::UnsupportedFilter(format!("invalid regex `{pattern}`: {e}")))
}
