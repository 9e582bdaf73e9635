//! Postgres-backed collection.
//!
//! Renders a [`Filter`] into a parameterised `SELECT COUNT(*)` over one
//! table, with filter fields mapped onto columns. Every bound value is sent
//! as text and compared against the column cast to text, so the same query
//! shape works for `uuid`, integer and text identities.

use std::future::Future;
use std::pin::Pin;

use diesel::pg::Pg;
use diesel::sql_types::{BigInt, Text};
use diesel::QueryableByName;
use diesel_async::RunQueryDsl;
use serde_json::Value;

use slugkit_core::constants::ID_FIELD;

use crate::db::filter::Condition;
use crate::db::{Collection, DbProvider, Filter};
use crate::error::{DbError, DbResult};

/// Rendered duplicate-count statement and its positional text binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountQuery {
    pub sql: String,
    pub binds: Vec<String>,
}

#[derive(QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

/// Collection backed by a Postgres table.
pub struct PgCollection<P> {
    provider: P,
    table: String,
    id_column: String,
}

impl<P: DbProvider> PgCollection<P> {
    /// ## Summary
    /// Counts rows of `table`, with the identity field mapped to an `id` column.
    #[must_use]
    pub fn new(provider: P, table: impl Into<String>) -> Self {
        Self {
            provider,
            table: table.into(),
            id_column: "id".to_owned(),
        }
    }

    /// Maps the identity field onto a different column.
    #[must_use]
    pub fn with_id_column(mut self, column: impl Into<String>) -> Self {
        self.id_column = column.into();
        self
    }

    /// ## Summary
    /// Renders the count statement for `filter` against this table.
    ///
    /// ## Errors
    /// See [`render_count_query`].
    pub fn render(&self, filter: &Filter) -> DbResult<CountQuery> {
        render_count_query(&self.table, &self.id_column, filter)
    }
}

impl<P: DbProvider> Collection for PgCollection<P> {
    fn name(&self) -> &str {
        &self.table
    }

    fn count<'a>(
        &'a self,
        filter: &'a Filter,
    ) -> Pin<Box<dyn Future<Output = DbResult<u64>> + Send + 'a>> {
        Box::pin(async move {
            let query = self.render(filter)?;
            tracing::debug!(table = %self.table, sql = %query.sql, "Counting duplicates");

            let mut conn = self.provider.get_connection().await?;
            let mut statement = diesel::sql_query(query.sql).into_boxed::<Pg>();
            for bind in query.binds {
                statement = statement.bind::<Text, _>(bind);
            }
            let row: CountRow = statement.get_result(&mut conn).await?;

            Ok(u64::try_from(row.count).unwrap_or_default())
        })
    }
}

/// ## Summary
/// Renders a `SELECT COUNT(*) AS count` statement for `filter`.
///
/// - literal / `$eq`: `col::text = $n`, or `col IS NULL` for `null`
/// - `$ne`: `col::text IS DISTINCT FROM $n`, or `col IS NOT NULL` for `null`
/// - `$regex`: `col ~ $n`, `col ~* $n` with the `i` option
///
/// The identity field `_id` is mapped onto `id_column`.
///
/// ## Errors
/// Returns [`DbError::UnsupportedFilter`] for blank identifiers, array or
/// object operands, or any filter [`Filter::conditions`] rejects.
pub fn render_count_query(table: &str, id_column: &str, filter: &Filter) -> DbResult<CountQuery> {
    let mut sql = format!("SELECT COUNT(*) AS count FROM {}", quote_ident(table)?);
    let mut clauses = Vec::new();
    let mut binds = Vec::new();

    for (field, condition) in filter.conditions()? {
        let column = quote_ident(if field == ID_FIELD { id_column } else { field })?;
        let clause = match condition {
            Condition::Equals(Value::Null) => format!("{column} IS NULL"),
            Condition::NotEquals(Value::Null) => format!("{column} IS NOT NULL"),
            Condition::Equals(value) => {
                binds.push(bind_text(field, value)?);
                format!("{column}::text = ${}", binds.len())
            }
            Condition::NotEquals(value) => {
                binds.push(bind_text(field, value)?);
                format!("{column}::text IS DISTINCT FROM ${}", binds.len())
            }
            Condition::Matches {
                pattern,
                case_insensitive,
            } => {
                binds.push(pattern.to_owned());
                let op = if case_insensitive { "~*" } else { "~" };
                format!("{column} {op} ${}", binds.len())
            }
        };
        clauses.push(clause);
    }

    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    Ok(CountQuery { sql, binds })
}

/// ## Summary
/// Quotes a table or column name as a Postgres identifier.
///
/// ## Errors
/// Returns [`DbError::UnsupportedFilter`] for blank names or names holding NUL.
pub fn quote_ident(name: &str) -> DbResult<String> {
    if name.trim().is_empty() || name.contains('\0') {
        return Err(DbError::UnsupportedFilter(format!(
            "invalid identifier `{name}`"
        )));
    }
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}

fn bind_text(field: &str, value: &Value) -> DbResult<String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => Err(DbError::UnsupportedFilter(
            format!("`{field}`: cannot compare a column against {value}"),
        )),
    }
}
