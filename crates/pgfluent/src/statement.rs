//! The fluent statement builder.
//!
//! A [`Statement`] accumulates one SQL statement left-to-right through
//! chained calls, together with the bindings for its `?` placeholders, and
//! is consumed by [`Statement::execute`]. One `Statement` per logical query;
//! the move into `execute` makes reuse after execution a compile error.
//!
//! Table names, column names, and operators are inserted verbatim, without
//! escaping. They are caller-trusted literals and must never come from end
//! users; only placeholder-bound values are safe to take from user input.

use crate::error::{FluentError, FluentResult};
use crate::executor::{Executor, count_placeholders};
use crate::scalar::Scalar;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A single SQL statement under construction.
///
/// Created by [`Database::statement`](crate::Database::statement) (which
/// supplies the configured table prefix) or directly via [`Statement::new`].
///
/// The builder performs no cross-clause consistency checking: mixing
/// incompatible clauses (say `select` and `insert`) or calling `filter`
/// twice produces invalid SQL that the database will reject at execute.
#[must_use]
#[derive(Debug, Clone)]
pub struct Statement {
    prefix: String,
    sql: String,
    bindings: Vec<Scalar>,
    expects_rows: bool,
}

/// Outcome of [`Statement::execute`].
#[derive(Debug)]
pub enum Executed {
    /// Full ordered result set of a row-returning statement.
    Rows(Vec<Row>),
    /// Success indicator of a non-row-returning statement.
    ///
    /// Deliberately collapses "zero rows affected" and "some rows affected"
    /// into the same `true`; affected-row counts are not fed back.
    Done(bool),
}

impl Executed {
    /// The rows of a row-returning statement, or `None` for a write.
    pub fn into_rows(self) -> Option<Vec<Row>> {
        match self {
            Self::Rows(rows) => Some(rows),
            Self::Done(_) => None,
        }
    }

    /// Whether the statement ran without error.
    pub fn succeeded(&self) -> bool {
        match self {
            Self::Rows(_) => true,
            Self::Done(ok) => *ok,
        }
    }
}

impl Statement {
    /// Ascending order direction for [`Statement::order_by`].
    pub const ASC: &'static str = "ASC";
    /// Descending order direction for [`Statement::order_by`].
    pub const DESC: &'static str = "DESC";

    /// Create an empty statement with the given table-name prefix.
    ///
    /// The prefix is prepended verbatim to every table referenced by
    /// `from`/`insert`/`update`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            sql: String::new(),
            bindings: Vec::new(),
            expects_rows: false,
        }
    }

    fn push_clause(&mut self, clause: &str) {
        self.sql.push_str(clause);
        self.sql.push(' ');
    }

    fn prefixed(&self, table: &str) -> String {
        format!("{}{}", self.prefix, table)
    }

    /// Append `SELECT <columns> ` and mark the statement as row-returning.
    ///
    /// An empty column list behaves like `["*"]`. Column names are
    /// caller-trusted and not validated.
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns: Vec<String> = columns
            .into_iter()
            .map(|c| c.as_ref().to_string())
            .collect();
        let list = if columns.is_empty() {
            "*".to_string()
        } else {
            columns.join(",")
        };
        self.push_clause(&format!("SELECT {list}"));
        self.expects_rows = true;
        self
    }

    /// Append `SELECT * ` and mark the statement as row-returning.
    pub fn select_all(self) -> Self {
        self.select(["*"])
    }

    /// Append `FROM <prefix><table> `.
    pub fn from(mut self, table: &str) -> Self {
        let table = self.prefixed(table);
        self.push_clause(&format!("FROM {table}"));
        self
    }

    /// Append `WHERE <column> <operator> ? ` and bind `value`.
    ///
    /// Column and operator are inserted verbatim. Only one `filter` call is
    /// meaningfully composable per statement; a second call appends a second
    /// literal `WHERE`.
    pub fn filter(mut self, column: &str, operator: &str, value: impl Into<Scalar>) -> Self {
        self.push_clause(&format!("WHERE {column} {operator} ?"));
        self.bindings.push(value.into());
        self
    }

    /// Append `ORDER BY <column> <direction> `.
    ///
    /// `direction` must be exactly [`Statement::ASC`] or [`Statement::DESC`]
    /// (case-sensitive); anything else fails with
    /// [`FluentError::InvalidValue`] and leaves the clause text untouched.
    pub fn order_by(mut self, column: &str, direction: &str) -> FluentResult<Self> {
        if direction != Self::ASC && direction != Self::DESC {
            return Err(FluentError::invalid_value(format!(
                "invalid order direction '{direction}', expected \"ASC\" or \"DESC\""
            )));
        }
        self.push_clause(&format!("ORDER BY {column} {direction}"));
        Ok(self)
    }

    /// Append `ORDER BY <column> DESC `, the default direction.
    pub fn order_by_desc(mut self, column: &str) -> Self {
        self.push_clause(&format!("ORDER BY {column} {}", Self::DESC));
        self
    }

    /// Append `LIMIT <n> `. No range validation beyond the integer type.
    pub fn limit(mut self, n: i64) -> Self {
        self.push_clause(&format!("LIMIT {n}"));
        self
    }

    /// Append `INSERT INTO <prefix><table> (<columns>) VALUES (?,...) ` and
    /// **replace** the bindings with the given values.
    ///
    /// `values` is an ordered sequence of `(column, value)` pairs; the
    /// column list and the bindings keep that order 1:1. Every value must be
    /// scalar (no arrays or objects), and at least one pair is required;
    /// otherwise the call fails with [`FluentError::InvalidValue`].
    pub fn insert<I, C>(mut self, table: &str, values: I) -> FluentResult<Self>
    where
        I: IntoIterator<Item = (C, serde_json::Value)>,
        C: Into<String>,
    {
        let (columns, bindings) = Self::scalar_columns("insert", table, values)?;

        let placeholders = vec!["?"; columns.len()].join(",");
        let table = self.prefixed(table);
        let columns = columns.join(",");
        self.push_clause(&format!(
            "INSERT INTO {table} ({columns}) VALUES ({placeholders})"
        ));
        self.bindings = bindings;
        Ok(self)
    }

    /// Append `UPDATE <prefix><table> SET c1 = ?, c2 = ? ` and **replace**
    /// the bindings with the given values, in SET-clause order.
    ///
    /// Validation is strict: any non-scalar value fails the whole call with
    /// [`FluentError::InvalidValue`] rather than silently dropping the entry.
    pub fn update<I, C>(mut self, table: &str, values: I) -> FluentResult<Self>
    where
        I: IntoIterator<Item = (C, serde_json::Value)>,
        C: Into<String>,
    {
        let (columns, bindings) = Self::scalar_columns("update", table, values)?;

        let sets = columns
            .iter()
            .map(|c| format!("{c} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let table = self.prefixed(table);
        self.push_clause(&format!("UPDATE {table} SET {sets}"));
        self.bindings = bindings;
        Ok(self)
    }

    /// Append literal `DELETE `. The table comes from a subsequent `from`.
    pub fn delete(mut self) -> Self {
        self.push_clause("DELETE");
        self
    }

    fn scalar_columns<I, C>(
        operation: &str,
        table: &str,
        values: I,
    ) -> FluentResult<(Vec<String>, Vec<Scalar>)>
    where
        I: IntoIterator<Item = (C, serde_json::Value)>,
        C: Into<String>,
    {
        let mut columns = Vec::new();
        let mut bindings = Vec::new();
        for (column, value) in values {
            let column = column.into();
            let scalar = Scalar::try_from(value).map_err(|_| {
                FluentError::invalid_value(format!(
                    "{operation} into '{table}': value for column '{column}' must be scalar"
                ))
            })?;
            columns.push(column);
            bindings.push(scalar);
        }
        if columns.is_empty() {
            return Err(FluentError::invalid_value(format!(
                "{operation} into '{table}' requires at least one column"
            )));
        }
        Ok((columns, bindings))
    }

    /// The accumulated statement text, with `?` placeholders.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The accumulated bindings, in placeholder order.
    pub fn bindings(&self) -> &[Scalar] {
        &self.bindings
    }

    /// Whether `execute` will return rows rather than a success indicator.
    pub fn expects_rows(&self) -> bool {
        self.expects_rows
    }

    fn validate(&self) -> FluentResult<()> {
        let placeholders = count_placeholders(&self.sql);
        if placeholders != self.bindings.len() {
            let bindings = self.bindings.len();
            return Err(FluentError::invalid_value(format!(
                "statement has {placeholders} placeholders but {bindings} bindings"
            )));
        }
        Ok(())
    }

    /// Run the assembled statement against `executor`, consuming the builder.
    ///
    /// Row-returning statements (anything after `select`) yield
    /// [`Executed::Rows`] with the full ordered result set; everything else
    /// yields [`Executed::Done`]. Driver failures surface unchanged as
    /// [`FluentError::Statement`].
    pub async fn execute<E: Executor>(self, executor: &E) -> FluentResult<Executed> {
        self.validate()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sql = %self.sql,
            bindings = self.bindings.len(),
            expects_rows = self.expects_rows,
            "executing statement"
        );

        let params: Vec<&(dyn ToSql + Sync)> = self
            .bindings
            .iter()
            .map(|b| b as &(dyn ToSql + Sync))
            .collect();

        if self.expects_rows {
            let rows = executor.query(&self.sql, &params).await?;
            Ok(Executed::Rows(rows))
        } else {
            executor.execute(&self.sql, &params).await?;
            Ok(Executed::Done(true))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stmt() -> Statement {
        Statement::new("app_")
    }

    #[test]
    fn select_from_filter() {
        let s = stmt().select_all().from("widgets").filter("id", "=", 5);
        assert_eq!(s.sql(), "SELECT * FROM app_widgets WHERE id = ? ");
        assert_eq!(s.bindings(), &[Scalar::Int(5)]);
        assert!(s.expects_rows());
    }

    #[test]
    fn select_with_columns() {
        let s = stmt().select(["id", "name"]).from("widgets");
        assert_eq!(s.sql(), "SELECT id,name FROM app_widgets ");
    }

    #[test]
    fn select_with_empty_columns_defaults_to_star() {
        let s = stmt().select(Vec::<String>::new()).from("widgets");
        assert_eq!(s.sql(), "SELECT * FROM app_widgets ");
    }

    #[test]
    fn empty_prefix_is_no_prefix() {
        let s = Statement::new("").select_all().from("widgets");
        assert_eq!(s.sql(), "SELECT * FROM widgets ");
    }

    #[test]
    fn delete_from_filter() {
        let s = stmt().delete().from("widgets").filter("id", "=", 5);
        assert_eq!(s.sql(), "DELETE FROM app_widgets WHERE id = ? ");
        assert_eq!(s.bindings(), &[Scalar::Int(5)]);
        assert!(!s.expects_rows());
    }

    #[test]
    fn order_by_and_limit() {
        let s = stmt()
            .select_all()
            .from("widgets")
            .order_by("id", Statement::DESC)
            .unwrap()
            .limit(3);
        assert_eq!(
            s.sql(),
            "SELECT * FROM app_widgets ORDER BY id DESC LIMIT 3 "
        );
        assert!(s.bindings().is_empty());
    }

    #[test]
    fn order_by_desc_is_the_default_direction() {
        let explicit = stmt()
            .select_all()
            .from("widgets")
            .order_by("id", Statement::DESC)
            .unwrap();
        let defaulted = stmt().select_all().from("widgets").order_by_desc("id");
        assert_eq!(explicit.sql(), defaulted.sql());
        assert_eq!(defaulted.sql(), "SELECT * FROM app_widgets ORDER BY id DESC ");
    }

    #[test]
    fn second_filter_appends_second_where() {
        // Documented limitation: only one filter is meaningfully composable.
        let s = stmt()
            .select_all()
            .from("widgets")
            .filter("id", "=", 1)
            .filter("qty", ">", 2);
        assert_eq!(
            s.sql(),
            "SELECT * FROM app_widgets WHERE id = ? WHERE qty > ? "
        );
        assert_eq!(s.bindings().len(), 2);
    }

    #[test]
    fn order_by_rejects_unknown_direction() {
        let err = stmt()
            .select_all()
            .from("widgets")
            .order_by("id", "sideways")
            .unwrap_err();
        assert!(err.is_invalid_value());
    }

    #[test]
    fn order_by_is_case_sensitive() {
        let err = stmt()
            .select_all()
            .from("widgets")
            .order_by("id", "desc")
            .unwrap_err();
        assert!(err.is_invalid_value());
    }

    #[test]
    fn insert_preserves_column_and_binding_order() {
        let s = stmt()
            .insert("widgets", [("name", json!("a")), ("qty", json!(3))])
            .unwrap();
        assert_eq!(s.sql(), "INSERT INTO app_widgets (name,qty) VALUES (?,?) ");
        assert_eq!(
            s.bindings(),
            &[Scalar::Text("a".to_string()), Scalar::Int(3)]
        );
        assert!(!s.expects_rows());
    }

    #[test]
    fn insert_placeholder_count_matches_bindings() {
        let s = stmt()
            .insert(
                "widgets",
                [
                    ("a", json!(1)),
                    ("b", json!(2.5)),
                    ("c", json!(null)),
                    ("d", json!(true)),
                ],
            )
            .unwrap();
        assert_eq!(s.sql().matches('?').count(), s.bindings().len());
        assert_eq!(s.bindings().len(), 4);
    }

    #[test]
    fn insert_rejects_non_scalar_values() {
        let err = stmt()
            .insert("widgets", [("name", json!("a")), ("tags", json!(["x"]))])
            .unwrap_err();
        assert!(err.is_invalid_value());
        assert!(err.to_string().contains("tags"));
    }

    #[test]
    fn insert_rejects_empty_values() {
        let values: Vec<(String, serde_json::Value)> = Vec::new();
        let err = stmt().insert("widgets", values).unwrap_err();
        assert!(err.is_invalid_value());
    }

    #[test]
    fn insert_replaces_existing_bindings() {
        // Mirrors the binding-replacement semantics: a filter binding added
        // before insert does not survive.
        let s = stmt()
            .filter("id", "=", 1)
            .insert("widgets", [("name", json!("a"))])
            .unwrap();
        assert_eq!(s.bindings(), &[Scalar::Text("a".to_string())]);
    }

    #[test]
    fn update_set_clause_has_no_trailing_comma() {
        let s = stmt()
            .update("widgets", [("name", json!("a")), ("qty", json!(3))])
            .unwrap();
        assert_eq!(s.sql(), "UPDATE app_widgets SET name = ?, qty = ? ");
        assert_eq!(
            s.bindings(),
            &[Scalar::Text("a".to_string()), Scalar::Int(3)]
        );
    }

    #[test]
    fn update_then_filter_appends_binding() {
        let s = stmt()
            .update("widgets", [("name", json!("updated"))])
            .unwrap()
            .filter("id", "=", 6);
        assert_eq!(s.sql(), "UPDATE app_widgets SET name = ? WHERE id = ? ");
        assert_eq!(
            s.bindings(),
            &[Scalar::Text("updated".to_string()), Scalar::Int(6)]
        );
    }

    #[test]
    fn update_rejects_non_scalar_values() {
        let err = stmt()
            .update("widgets", [("meta", json!({"k": "v"}))])
            .unwrap_err();
        assert!(err.is_invalid_value());
        assert!(err.to_string().contains("meta"));
    }

    #[test]
    fn filter_accepts_each_scalar_kind() {
        let s = stmt()
            .filter("a", "=", "text")
            .filter("b", "=", 1i64)
            .filter("c", "=", 1.5f64)
            .filter("d", "=", true)
            .filter("e", "=", None::<i64>);
        assert_eq!(
            s.bindings(),
            &[
                Scalar::Text("text".to_string()),
                Scalar::Int(1),
                Scalar::Float(1.5),
                Scalar::Bool(true),
                Scalar::Null,
            ]
        );
    }

    #[test]
    fn validate_catches_placeholder_binding_mismatch() {
        // filter before insert leaves an orphan placeholder after the
        // bindings are replaced.
        let s = stmt()
            .filter("id", "=", 1)
            .insert("widgets", [("name", json!("a"))])
            .unwrap();
        let err = s.validate().unwrap_err();
        assert!(err.is_invalid_value());
    }

    #[test]
    fn well_formed_statement_validates() {
        let s = stmt().select_all().from("widgets").filter("id", "=", 5);
        assert!(s.validate().is_ok());
    }
}
