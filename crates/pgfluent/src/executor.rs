//! Executor trait: the prepare/bind/run seam between the statement builder
//! and a concrete SQL driver.
//!
//! The builder accumulates canonical `?` placeholders; the Postgres-backed
//! implementations here number them into `$1, $2, ...` before preparing,
//! since that is the placeholder style the wire protocol understands.

use crate::error::{FluentError, FluentResult};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A prepare/bind/run abstraction over a SQL driver.
///
/// `query` is used for row-returning statements, `execute` for everything
/// else. Implementations receive the builder's statement text with `?`
/// placeholders and the bindings in left-to-right placeholder order.
pub trait Executor: Send + Sync {
    /// Run a row-returning statement and return all rows in database order.
    fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = FluentResult<Vec<Row>>> + Send;

    /// Run a non-row-returning statement and return the affected row count.
    fn execute(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = FluentResult<u64>> + Send;
}

/// Rewrite `?` placeholders into numbered `$1, $2, ...` placeholders.
///
/// Question marks inside single-quoted literals are left alone. The builder
/// itself never emits quoted literals, but caller-trusted column/operator
/// fragments may contain them.
pub fn number_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut idx = 0usize;
    let mut in_literal = false;
    for ch in sql.chars() {
        match ch {
            '\'' => {
                in_literal = !in_literal;
                out.push(ch);
            }
            '?' if !in_literal => {
                idx += 1;
                out.push('$');
                out.push_str(&idx.to_string());
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Count the `?` placeholders in statement text, ignoring quoted literals.
pub(crate) fn count_placeholders(sql: &str) -> usize {
    let mut count = 0usize;
    let mut in_literal = false;
    for ch in sql.chars() {
        match ch {
            '\'' => in_literal = !in_literal,
            '?' if !in_literal => count += 1,
            _ => {}
        }
    }
    count
}

impl Executor for tokio_postgres::Client {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> FluentResult<Vec<Row>> {
        let sql = number_placeholders(sql);
        tokio_postgres::Client::query(self, &sql, params)
            .await
            .map_err(FluentError::from)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> FluentResult<u64> {
        let sql = number_placeholders(sql);
        tokio_postgres::Client::execute(self, &sql, params)
            .await
            .map_err(FluentError::from)
    }
}

impl Executor for tokio_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> FluentResult<Vec<Row>> {
        let sql = number_placeholders(sql);
        tokio_postgres::Transaction::query(self, &sql, params)
            .await
            .map_err(FluentError::from)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> FluentResult<u64> {
        let sql = number_placeholders(sql);
        tokio_postgres::Transaction::execute(self, &sql, params)
            .await
            .map_err(FluentError::from)
    }
}

impl<C: Executor> Executor for &C {
    fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = FluentResult<Vec<Row>>> + Send {
        (*self).query(sql, params)
    }

    fn execute(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = FluentResult<u64>> + Send {
        (*self).execute(sql, params)
    }
}

// ===== deadpool-postgres support =====

#[cfg(feature = "pool")]
impl Executor for deadpool_postgres::ClientWrapper {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> FluentResult<Vec<Row>> {
        Executor::query(&**self, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> FluentResult<u64> {
        Executor::execute(&**self, sql, params).await
    }
}

#[cfg(feature = "pool")]
impl Executor for deadpool_postgres::Client {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> FluentResult<Vec<Row>> {
        // Delegate to the deref target (ClientWrapper).
        Executor::query(&**self, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> FluentResult<u64> {
        Executor::execute(&**self, sql, params).await
    }
}
