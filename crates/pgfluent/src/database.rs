//! Connection establishment and the statement factory.

use crate::config::DatabaseConfig;
use crate::error::{FluentError, FluentResult};
use crate::executor::Executor;
use crate::statement::Statement;
use tokio_postgres::types::ToSql;
use tokio_postgres::{NoTls, Row};

/// A connected database handle carrying the configured table prefix.
///
/// `Database` implements [`Executor`], so statements it hands out are
/// typically run against it directly:
///
/// ```ignore
/// let db = Database::connect(&config).await?;
/// let rows = db
///     .statement()
///     .select_all()
///     .from("widgets")
///     .filter("id", "=", 5)
///     .execute(&db)
///     .await?
///     .into_rows();
/// ```
#[derive(Debug)]
pub struct Database {
    client: tokio_postgres::Client,
    prefix: String,
}

impl Database {
    /// Connect using the given configuration.
    ///
    /// Unreachable hosts, bad credentials, and malformed DSNs all surface
    /// here as [`FluentError::Connection`], before any statement can be
    /// built. The connection driver task is spawned onto the current tokio
    /// runtime.
    pub async fn connect(config: &DatabaseConfig) -> FluentResult<Self> {
        let url = config.url()?;
        let (client, connection) = tokio_postgres::connect(&url, NoTls)
            .await
            .map_err(|e| FluentError::Connection(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                #[cfg(feature = "tracing")]
                tracing::error!(error = %e, "database connection task failed");
                #[cfg(not(feature = "tracing"))]
                eprintln!("[pgfluent] connection error: {e}");
            }
        });

        Ok(Self {
            client,
            prefix: config.db_prefix.clone(),
        })
    }

    /// Start a fresh statement carrying the configured table prefix.
    ///
    /// One statement per logical query; the builder is consumed by its
    /// `execute` call.
    pub fn statement(&self) -> Statement {
        Statement::new(self.prefix.clone())
    }

    /// The configured table-name prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The underlying client, for anything the builder does not cover.
    pub fn client(&self) -> &tokio_postgres::Client {
        &self.client
    }
}

impl Executor for Database {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> FluentResult<Vec<Row>> {
        Executor::query(&self.client, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> FluentResult<u64> {
        Executor::execute(&self.client, sql, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_host_fails_with_connection_error() {
        // Port 1 refuses connections, so this fails without a server and
        // before any statement can be built.
        let config = DatabaseConfig {
            db_type: "postgres".to_string(),
            host: "127.0.0.1:1".to_string(),
            db_name: "app".to_string(),
            user: "app".to_string(),
            password: "secret".to_string(),
            db_prefix: "app_".to_string(),
        };
        let err = Database::connect(&config).await.unwrap_err();
        assert!(err.is_connection());
    }
}
