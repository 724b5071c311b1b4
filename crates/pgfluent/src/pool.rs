//! Connection pool utilities

use crate::config::DatabaseConfig;
use crate::error::{FluentError, FluentResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;

/// Create a connection pool from a [`DatabaseConfig`].
///
/// Uses `NoTls` and a small default size, suitable for local/dev use. The
/// pooled clients implement [`Executor`](crate::Executor), so statements can
/// be run against them directly:
///
/// ```ignore
/// let pool = pgfluent::create_pool(&config)?;
/// let client = pool.get().await?;
/// let stmt = Statement::new(config.db_prefix.clone());
/// ```
pub fn create_pool(config: &DatabaseConfig) -> FluentResult<Pool> {
    create_pool_with_config(config, 16)
}

/// Create a connection pool with a custom maximum size.
pub fn create_pool_with_config(config: &DatabaseConfig, max_size: usize) -> FluentResult<Pool> {
    let pg_config: tokio_postgres::Config = config
        .url()?
        .parse()
        .map_err(|e: tokio_postgres::Error| FluentError::Connection(e.to_string()))?;

    let mgr = Manager::from_config(
        pg_config,
        NoTls,
        ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        },
    );
    Pool::builder(mgr)
        .max_size(max_size)
        .build()
        .map_err(|e| FluentError::Pool(e.to_string()))
}
