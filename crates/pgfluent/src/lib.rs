//! # pgfluent
//!
//! A fluent, prefix-aware SQL statement builder for PostgreSQL.
//!
//! One [`Statement`] assembles one parameterized SQL statement through
//! chained calls, accumulating clause text and `?`-placeholder bindings in
//! call order, and runs it against an [`Executor`] (any `tokio-postgres`
//! client, transaction, or pooled client).
//!
//! ## Usage
//!
//! ```ignore
//! use pgfluent::{Database, DatabaseConfig, Statement};
//! use serde_json::json;
//!
//! let config = DatabaseConfig::from_env()?;
//! let db = Database::connect(&config).await?; // Connection error surfaces here
//!
//! // SELECT (rows back, in database order)
//! let rows = db
//!     .statement()
//!     .select_all()
//!     .from("widgets")
//!     .order_by("id", Statement::DESC)?
//!     .limit(3)
//!     .execute(&db)
//!     .await?
//!     .into_rows();
//!
//! // INSERT (success indicator back)
//! db.statement()
//!     .insert("widgets", [("name", json!("new1")), ("qty", json!(3))])?
//!     .execute(&db)
//!     .await?;
//!
//! // UPDATE
//! db.statement()
//!     .update("widgets", [("name", json!("updated1"))])?
//!     .filter("id", "=", 6)
//!     .execute(&db)
//!     .await?;
//!
//! // DELETE
//! db.statement()
//!     .delete()
//!     .from("widgets")
//!     .filter("id", "=", 1)
//!     .execute(&db)
//!     .await?;
//! ```
//!
//! ## Trust boundary
//!
//! Table names, column names, and operators are concatenated into the
//! statement text verbatim. They are caller-trusted literals, never end-user
//! input; only placeholder-bound values may come from untrusted sources.

pub mod config;
pub mod database;
pub mod error;
pub mod executor;
pub mod scalar;
pub mod statement;

pub use config::DatabaseConfig;
pub use database::Database;
pub use error::{FluentError, FluentResult};
pub use executor::{Executor, number_placeholders};
pub use scalar::Scalar;
pub use statement::{Executed, Statement};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};
