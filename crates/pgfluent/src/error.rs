//! Error types for pgfluent

use thiserror::Error;

/// Result type alias for pgfluent operations
pub type FluentResult<T> = Result<T, FluentError>;

/// Error types for statement building and execution
#[derive(Debug, Error)]
pub enum FluentError {
    /// Database connection error (bad credentials, unreachable host, bad DSN,
    /// missing configuration). Fatal to the handle being constructed.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A value supplied to a clause method violates a structural precondition
    /// (non-scalar value for insert/update, unrecognized order direction,
    /// empty column set, placeholder/binding mismatch).
    #[error("Invalid query value: {0}")]
    InvalidValue(String),

    /// Prepare/bind/run failure from the database (syntax error, constraint
    /// violation, type mismatch). Propagated unchanged.
    #[error("Statement error: {0}")]
    Statement(#[from] tokio_postgres::Error),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),
}

impl FluentError {
    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create an invalid query value error
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue(message.into())
    }

    /// Check if this is a connection error
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Check if this is an invalid query value error
    pub fn is_invalid_value(&self) -> bool {
        matches!(self, Self::InvalidValue(_))
    }

    /// Check if this is a statement error from the database
    pub fn is_statement(&self) -> bool {
        matches!(self, Self::Statement(_))
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for FluentError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
