//! Configuration error types

use thiserror::Error;

/// Errors raised while reading service configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// The variable is set but does not parse
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),

    /// The database URL does not use a PostgreSQL scheme
    #[error("DATABASE_URL must start with postgres:// or postgresql:// (got '{0}')")]
    UnsupportedDatabaseUrl(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
