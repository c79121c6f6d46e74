//! API server configuration

use std::env;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use mixtape_shared_config::{
    get_env_or_default, get_required_env, parse_env, CommonConfig, DatabaseConfig, Environment,
};

/// Minimum required length for JWT_SECRET to be considered secure
const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Which document store backs the gateways
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "memory" | "mem" => Ok(Self::Memory),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Postgres => write!(f, "postgres"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Common configuration shared with other services
    pub common: CommonConfig,

    /// Server port (default: 8080)
    pub port: u16,

    /// JWT secret for signing bearer tokens
    pub jwt_secret: String,

    /// JWT expiry (default: 1d)
    pub jwt_expiry: String,

    /// Document store backend (default: postgres)
    pub store_backend: StoreBackend,

    /// CORS allowed origins (optional)
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// In production mode, this function requires:
    /// - `JWT_SECRET`: Must be set and at least 32 characters long
    /// - `DATABASE_URL`: Must be explicitly set when the postgres backend is used
    ///
    /// In development/staging mode, sensible defaults are used for convenience.
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_str(&get_env_or_default("ENVIRONMENT", "development"))
            .unwrap_or_default();
        let is_production = environment.is_production();

        let jwt_secret = Self::load_jwt_secret(is_production)?;

        let store_backend: StoreBackend = parse_env("STORE_BACKEND", StoreBackend::default())
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if is_production && store_backend == StoreBackend::Postgres {
            Self::validate_database_url()?;
        }

        let common = CommonConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        if store_backend == StoreBackend::Postgres {
            common.database.validate()?;
        }

        Ok(Self {
            common,

            port: get_env_or_default("PORT", "8080")
                .parse()
                .context("Invalid PORT value")?,

            jwt_secret,

            jwt_expiry: get_env_or_default("JWT_EXPIRY", "1d"),

            store_backend,

            cors_allowed_origins: env::var("CORS_ORIGINS").ok().map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),
        })
    }

    /// Load and validate JWT_SECRET
    ///
    /// In production the secret must be set and at least
    /// `MIN_JWT_SECRET_LENGTH` characters. Development falls back to a
    /// fixed value with a warning.
    fn load_jwt_secret(is_production: bool) -> Result<String> {
        match get_required_env("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => {
                if is_production && secret.len() < MIN_JWT_SECRET_LENGTH {
                    bail!(
                        "JWT_SECRET must be at least {} characters in production (got {})",
                        MIN_JWT_SECRET_LENGTH,
                        secret.len()
                    );
                }
                Ok(secret)
            }
            _ if is_production => {
                bail!(
                    "JWT_SECRET environment variable is required in production. \
                     Please set a secure secret of at least {} characters.",
                    MIN_JWT_SECRET_LENGTH
                );
            }
            _ => {
                tracing::warn!(
                    "JWT_SECRET not set, using insecure default. \
                     This is only acceptable in development mode."
                );
                Ok("development-secret-change-in-production".to_string())
            }
        }
    }

    /// Validate that DATABASE_URL is explicitly set in production
    fn validate_database_url() -> Result<()> {
        match env::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => Ok(()),
            _ => {
                bail!(
                    "DATABASE_URL environment variable is required in production. \
                     Please set your PostgreSQL connection string."
                );
            }
        }
    }

    pub fn database(&self) -> &DatabaseConfig {
        &self.common.database
    }

    pub fn is_production(&self) -> bool {
        self.common.environment.is_production()
    }
}
