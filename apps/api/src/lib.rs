//! Mixtape API library
//!
//! This module exposes the core API components for use in integration tests
//! and as a library.

pub mod config;
pub mod error;
pub mod graphql;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

// Re-export commonly used types
pub use error::{ApiError, ApiResult, AuthFailure};
pub use graphql::{build_schema, MixtapeSchema, RequestScope, SchemaBuilder};
pub use services::{AuthConfig, AuthGate, AuthService, Caller};
pub use store::{MemoryStore, PgStore, Store};
