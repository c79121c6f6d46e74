//! HTTP route handlers for the Mixtape API
//!
//! - GraphQL endpoint and playground
//! - Health check and readiness endpoints

pub mod graphql;
pub mod health;

pub use graphql::{extract_bearer_token, graphql_router};
pub use health::{health_router, HealthState};
