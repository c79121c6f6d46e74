//! GraphQL guards for Mixtape API
//!
//! Authentication and role guards wrapping every root operation except
//! `signup` and `login`.

mod auth;

pub use auth::AuthGuard;
