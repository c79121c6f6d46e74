//! Services behind the resolvers
//!
//! - Authentication: signup, login, token issuance and verification
//! - Authorization gate: bearer token to caller identity
//! - Collection membership changes with ownership checks

pub mod auth;
pub mod collection;
pub mod gate;

pub use auth::{AuthConfig, AuthService, ProfileUpdate, Signup};
pub use collection::CollectionService;
pub use gate::{AuthGate, Caller};
