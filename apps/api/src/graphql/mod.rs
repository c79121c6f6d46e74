//! GraphQL schema and resolvers for Mixtape
//!
//! This module contains the async-graphql schema including:
//! - Query resolvers for accounts, media items and collections
//! - Mutation resolvers for authentication, media items and membership
//! - The list query composer and request-scoped loaders
//! - Guards for authentication and roles

pub mod composer;
pub mod guards;
pub mod ids;
pub mod loaders;
pub mod mutation;
pub mod query;
pub mod scope;
pub mod schema;
pub mod types;

pub use schema::{build_schema, MixtapeSchema, SchemaBuilder};
pub use scope::RequestScope;
