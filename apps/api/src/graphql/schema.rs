//! GraphQL schema builder for Mixtape
//!
//! The schema carries the shared services as context data. Per-request
//! state (token, caller, loaders) is attached by the HTTP handler through
//! [`RequestScope`](super::scope::RequestScope).

use async_graphql::{EmptySubscription, Schema};

use crate::services::{AuthGate, AuthService, CollectionService};
use crate::store::Store;

use super::mutation::Mutation;
use super::query::Query;

/// Default maximum query depth
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// The Mixtape GraphQL schema type
pub type MixtapeSchema = Schema<Query, Mutation, EmptySubscription>;

/// Builder for constructing the GraphQL schema with required services
pub struct SchemaBuilder {
    store: Store,
    auth_service: AuthService,
    max_depth: usize,
}

impl SchemaBuilder {
    pub fn new(store: Store, auth_service: AuthService) -> Self {
        Self {
            store,
            auth_service,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit nesting depth of incoming queries
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Build the schema with all configured services
    pub fn build(self) -> MixtapeSchema {
        let gate = AuthGate::new(self.auth_service.clone(), self.store.accounts.clone());
        let collections = CollectionService::new(self.store.collections.clone());

        Schema::build(Query::default(), Mutation::default(), EmptySubscription)
            .data(self.store)
            .data(self.auth_service)
            .data(gate)
            .data(collections)
            .limit_depth(self.max_depth)
            .finish()
    }
}

/// Create a new GraphQL schema with the default limits
pub fn build_schema(store: Store, auth_service: AuthService) -> MixtapeSchema {
    SchemaBuilder::new(store, auth_service).build()
}
