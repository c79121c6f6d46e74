//! Common test utilities for API integration tests
//!
//! Every test builds its own [`TestApp`] over a fresh in-memory store, so
//! tests never share state and need no database.

#![allow(dead_code)]

pub mod fixtures;

pub use fixtures::*;

use async_graphql::{Request, Variables};
use serde_json::Value;

use mixtape_api::graphql::{build_schema, MixtapeSchema, RequestScope};
use mixtape_api::models::{Account, NewAccount, Role};
use mixtape_api::services::{AuthConfig, AuthService};
use mixtape_api::store::{CollectionName, GatewayStats, MemoryStore, Store};

pub const TEST_SECRET: &str = "integration-test-secret-of-sufficient-length";

pub struct TestApp {
    pub memory: MemoryStore,
    pub store: Store,
    pub auth: AuthService,
    pub schema: MixtapeSchema,
}

impl TestApp {
    pub fn new() -> Self {
        let memory = MemoryStore::new();
        let store = memory.store();
        let auth = AuthService::new(store.accounts.clone(), AuthConfig::new(TEST_SECRET));
        let schema = build_schema(store.clone(), auth.clone());
        Self {
            memory,
            store,
            auth,
            schema,
        }
    }

    /// Execute one GraphQL request with its own request scope
    pub async fn execute(&self, query: &str, variables: Value, token: Option<&str>) -> Value {
        let request = Request::new(query).variables(Variables::from_json(variables));
        let request = RequestScope::attach(request, token.map(str::to_string), &self.store);
        let response = self.schema.execute(request).await;
        serde_json::to_value(&response).expect("response serializes")
    }

    /// Insert an account directly and issue a token for it
    ///
    /// Skips password hashing; use `signup` when a test needs to log in.
    pub async fn account(&self, name: &str, role: Role) -> (Account, String) {
        let account = self
            .store
            .accounts
            .create(NewAccount {
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                password_hash: "not-a-hash".to_string(),
                role,
            })
            .await
            .expect("account created");
        let token = self.auth.issue_token(&account).expect("token issued");
        (account, token)
    }

    pub fn stats(&self, collection: CollectionName) -> &GatewayStats {
        self.memory.stats(collection)
    }
}

/// `extensions.code` of the first error, if any
pub fn error_code(response: &Value) -> Option<&str> {
    response["errors"][0]["extensions"]["code"].as_str()
}

pub fn error_message(response: &Value) -> Option<&str> {
    response["errors"][0]["message"].as_str()
}

/// Assert the response has no errors and return its data
pub fn data(response: &Value) -> &Value {
    assert!(
        response.get("errors").map_or(true, |e| e.as_array().map_or(true, Vec::is_empty)),
        "unexpected errors: {response}"
    );
    &response["data"]
}
