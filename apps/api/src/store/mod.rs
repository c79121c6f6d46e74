//! Backend gateway to the document store
//!
//! Every read and write the resolvers perform goes through [`Gateway`], one
//! instance per collection. Two backends implement it:
//! - [`MemoryStore`]: in-process collections, used for development and tests
//! - [`PgStore`]: PostgreSQL tables accessed through sqlx
//!
//! Gateways never retry; any storage fault surfaces as [`StoreError`].

mod document;
mod memory;
mod postgres;
mod query;
mod sql;

pub use document::{contains_ignore_case, Document};
pub use memory::{GatewayStats, MemoryStore};
pub use postgres::PgStore;
pub use query::{Field, FindQuery, Filter, Pipeline, Sort, SortDirection, Stage};
pub use sql::escape_ilike;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Account, Collection, MediaItem};

/// Names of the persisted collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionName {
    Accounts,
    MediaItems,
    Collections,
}

impl CollectionName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accounts => "accounts",
            Self::MediaItems => "media_items",
            Self::Collections => "collections",
        }
    }
}

impl std::fmt::Display for CollectionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage failures
#[derive(Error, Debug)]
pub enum StoreError {
    /// Query or connection failure in the database
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unique constraint rejected the write
    #[error("duplicate {collection} key: {key}")]
    Duplicate {
        collection: CollectionName,
        key: String,
    },
}

/// Result type alias for gateway operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Uniform access to one document collection
#[async_trait]
pub trait Gateway<D: Document>: Send + Sync {
    /// First document matching the filter
    async fn find_one(&self, filter: &Filter) -> StoreResult<Option<D>>;

    /// Materialize every document the query selects
    async fn find(&self, query: &FindQuery) -> StoreResult<Vec<D>>;

    /// Run an aggregation pipeline (creator join plus match/sort stages)
    async fn aggregate(&self, pipeline: &Pipeline) -> StoreResult<Vec<D>>;

    async fn create(&self, new: D::New) -> StoreResult<D>;

    /// Apply `patch` only if the document matches `condition`, atomically.
    ///
    /// Returns `None` when the id is unknown or the condition does not hold.
    async fn update_where(
        &self,
        id: Uuid,
        condition: &Filter,
        patch: D::Patch,
    ) -> StoreResult<Option<D>>;

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<Option<D>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<D>> {
        self.find_one(&Filter::id(id)).await
    }

    /// Fetch a key set in one round-trip; missing ids are simply absent
    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<D>> {
        self.find(&FindQuery::filtered(Filter::IdIn(ids.to_vec())))
            .await
    }

    async fn update_by_id(&self, id: Uuid, patch: D::Patch) -> StoreResult<Option<D>> {
        self.update_where(id, &Filter::All, patch).await
    }
}

/// The three collection gateways the resolvers work against
#[derive(Clone)]
pub struct Store {
    pub accounts: Arc<dyn Gateway<Account>>,
    pub media_items: Arc<dyn Gateway<MediaItem>>,
    pub collections: Arc<dyn Gateway<Collection>>,
}
