//! Per-collection DataLoader for batched document fetching
//!
//! Batches every id requested in one dispatch window into a single
//! `Gateway::find_by_ids` call. Every requested key receives an entry, `None`
//! when the document does not exist, so misses are cached for the rest of
//! the request as well.

use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::dataloader::Loader;
use uuid::Uuid;

use crate::models::{Account, Collection, MediaItem};
use crate::store::{Document, Gateway, StoreError};

/// DataLoader source backed by one collection gateway
pub struct DocumentLoader<D: Document> {
    gateway: Arc<dyn Gateway<D>>,
}

impl<D: Document> DocumentLoader<D> {
    pub fn new(gateway: Arc<dyn Gateway<D>>) -> Self {
        Self { gateway }
    }
}

pub type AccountLoader = DocumentLoader<Account>;
pub type MediaItemLoader = DocumentLoader<MediaItem>;
pub type CollectionLoader = DocumentLoader<Collection>;

impl<D: Document> Loader<Uuid> for DocumentLoader<D> {
    type Value = Option<D>;
    type Error = Arc<StoreError>;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        tracing::debug!(
            collection = %D::COLLECTION,
            keys = keys.len(),
            "Dispatching batched lookup"
        );

        let found = self.gateway.find_by_ids(keys).await.map_err(Arc::new)?;

        // Ensure all requested keys have an entry
        let mut values: HashMap<Uuid, Option<D>> = keys.iter().map(|id| (*id, None)).collect();
        for doc in found {
            values.insert(doc.id(), Some(doc));
        }

        Ok(values)
    }
}
