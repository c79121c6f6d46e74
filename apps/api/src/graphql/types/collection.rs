//! Collection GraphQL type
//!
//! Member lists resolve through the request's loaders: order follows the
//! stored id list, duplicates repeat, dangling ids resolve to null.

use async_graphql::{Context, ErrorExtensions, Object, Result, ID};
use chrono::{DateTime, Utc};

use crate::graphql::ids::{to_id, to_ids};
use crate::graphql::scope;
use crate::models::Collection as DbCollection;

use super::account::Account;
use super::media_item::MediaItem;

/// Collection (playlist) exposed via GraphQL
pub struct Collection {
    inner: DbCollection,
}

impl Collection {
    pub fn new(collection: DbCollection) -> Self {
        Self { inner: collection }
    }
}

impl From<DbCollection> for Collection {
    fn from(collection: DbCollection) -> Self {
        Self::new(collection)
    }
}

#[Object]
impl Collection {
    async fn id(&self) -> ID {
        to_id(self.inner.id)
    }

    async fn name(&self) -> &str {
        &self.inner.name
    }

    async fn creator_id(&self) -> ID {
        to_id(self.inner.creator_id)
    }

    async fn media_item_ids(&self) -> Vec<ID> {
        to_ids(&self.inner.media_item_ids)
    }

    async fn collaborator_ids(&self) -> Vec<ID> {
        to_ids(&self.inner.collaborator_ids)
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.inner.updated_at
    }

    async fn creator(&self, ctx: &Context<'_>) -> Result<Option<Account>> {
        let creator = scope::loaders(ctx)?
            .account(self.inner.creator_id)
            .await
            .map_err(|e| e.extend())?;
        Ok(creator.map(Account::from))
    }

    async fn media_items(&self, ctx: &Context<'_>) -> Result<Vec<Option<MediaItem>>> {
        let items = scope::loaders(ctx)?
            .media_items(&self.inner.media_item_ids)
            .await
            .map_err(|e| e.extend())?;
        Ok(items
            .into_iter()
            .map(|item| item.map(MediaItem::from))
            .collect())
    }

    async fn collaborators(&self, ctx: &Context<'_>) -> Result<Vec<Option<Account>>> {
        let accounts = scope::loaders(ctx)?
            .accounts(&self.inner.collaborator_ids)
            .await
            .map_err(|e| e.extend())?;
        Ok(accounts
            .into_iter()
            .map(|account| account.map(Account::from))
            .collect())
    }
}
