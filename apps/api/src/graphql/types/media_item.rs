//! Media item GraphQL type

use async_graphql::{Context, ErrorExtensions, Object, Result, ID};
use chrono::{DateTime, Utc};

use crate::graphql::ids::to_id;
use crate::graphql::scope;
use crate::models::MediaItem as DbMediaItem;

use super::account::Account;

/// Media item exposed via GraphQL
pub struct MediaItem {
    inner: DbMediaItem,
}

impl MediaItem {
    pub fn new(item: DbMediaItem) -> Self {
        Self { inner: item }
    }
}

impl From<DbMediaItem> for MediaItem {
    fn from(item: DbMediaItem) -> Self {
        Self::new(item)
    }
}

#[Object]
impl MediaItem {
    async fn id(&self) -> ID {
        to_id(self.inner.id)
    }

    async fn name(&self) -> &str {
        &self.inner.name
    }

    async fn genre(&self) -> &str {
        &self.inner.genre
    }

    /// Id of the account that created this item
    async fn creator_id(&self) -> ID {
        to_id(self.inner.creator_id)
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.inner.updated_at
    }

    /// Creating account (batched through the request's loaders); null if it no longer exists
    async fn creator(&self, ctx: &Context<'_>) -> Result<Option<Account>> {
        let creator = scope::loaders(ctx)?
            .account(self.inner.creator_id)
            .await
            .map_err(|e| e.extend())?;
        Ok(creator.map(Account::from))
    }
}
