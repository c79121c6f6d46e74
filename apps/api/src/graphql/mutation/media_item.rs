//! Media item mutations
//!
//! Creation is reserved for administrators. Updates and deletes only require
//! an authenticated caller.

use async_graphql::{Context, ErrorExtensions, InputObject, Object, Result, ID};

use crate::error::{ApiError, ApiResult};
use crate::graphql::guards::AuthGuard;
use crate::graphql::ids::parse_id;
use crate::graphql::scope;
use crate::graphql::types::MediaItem;
use crate::models::{MediaItemPatch, NewMediaItem, Role};
use crate::store::Store;

#[derive(Debug, InputObject)]
pub struct CreateMediaItemInput {
    pub name: String,
    pub genre: String,
}

#[derive(Debug, Default, InputObject)]
pub struct UpdateMediaItemInput {
    pub name: Option<String>,
    pub genre: Option<String>,
}

fn required(field: &str, value: String) -> ApiResult<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(ApiError::ValidationError(format!("{field} must not be empty")));
    }
    Ok(value)
}

#[derive(Default)]
pub struct MediaItemMutation;

#[Object]
impl MediaItemMutation {
    /// Create a media item owned by the caller
    ///
    /// # Errors
    /// - `FORBIDDEN` unless the caller is an Administrator
    #[graphql(guard = "AuthGuard::role(Role::Administrator)")]
    async fn create_media_item(
        &self,
        ctx: &Context<'_>,
        input: CreateMediaItemInput,
    ) -> Result<MediaItem> {
        let caller = scope::caller(ctx).await?;
        let store = ctx.data::<Store>()?;

        let new = NewMediaItem {
            name: required("name", input.name).map_err(|e| e.extend())?,
            genre: required("genre", input.genre).map_err(|e| e.extend())?,
            creator_id: caller.id,
        };
        let item = store
            .media_items
            .create(new)
            .await
            .map_err(|e| ApiError::from(e).extend())?;

        tracing::info!(media_item_id = %item.id, creator_id = %caller.id, "Media item created");
        Ok(MediaItem::new(item))
    }

    /// Update a media item, `null` when it does not exist
    #[graphql(guard = "AuthGuard::authenticated()")]
    async fn update_media_item(
        &self,
        ctx: &Context<'_>,
        id: ID,
        patch: UpdateMediaItemInput,
    ) -> Result<Option<MediaItem>> {
        let store = ctx.data::<Store>()?;
        let id = parse_id(&id).map_err(|e| e.extend())?;

        let patch = MediaItemPatch {
            name: patch
                .name
                .map(|name| required("name", name))
                .transpose()
                .map_err(|e| e.extend())?,
            genre: patch
                .genre
                .map(|genre| required("genre", genre))
                .transpose()
                .map_err(|e| e.extend())?,
        };
        let item = store
            .media_items
            .update_by_id(id, patch)
            .await
            .map_err(|e| ApiError::from(e).extend())?;

        Ok(item.map(MediaItem::new))
    }

    /// Delete a media item and return it, `null` when it does not exist
    ///
    /// Collections keep referencing the id; it resolves to `null` there.
    #[graphql(guard = "AuthGuard::authenticated()")]
    async fn delete_media_item(&self, ctx: &Context<'_>, id: ID) -> Result<Option<MediaItem>> {
        let store = ctx.data::<Store>()?;
        let id = parse_id(&id).map_err(|e| e.extend())?;

        let item = store
            .media_items
            .delete_by_id(id)
            .await
            .map_err(|e| ApiError::from(e).extend())?;

        if item.is_some() {
            tracing::info!(media_item_id = %id, "Media item deleted");
        }
        Ok(item.map(MediaItem::new))
    }
}
