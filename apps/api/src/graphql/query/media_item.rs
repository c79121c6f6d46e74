//! Media item queries

use async_graphql::{Context, ErrorExtensions, Object, Result, ID};

use crate::error::ApiError;
use crate::graphql::composer::{
    ListRequest, MediaItemFilterInput, MediaItemSortInput, PaginationInput,
};
use crate::graphql::guards::AuthGuard;
use crate::graphql::ids::parse_id;
use crate::graphql::types::MediaItem;
use crate::store::Store;

#[derive(Default)]
pub struct MediaItemQuery;

#[Object]
impl MediaItemQuery {
    /// List media items
    ///
    /// Pagination wins over filter, filter over sorting. Filtering or
    /// sorting by creator name joins the creator account.
    #[graphql(guard = "AuthGuard::authenticated()")]
    async fn list_media_items(
        &self,
        ctx: &Context<'_>,
        pagination: Option<PaginationInput>,
        filter: Option<MediaItemFilterInput>,
        sorting: Option<MediaItemSortInput>,
    ) -> Result<Vec<MediaItem>> {
        let store = ctx.data::<Store>()?;
        let plan = ListRequest {
            pagination,
            filter: filter.and_then(MediaItemFilterInput::recognize),
            sorting: sorting.and_then(MediaItemSortInput::recognize),
        }
        .compose()
        .map_err(|e| e.extend())?;

        tracing::debug!(?plan, "Listing media items");

        let items = plan
            .execute(store.media_items.as_ref())
            .await
            .map_err(|e| e.extend())?;

        Ok(items.into_iter().map(MediaItem::new).collect())
    }

    #[graphql(guard = "AuthGuard::authenticated()")]
    async fn get_media_item(&self, ctx: &Context<'_>, id: ID) -> Result<Option<MediaItem>> {
        let store = ctx.data::<Store>()?;
        let id = parse_id(&id).map_err(|e| e.extend())?;

        let item = store
            .media_items
            .find_by_id(id)
            .await
            .map_err(|e| ApiError::from(e).extend())?;

        Ok(item.map(MediaItem::new))
    }
}
