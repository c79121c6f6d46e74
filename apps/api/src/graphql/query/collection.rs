//! Collection queries

use async_graphql::{Context, ErrorExtensions, Object, Result, ID};

use crate::error::ApiError;
use crate::graphql::composer::{CollectionFilterInput, CollectionSortInput, ListRequest};
use crate::graphql::guards::AuthGuard;
use crate::graphql::ids::parse_id;
use crate::graphql::types::Collection;
use crate::store::Store;

#[derive(Default)]
pub struct CollectionQuery;

#[Object]
impl CollectionQuery {
    /// List collections by filter or sorting; collections are not paginated
    #[graphql(guard = "AuthGuard::authenticated()")]
    async fn list_collections(
        &self,
        ctx: &Context<'_>,
        filter: Option<CollectionFilterInput>,
        sorting: Option<CollectionSortInput>,
    ) -> Result<Vec<Collection>> {
        let store = ctx.data::<Store>()?;
        let plan = ListRequest {
            pagination: None,
            filter: filter.and_then(CollectionFilterInput::recognize),
            sorting: sorting.and_then(CollectionSortInput::recognize),
        }
        .compose()
        .map_err(|e| e.extend())?;

        tracing::debug!(?plan, "Listing collections");

        let collections = plan
            .execute(store.collections.as_ref())
            .await
            .map_err(|e| e.extend())?;

        Ok(collections.into_iter().map(Collection::new).collect())
    }

    #[graphql(guard = "AuthGuard::authenticated()")]
    async fn get_collection(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Collection>> {
        let store = ctx.data::<Store>()?;
        let id = parse_id(&id).map_err(|e| e.extend())?;

        let collection = store
            .collections
            .find_by_id(id)
            .await
            .map_err(|e| ApiError::from(e).extend())?;

        Ok(collection.map(Collection::new))
    }
}
