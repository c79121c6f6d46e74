//! Collection mutations
//!
//! Media item membership may be edited by the creator and collaborators;
//! collaborators only by the creator.

use async_graphql::{Context, ErrorExtensions, InputObject, Object, Result, ID};

use crate::graphql::guards::AuthGuard;
use crate::graphql::ids::{parse_id, parse_ids};
use crate::graphql::scope;
use crate::graphql::types::Collection;
use crate::models::Role;
use crate::services::CollectionService;

#[derive(Debug, InputObject)]
pub struct CreateCollectionInput {
    pub name: String,
    #[graphql(default)]
    pub media_item_ids: Vec<ID>,
    #[graphql(default)]
    pub collaborator_ids: Vec<ID>,
}

#[derive(Default)]
pub struct CollectionMutation;

#[Object]
impl CollectionMutation {
    /// Create a collection owned by the caller
    ///
    /// # Errors
    /// - `FORBIDDEN` unless the caller is a Creator
    #[graphql(guard = "AuthGuard::role(Role::Creator)")]
    async fn create_collection(
        &self,
        ctx: &Context<'_>,
        input: CreateCollectionInput,
    ) -> Result<Collection> {
        let caller = scope::caller(ctx).await?;
        let service = ctx.data::<CollectionService>()?;

        let media_item_ids = parse_ids(&input.media_item_ids).map_err(|e| e.extend())?;
        let collaborator_ids = parse_ids(&input.collaborator_ids).map_err(|e| e.extend())?;

        let collection = service
            .create(&caller, input.name, media_item_ids, collaborator_ids)
            .await
            .map_err(|e| e.extend())?;

        Ok(Collection::new(collection))
    }

    /// Append media items (duplicates are kept)
    ///
    /// # Errors
    /// - `NOT_FOUND` when the collection does not exist
    /// - `FORBIDDEN` unless the caller is the creator or a collaborator
    #[graphql(guard = "AuthGuard::authenticated()")]
    async fn add_media_items_to_collection(
        &self,
        ctx: &Context<'_>,
        id: ID,
        media_item_ids: Vec<ID>,
    ) -> Result<Collection> {
        let caller = scope::caller(ctx).await?;
        let service = ctx.data::<CollectionService>()?;
        let id = parse_id(&id).map_err(|e| e.extend())?;
        let media_item_ids = parse_ids(&media_item_ids).map_err(|e| e.extend())?;

        let collection = service
            .add_media_items(&caller, id, media_item_ids)
            .await
            .map_err(|e| e.extend())?;

        Ok(Collection::new(collection))
    }

    /// Remove every occurrence of the given media items
    #[graphql(guard = "AuthGuard::authenticated()")]
    async fn remove_media_items_from_collection(
        &self,
        ctx: &Context<'_>,
        id: ID,
        media_item_ids: Vec<ID>,
    ) -> Result<Collection> {
        let caller = scope::caller(ctx).await?;
        let service = ctx.data::<CollectionService>()?;
        let id = parse_id(&id).map_err(|e| e.extend())?;
        let media_item_ids = parse_ids(&media_item_ids).map_err(|e| e.extend())?;

        let collection = service
            .remove_media_items(&caller, id, media_item_ids)
            .await
            .map_err(|e| e.extend())?;

        Ok(Collection::new(collection))
    }

    /// Add collaborators (set union)
    ///
    /// # Errors
    /// - `NOT_FOUND` when the collection does not exist
    /// - `FORBIDDEN` unless the caller is the creator and `creatorId` is the caller
    #[graphql(guard = "AuthGuard::authenticated()")]
    async fn add_collaborators_to_collection(
        &self,
        ctx: &Context<'_>,
        id: ID,
        collaborator_ids: Vec<ID>,
        creator_id: ID,
    ) -> Result<Collection> {
        let caller = scope::caller(ctx).await?;
        let service = ctx.data::<CollectionService>()?;
        let id = parse_id(&id).map_err(|e| e.extend())?;
        let collaborator_ids = parse_ids(&collaborator_ids).map_err(|e| e.extend())?;
        let creator_id = parse_id(&creator_id).map_err(|e| e.extend())?;

        let collection = service
            .add_collaborators(&caller, id, collaborator_ids, creator_id)
            .await
            .map_err(|e| e.extend())?;

        Ok(Collection::new(collection))
    }

    #[graphql(guard = "AuthGuard::authenticated()")]
    async fn remove_collaborators_from_collection(
        &self,
        ctx: &Context<'_>,
        id: ID,
        collaborator_ids: Vec<ID>,
        creator_id: ID,
    ) -> Result<Collection> {
        let caller = scope::caller(ctx).await?;
        let service = ctx.data::<CollectionService>()?;
        let id = parse_id(&id).map_err(|e| e.extend())?;
        let collaborator_ids = parse_ids(&collaborator_ids).map_err(|e| e.extend())?;
        let creator_id = parse_id(&creator_id).map_err(|e| e.extend())?;

        let collection = service
            .remove_collaborators(&caller, id, collaborator_ids, creator_id)
            .await
            .map_err(|e| e.extend())?;

        Ok(Collection::new(collection))
    }
}
