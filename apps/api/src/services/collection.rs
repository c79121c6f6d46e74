//! Collection membership service
//!
//! Membership changes run as one conditional update: the ownership rule is
//! part of the update's filter, so a concurrent change between check and
//! write cannot slip through. When nothing was updated a follow-up read
//! tells a missing collection apart from a caller without rights.

use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{Collection, CollectionPatch, NewCollection};
use crate::services::gate::Caller;
use crate::store::{Filter, Gateway};

#[derive(Clone)]
pub struct CollectionService {
    collections: Arc<dyn Gateway<Collection>>,
}

impl CollectionService {
    pub fn new(collections: Arc<dyn Gateway<Collection>>) -> Self {
        Self { collections }
    }

    /// Create a collection owned by the caller
    #[instrument(skip(self, media_item_ids, collaborator_ids), fields(caller = %caller.id))]
    pub async fn create(
        &self,
        caller: &Caller,
        name: String,
        media_item_ids: Vec<Uuid>,
        collaborator_ids: Vec<Uuid>,
    ) -> ApiResult<Collection> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::ValidationError(
                "collection name must not be empty".to_string(),
            ));
        }

        let collection = self
            .collections
            .create(NewCollection {
                name,
                creator_id: caller.id,
                media_item_ids,
                collaborator_ids: dedup(collaborator_ids),
            })
            .await?;

        tracing::info!(collection_id = %collection.id, "Collection created");
        Ok(collection)
    }

    /// Append media items; allowed for the creator and collaborators
    pub async fn add_media_items(
        &self,
        caller: &Caller,
        id: Uuid,
        media_item_ids: Vec<Uuid>,
    ) -> ApiResult<Collection> {
        self.edit_media_items(caller, id, CollectionPatch::AddMediaItems(media_item_ids))
            .await
    }

    /// Remove every occurrence of the given media items
    pub async fn remove_media_items(
        &self,
        caller: &Caller,
        id: Uuid,
        media_item_ids: Vec<Uuid>,
    ) -> ApiResult<Collection> {
        self.edit_media_items(caller, id, CollectionPatch::RemoveMediaItems(media_item_ids))
            .await
    }

    /// Add collaborators; creator only
    ///
    /// `creator_id` is the id the client claims as creator. It must be the
    /// caller; the stored creator is checked by the update itself.
    pub async fn add_collaborators(
        &self,
        caller: &Caller,
        id: Uuid,
        collaborator_ids: Vec<Uuid>,
        creator_id: Uuid,
    ) -> ApiResult<Collection> {
        self.edit_collaborators(
            caller,
            id,
            creator_id,
            CollectionPatch::AddCollaborators(collaborator_ids),
        )
        .await
    }

    pub async fn remove_collaborators(
        &self,
        caller: &Caller,
        id: Uuid,
        collaborator_ids: Vec<Uuid>,
        creator_id: Uuid,
    ) -> ApiResult<Collection> {
        self.edit_collaborators(
            caller,
            id,
            creator_id,
            CollectionPatch::RemoveCollaborators(collaborator_ids),
        )
        .await
    }

    async fn edit_media_items(
        &self,
        caller: &Caller,
        id: Uuid,
        patch: CollectionPatch,
    ) -> ApiResult<Collection> {
        let editors = Filter::AnyOf(vec![
            Filter::CreatorIs(caller.id),
            Filter::HasCollaborator(caller.id),
        ]);
        self.apply(id, editors, patch, "only the creator or a collaborator may edit media items")
            .await
    }

    async fn edit_collaborators(
        &self,
        caller: &Caller,
        id: Uuid,
        creator_id: Uuid,
        patch: CollectionPatch,
    ) -> ApiResult<Collection> {
        if creator_id != caller.id {
            return Err(ApiError::Forbidden(
                "creatorId does not match the authenticated account".to_string(),
            ));
        }
        self.apply(
            id,
            Filter::CreatorIs(caller.id),
            patch,
            "only the creator may edit collaborators",
        )
        .await
    }

    #[instrument(skip(self, condition, patch, denial))]
    async fn apply(
        &self,
        id: Uuid,
        condition: Filter,
        patch: CollectionPatch,
        denial: &str,
    ) -> ApiResult<Collection> {
        if let Some(updated) = self.collections.update_where(id, &condition, patch).await? {
            tracing::debug!(collection_id = %id, "Collection membership updated");
            return Ok(updated);
        }

        match self.collections.find_by_id(id).await? {
            None => Err(ApiError::not_found("collection", id.to_string())),
            Some(_) => {
                tracing::warn!(collection_id = %id, "Collection membership change rejected");
                Err(ApiError::Forbidden(denial.to_string()))
            }
        }
    }
}

fn dedup(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}
