//! Collection (playlist) models
//!
//! A collection references media items and collaborator accounts by id.
//! Membership changes are expressed as [`CollectionPatch`] values so the
//! store can apply them in a single conditional update.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Collection record from the collections collection
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Collection {
    /// Unique collection identifier
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Account that created the collection
    pub creator_id: Uuid,

    /// Member media items, in stored order (duplicates permitted)
    pub media_item_ids: Vec<Uuid>,

    /// Accounts allowed to edit the media item list
    pub collaborator_ids: Vec<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a new collection
#[derive(Debug, Clone)]
pub struct NewCollection {
    pub name: String,
    pub creator_id: Uuid,
    pub media_item_ids: Vec<Uuid>,
    pub collaborator_ids: Vec<Uuid>,
}

/// A single membership change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionPatch {
    /// Append media item ids (duplicates kept)
    AddMediaItems(Vec<Uuid>),
    /// Drop every occurrence of the given media item ids
    RemoveMediaItems(Vec<Uuid>),
    /// Add collaborator ids not already present
    AddCollaborators(Vec<Uuid>),
    /// Drop the given collaborator ids
    RemoveCollaborators(Vec<Uuid>),
}

impl CollectionPatch {
    /// Apply this change to an in-memory collection
    pub fn apply_to(&self, collection: &mut Collection) {
        match self {
            Self::AddMediaItems(ids) => collection.media_item_ids.extend(ids.iter().copied()),
            Self::RemoveMediaItems(ids) => collection.media_item_ids.retain(|id| !ids.contains(id)),
            Self::AddCollaborators(ids) => {
                for id in ids {
                    if !collection.collaborator_ids.contains(id) {
                        collection.collaborator_ids.push(*id);
                    }
                }
            }
            Self::RemoveCollaborators(ids) => {
                collection.collaborator_ids.retain(|id| !ids.contains(id))
            }
        }
    }
}
