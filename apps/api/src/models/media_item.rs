//! Media item models

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Media item record from the media_items collection
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MediaItem {
    /// Unique media item identifier
    pub id: Uuid,

    /// Title of the item
    pub name: String,

    /// Free-form genre label
    pub genre: String,

    /// Account that created the item (weak reference, not an ownership edge)
    pub creator_id: Uuid,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a new media item
#[derive(Debug, Clone)]
pub struct NewMediaItem {
    pub name: String,
    pub genre: String,
    pub creator_id: Uuid,
}

/// Partial update applied by `updateMediaItem`
#[derive(Debug, Clone, Default)]
pub struct MediaItemPatch {
    pub name: Option<String>,
    pub genre: Option<String>,
}
