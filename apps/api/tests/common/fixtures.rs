//! Document fixtures inserted straight into the store

use uuid::Uuid;

use mixtape_api::models::{Collection, MediaItem, NewCollection, NewMediaItem};
use mixtape_api::store::Store;

pub async fn media_item(store: &Store, name: &str, genre: &str, creator_id: Uuid) -> MediaItem {
    store
        .media_items
        .create(NewMediaItem {
            name: name.to_string(),
            genre: genre.to_string(),
            creator_id,
        })
        .await
        .expect("media item created")
}

pub async fn collection(
    store: &Store,
    name: &str,
    creator_id: Uuid,
    media_item_ids: Vec<Uuid>,
    collaborator_ids: Vec<Uuid>,
) -> Collection {
    store
        .collections
        .create(NewCollection {
            name: name.to_string(),
            creator_id,
            media_item_ids,
            collaborator_ids,
        })
        .await
        .expect("collection created")
}
