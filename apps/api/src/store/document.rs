//! Document behaviour shared by all store backends
//!
//! [`Document`] tells a backend how to identify a record, which text fields a
//! filter may address, and how inserts and patches change it. The memory
//! backend evaluates filters with [`Document::matches`]; the PostgreSQL
//! backend translates the same filters to SQL.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::query::{Field, Filter};
use super::CollectionName;
use crate::models::{
    Account, AccountPatch, Collection, CollectionPatch, MediaItem, MediaItemPatch, NewAccount,
    NewCollection, NewMediaItem,
};

/// A record stored in one of the document collections
pub trait Document: Clone + Send + Sync + Unpin + 'static {
    /// Insert shape
    type New: Send + Sync + 'static;
    /// Update shape
    type Patch: Send + Sync + 'static;

    /// Collection the documents live in
    const COLLECTION: CollectionName;

    fn id(&self) -> Uuid;

    /// Value of a text field, `None` if this document has no such field
    fn text(&self, field: Field) -> Option<&str>;

    fn creator_id(&self) -> Option<Uuid> {
        None
    }

    fn collaborator_ids(&self) -> &[Uuid] {
        &[]
    }

    /// Value that must be unique across the collection, if any
    fn unique_key(&self) -> Option<&str> {
        None
    }

    /// Build a stored document from its insert shape
    fn create(id: Uuid, new: Self::New, now: DateTime<Utc>) -> Self;

    /// Apply a patch in place
    fn apply(&mut self, patch: &Self::Patch, now: DateTime<Utc>);

    /// Evaluate a filter against this document
    fn matches(&self, filter: &Filter) -> bool {
        match filter {
            Filter::All => true,
            Filter::IdIn(ids) => ids.contains(&self.id()),
            Filter::Equals(field, value) => self.text(*field) == Some(value.as_str()),
            Filter::Contains(field, term) => self
                .text(*field)
                .map(|value| contains_ignore_case(value, term))
                .unwrap_or(false),
            Filter::CreatorIs(id) => self.creator_id() == Some(*id),
            Filter::HasCollaborator(id) => self.collaborator_ids().contains(id),
            Filter::AnyOf(filters) => filters.iter().any(|f| self.matches(f)),
        }
    }
}

/// Case-insensitive substring test
pub fn contains_ignore_case(value: &str, term: &str) -> bool {
    value.to_lowercase().contains(&term.to_lowercase())
}

impl Document for Account {
    type New = NewAccount;
    type Patch = AccountPatch;

    const COLLECTION: CollectionName = CollectionName::Accounts;

    fn id(&self) -> Uuid {
        self.id
    }

    fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => Some(self.name.as_str()),
            Field::Email => Some(self.email.as_str()),
            Field::Genre => None,
        }
    }

    fn unique_key(&self) -> Option<&str> {
        Some(self.email.as_str())
    }

    fn create(id: Uuid, new: NewAccount, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: &AccountPatch, now: DateTime<Utc>) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(hash) = &patch.password_hash {
            self.password_hash = hash.clone();
        }
        self.updated_at = now;
    }
}

impl Document for MediaItem {
    type New = NewMediaItem;
    type Patch = MediaItemPatch;

    const COLLECTION: CollectionName = CollectionName::MediaItems;

    fn id(&self) -> Uuid {
        self.id
    }

    fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => Some(self.name.as_str()),
            Field::Genre => Some(self.genre.as_str()),
            Field::Email => None,
        }
    }

    fn creator_id(&self) -> Option<Uuid> {
        Some(self.creator_id)
    }

    fn create(id: Uuid, new: NewMediaItem, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            genre: new.genre,
            creator_id: new.creator_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: &MediaItemPatch, now: DateTime<Utc>) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(genre) = &patch.genre {
            self.genre = genre.clone();
        }
        self.updated_at = now;
    }
}

impl Document for Collection {
    type New = NewCollection;
    type Patch = CollectionPatch;

    const COLLECTION: CollectionName = CollectionName::Collections;

    fn id(&self) -> Uuid {
        self.id
    }

    fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => Some(self.name.as_str()),
            Field::Email | Field::Genre => None,
        }
    }

    fn creator_id(&self) -> Option<Uuid> {
        Some(self.creator_id)
    }

    fn collaborator_ids(&self) -> &[Uuid] {
        &self.collaborator_ids
    }

    fn create(id: Uuid, new: NewCollection, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            creator_id: new.creator_id,
            media_item_ids: new.media_item_ids,
            collaborator_ids: new.collaborator_ids,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: &CollectionPatch, now: DateTime<Utc>) {
        patch.apply_to(self);
        self.updated_at = now;
    }
}
