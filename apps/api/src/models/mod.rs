//! Persisted models for Mixtape
//!
//! This module contains the records stored by the document store:
//! - Accounts and authentication claims
//! - Media items
//! - Collections and their membership changes

pub mod account;
pub mod collection;
pub mod media_item;

pub use account::{Account, AccountPatch, Claims, NewAccount, Role};
pub use collection::{Collection, CollectionPatch, NewCollection};
pub use media_item::{MediaItem, MediaItemPatch, NewMediaItem};
