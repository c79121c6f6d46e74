//! GraphQL type definitions for Mixtape
//!
//! Object types exposed through the API. Relation fields resolve through
//! the request's loaders.

mod account;
mod auth;
mod collection;
mod media_item;

pub use account::{Account, AccountRole};
pub use auth::Token;
pub use collection::Collection;
pub use media_item::MediaItem;
