//! GraphQL mutations
//!
//! `signup` and `login` are open; every other mutation is guarded.

mod account;
mod auth;
mod collection;
mod media_item;

pub use account::AccountMutation;
pub use auth::AuthMutation;
pub use collection::CollectionMutation;
pub use media_item::MediaItemMutation;

use async_graphql::MergedObject;

/// Root mutation type combining all mutation domains
#[derive(MergedObject, Default)]
pub struct Mutation(
    AuthMutation,
    AccountMutation,
    MediaItemMutation,
    CollectionMutation,
);
