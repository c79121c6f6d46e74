//! GraphQL queries
//!
//! All root queries require an authenticated caller.

mod account;
mod collection;
mod media_item;

pub use account::AccountQuery;
pub use collection::CollectionQuery;
pub use media_item::MediaItemQuery;

use async_graphql::MergedObject;

/// Root query type combining all query domains
#[derive(MergedObject, Default)]
pub struct Query(AccountQuery, MediaItemQuery, CollectionQuery);
