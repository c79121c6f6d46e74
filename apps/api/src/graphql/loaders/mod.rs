//! Request-scoped DataLoaders for relation fields
//!
//! A [`Loaders`] value is built fresh for every request and dropped with it.
//! It holds one `DataLoader` per collection, each with a request-lifetime
//! `HashMapCache`:
//! - loads registered before the resolver task yields are coalesced into one
//!   `find_by_ids` call per collection
//! - a key already resolved in this request (found or not) is served from
//!   the cache without another gateway call
//! - nothing is shared between requests

mod document;

pub use document::{AccountLoader, CollectionLoader, DocumentLoader, MediaItemLoader};

use async_graphql::dataloader::{DataLoader, HashMapCache};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::models::{Account, Collection, MediaItem};
use crate::store::{CollectionName, Document, Store};

type CachedLoader<D> = DataLoader<DocumentLoader<D>, HashMapCache>;

/// Cache and batch key: which collection, which document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelationKey {
    pub collection: CollectionName,
    pub id: Uuid,
}

impl RelationKey {
    pub fn new(collection: CollectionName, id: Uuid) -> Self {
        Self { collection, id }
    }
}

/// A document resolved through [`Loaders::load`]
#[derive(Debug, Clone)]
pub enum Related {
    Account(Account),
    MediaItem(MediaItem),
    Collection(Collection),
}

/// Container for the per-request DataLoader instances
pub struct Loaders {
    accounts: CachedLoader<Account>,
    media_items: CachedLoader<MediaItem>,
    collections: CachedLoader<Collection>,
}

impl Loaders {
    /// Fresh loaders with empty caches
    pub fn new(store: &Store) -> Self {
        Self {
            accounts: cached(AccountLoader::new(store.accounts.clone())),
            media_items: cached(MediaItemLoader::new(store.media_items.clone())),
            collections: cached(CollectionLoader::new(store.collections.clone())),
        }
    }

    /// Resolve a relation key of any collection
    pub async fn load(&self, key: RelationKey) -> ApiResult<Option<Related>> {
        Ok(match key.collection {
            CollectionName::Accounts => self.account(key.id).await?.map(Related::Account),
            CollectionName::MediaItems => self.media_item(key.id).await?.map(Related::MediaItem),
            CollectionName::Collections => {
                self.collection(key.id).await?.map(Related::Collection)
            }
        })
    }

    pub async fn account(&self, id: Uuid) -> ApiResult<Option<Account>> {
        load_one(&self.accounts, id).await
    }

    pub async fn media_item(&self, id: Uuid) -> ApiResult<Option<MediaItem>> {
        load_one(&self.media_items, id).await
    }

    pub async fn collection(&self, id: Uuid) -> ApiResult<Option<Collection>> {
        load_one(&self.collections, id).await
    }

    /// Accounts in input order; duplicates repeated, missing ids as `None`
    pub async fn accounts(&self, ids: &[Uuid]) -> ApiResult<Vec<Option<Account>>> {
        load_many(&self.accounts, ids).await
    }

    pub async fn media_items(&self, ids: &[Uuid]) -> ApiResult<Vec<Option<MediaItem>>> {
        load_many(&self.media_items, ids).await
    }

    pub async fn collections(&self, ids: &[Uuid]) -> ApiResult<Vec<Option<Collection>>> {
        load_many(&self.collections, ids).await
    }
}

/// Every key queued in one turn goes into a single `find_by_ids` call
fn cached<D: Document>(loader: DocumentLoader<D>) -> CachedLoader<D> {
    DataLoader::with_cache(loader, tokio::spawn, HashMapCache::default())
        .max_batch_size(usize::MAX)
}

async fn load_one<D: Document>(loader: &CachedLoader<D>, id: Uuid) -> ApiResult<Option<D>> {
    Ok(loader.load_one(id).await?.flatten())
}

async fn load_many<D: Document>(
    loader: &CachedLoader<D>,
    ids: &[Uuid],
) -> ApiResult<Vec<Option<D>>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let found = loader.load_many(ids.iter().copied()).await?;
    Ok(ids
        .iter()
        .map(|id| found.get(id).cloned().flatten())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewAccount, NewMediaItem, Role};
    use crate::store::MemoryStore;
    use futures_util::future::join_all;

    async fn seed_accounts(store: &Store, names: &[&str]) -> Vec<Account> {
        let mut accounts = Vec::new();
        for name in names {
            let account = store
                .accounts
                .create(NewAccount {
                    name: name.to_string(),
                    email: format!("{}@example.com", name.to_lowercase()),
                    password_hash: "hash".to_string(),
                    role: Role::Creator,
                })
                .await
                .unwrap();
            accounts.push(account);
        }
        accounts
    }

    fn sorted(mut ids: Vec<Uuid>) -> Vec<Uuid> {
        ids.sort();
        ids
    }

    #[tokio::test]
    async fn test_same_turn_loads_share_one_batch() {
        let memory = MemoryStore::new();
        let store = memory.store();
        let accounts = seed_accounts(&store, &["Ada", "Grace"]).await;
        let (ada, grace) = (accounts[0].id, accounts[1].id);
        memory.stats(CollectionName::Accounts).reset();

        let loaders = Loaders::new(&store);
        let results = join_all([ada, grace, ada, ada].map(|id| loaders.account(id))).await;

        assert!(results.iter().all(|r| matches!(r, Ok(Some(_)))));
        let batches = memory.stats(CollectionName::Accounts).batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(sorted(batches[0].clone()), sorted(vec![ada, grace]));
    }

    #[tokio::test]
    async fn test_load_many_preserves_order_duplicates_and_misses() {
        let memory = MemoryStore::new();
        let store = memory.store();
        let accounts = seed_accounts(&store, &["Ada", "Grace"]).await;
        let (ada, grace) = (accounts[0].id, accounts[1].id);
        let missing = Uuid::new_v4();

        let loaders = Loaders::new(&store);
        let loaded = loaders.accounts(&[grace, missing, ada, grace]).await.unwrap();

        let ids: Vec<Option<Uuid>> = loaded.iter().map(|a| a.as_ref().map(|a| a.id)).collect();
        assert_eq!(ids, vec![Some(grace), None, Some(ada), Some(grace)]);
    }

    #[tokio::test]
    async fn test_resolved_keys_are_never_fetched_twice() {
        let memory = MemoryStore::new();
        let store = memory.store();
        let accounts = seed_accounts(&store, &["Ada"]).await;
        let ada = accounts[0].id;
        let missing = Uuid::new_v4();
        memory.stats(CollectionName::Accounts).reset();

        let loaders = Loaders::new(&store);
        loaders.accounts(&[ada, missing]).await.unwrap();
        assert!(loaders.account(ada).await.unwrap().is_some());
        assert!(loaders.account(missing).await.unwrap().is_none());
        loaders.accounts(&[missing, ada]).await.unwrap();

        assert_eq!(memory.stats(CollectionName::Accounts).batches().len(), 1);
    }

    #[tokio::test]
    async fn test_fresh_loaders_do_not_share_cache() {
        let memory = MemoryStore::new();
        let store = memory.store();
        let accounts = seed_accounts(&store, &["Ada"]).await;
        let ada = accounts[0].id;
        memory.stats(CollectionName::Accounts).reset();

        Loaders::new(&store).account(ada).await.unwrap();
        Loaders::new(&store).account(ada).await.unwrap();

        assert_eq!(memory.stats(CollectionName::Accounts).batches().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_key_list_makes_no_call() {
        let memory = MemoryStore::new();
        let loaders = Loaders::new(&memory.store());
        assert!(loaders.media_items(&[]).await.unwrap().is_empty());
        assert_eq!(memory.stats(CollectionName::MediaItems).calls(), 0);
    }

    #[tokio::test]
    async fn test_load_by_relation_key() {
        let memory = MemoryStore::new();
        let store = memory.store();
        let accounts = seed_accounts(&store, &["Ada"]).await;
        let item = store
            .media_items
            .create(NewMediaItem {
                name: "Song".to_string(),
                genre: "Pop".to_string(),
                creator_id: accounts[0].id,
            })
            .await
            .unwrap();

        let loaders = Loaders::new(&store);
        let related = loaders
            .load(RelationKey::new(CollectionName::MediaItems, item.id))
            .await
            .unwrap();
        assert!(matches!(related, Some(Related::MediaItem(m)) if m.id == item.id));

        let missing = loaders
            .load(RelationKey::new(CollectionName::Collections, Uuid::new_v4()))
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
