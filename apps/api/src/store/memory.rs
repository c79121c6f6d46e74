//! In-memory store backend
//!
//! Collections are kept in insertion order behind a single async `RwLock`.
//! Writes hold the lock for the whole read-check-modify cycle, which makes
//! `update_where` atomic. Every gateway call is counted in [`GatewayStats`]
//! so tests can observe how many round-trips a request performed.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::document::{contains_ignore_case, Document};
use super::query::{FindQuery, Filter, Pipeline, SortDirection, Stage};
use super::{CollectionName, Gateway, Store, StoreError, StoreResult};
use crate::models::{Account, Collection, MediaItem};

#[derive(Debug, Default)]
struct MemoryState {
    accounts: Vec<Account>,
    media_items: Vec<MediaItem>,
    collections: Vec<Collection>,
}

/// Maps a document type to its vector in [`MemoryState`]
trait MemoryDocument: Document {
    fn docs(state: &MemoryState) -> &Vec<Self>;
    fn docs_mut(state: &mut MemoryState) -> &mut Vec<Self>;
}

impl MemoryDocument for Account {
    fn docs(state: &MemoryState) -> &Vec<Self> {
        &state.accounts
    }

    fn docs_mut(state: &mut MemoryState) -> &mut Vec<Self> {
        &mut state.accounts
    }
}

impl MemoryDocument for MediaItem {
    fn docs(state: &MemoryState) -> &Vec<Self> {
        &state.media_items
    }

    fn docs_mut(state: &mut MemoryState) -> &mut Vec<Self> {
        &mut state.media_items
    }
}

impl MemoryDocument for Collection {
    fn docs(state: &MemoryState) -> &Vec<Self> {
        &state.collections
    }

    fn docs_mut(state: &mut MemoryState) -> &mut Vec<Self> {
        &mut state.collections
    }
}

/// Call counters for one collection gateway
#[derive(Debug, Default)]
pub struct GatewayStats {
    calls: AtomicUsize,
    batches: Mutex<Vec<Vec<Uuid>>>,
}

impl GatewayStats {
    /// Total gateway calls made against the collection
    pub fn calls(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    /// Key lists passed to `find_by_ids`, one entry per batch
    pub fn batches(&self) -> Vec<Vec<Uuid>> {
        self.batches
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn reset(&self) {
        self.calls.store(0, AtomicOrdering::SeqCst);
        self.batches
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
    }

    fn record_batch(&self, ids: &[Uuid]) {
        self.batches
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(ids.to_vec());
    }
}

#[derive(Debug, Default)]
struct StoreStats {
    accounts: GatewayStats,
    media_items: GatewayStats,
    collections: GatewayStats,
}

/// Process-local document store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
    stats: Arc<StoreStats>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateways backed by this store
    pub fn store(&self) -> Store {
        Store {
            accounts: Arc::new(self.clone()),
            media_items: Arc::new(self.clone()),
            collections: Arc::new(self.clone()),
        }
    }

    /// Call counters for one collection
    pub fn stats(&self, collection: CollectionName) -> &GatewayStats {
        match collection {
            CollectionName::Accounts => &self.stats.accounts,
            CollectionName::MediaItems => &self.stats.media_items,
            CollectionName::Collections => &self.stats.collections,
        }
    }

    fn stats_for<D: Document>(&self) -> &GatewayStats {
        self.stats(D::COLLECTION)
    }
}

/// Reject a write that would duplicate another document's unique key
fn ensure_unique<D: Document>(docs: &[D], candidate: &D) -> StoreResult<()> {
    let Some(key) = candidate.unique_key() else {
        return Ok(());
    };

    let taken = docs
        .iter()
        .any(|doc| doc.id() != candidate.id() && doc.unique_key() == Some(key));

    if taken {
        return Err(StoreError::Duplicate {
            collection: D::COLLECTION,
            key: key.to_string(),
        });
    }
    Ok(())
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

fn run_find<D: Document>(docs: &[D], query: &FindQuery) -> Vec<D> {
    let mut matched: Vec<D> = docs
        .iter()
        .filter(|doc| doc.matches(&query.filter))
        .cloned()
        .collect();

    if let Some(sort) = query.sort {
        matched.sort_by(|a, b| {
            directed(a.text(sort.field).cmp(&b.text(sort.field)), sort.direction)
        });
    }

    let skip = query.skip.unwrap_or(0) as usize;
    let limit = query.limit.map(|l| l as usize).unwrap_or(usize::MAX);
    matched.into_iter().skip(skip).take(limit).collect()
}

fn run_pipeline<D: Document>(docs: &[D], accounts: &[Account], pipeline: &Pipeline) -> Vec<D> {
    let mut rows: Vec<(D, Option<String>)> = docs.iter().map(|doc| (doc.clone(), None)).collect();

    for stage in pipeline.stages() {
        match stage {
            Stage::LookupCreator => {
                for (doc, creator_name) in rows.iter_mut() {
                    *creator_name = doc
                        .creator_id()
                        .and_then(|id| accounts.iter().find(|a| a.id == id))
                        .map(|a| a.name.clone());
                }
            }
            Stage::MatchCreatorName(term) => rows.retain(|(_, creator_name)| {
                creator_name
                    .as_deref()
                    .map(|name| contains_ignore_case(name, term))
                    .unwrap_or(false)
            }),
            // Missing creators compare lowest
            Stage::SortByCreatorName(direction) => {
                rows.sort_by(|a, b| directed(a.1.cmp(&b.1), *direction))
            }
        }
    }

    rows.into_iter().map(|(doc, _)| doc).collect()
}

#[async_trait]
impl<D: MemoryDocument> Gateway<D> for MemoryStore {
    async fn find_one(&self, filter: &Filter) -> StoreResult<Option<D>> {
        self.stats_for::<D>().record_call();
        let state = self.state.read().await;
        Ok(D::docs(&state).iter().find(|doc| doc.matches(filter)).cloned())
    }

    async fn find(&self, query: &FindQuery) -> StoreResult<Vec<D>> {
        self.stats_for::<D>().record_call();
        let state = self.state.read().await;
        Ok(run_find(D::docs(&state), query))
    }

    async fn aggregate(&self, pipeline: &Pipeline) -> StoreResult<Vec<D>> {
        self.stats_for::<D>().record_call();
        let state = self.state.read().await;
        Ok(run_pipeline(D::docs(&state), &state.accounts, pipeline))
    }

    async fn create(&self, new: D::New) -> StoreResult<D> {
        self.stats_for::<D>().record_call();
        let doc = D::create(Uuid::new_v4(), new, Utc::now());

        let mut state = self.state.write().await;
        let docs = D::docs_mut(&mut state);
        ensure_unique(docs, &doc)?;
        docs.push(doc.clone());
        Ok(doc)
    }

    async fn update_where(
        &self,
        id: Uuid,
        condition: &Filter,
        patch: D::Patch,
    ) -> StoreResult<Option<D>> {
        self.stats_for::<D>().record_call();
        let mut state = self.state.write().await;
        let docs = D::docs_mut(&mut state);

        let Some(index) = docs
            .iter()
            .position(|doc| doc.id() == id && doc.matches(condition))
        else {
            return Ok(None);
        };

        let mut updated = docs[index].clone();
        updated.apply(&patch, Utc::now());
        ensure_unique(docs, &updated)?;
        docs[index] = updated.clone();
        Ok(Some(updated))
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<Option<D>> {
        self.stats_for::<D>().record_call();
        let mut state = self.state.write().await;
        let docs = D::docs_mut(&mut state);
        Ok(docs
            .iter()
            .position(|doc| doc.id() == id)
            .map(|index| docs.remove(index)))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<D>> {
        let stats = self.stats_for::<D>();
        stats.record_call();
        stats.record_batch(ids);

        let state = self.state.read().await;
        Ok(D::docs(&state)
            .iter()
            .filter(|doc| ids.contains(&doc.id()))
            .cloned()
            .collect())
    }
}
