//! PostgreSQL store backend
//!
//! Each collection is a table aliased `doc` in every statement. Filters and
//! pipelines are compiled into a [`QueryBuilder`] with bound parameters;
//! conditional updates are a single `UPDATE ... WHERE ... RETURNING`.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::document::Document;
use super::query::{FindQuery, Filter, Pipeline, SortDirection, Stage};
use super::sql::{contains_pattern, ACCOUNT_COLUMNS, COLLECTION_COLUMNS, MEDIA_ITEM_COLUMNS};
use super::{Gateway, Store, StoreError, StoreResult};
use crate::models::{
    Account, AccountPatch, Collection, CollectionPatch, MediaItem, MediaItemPatch, NewAccount,
    NewCollection, NewMediaItem,
};

/// How a document type maps onto its table
trait PgDocument: Document + for<'r> FromRow<'r, PgRow> {
    const TABLE: &'static str;
    const COLUMNS: &'static str;

    /// Push `(columns) VALUES (binds)` for an insert
    fn push_values(builder: &mut QueryBuilder<'_, Postgres>, id: Uuid, new: Self::New);

    /// Push the `SET` assignment list for a patch
    fn push_assignments(builder: &mut QueryBuilder<'_, Postgres>, patch: Self::Patch);
}

impl PgDocument for Account {
    const TABLE: &'static str = "accounts";
    const COLUMNS: &'static str = ACCOUNT_COLUMNS;

    fn push_values(builder: &mut QueryBuilder<'_, Postgres>, id: Uuid, new: NewAccount) {
        builder.push("(id, name, email, password_hash, role) VALUES (");
        let mut values = builder.separated(", ");
        values.push_bind(id);
        values.push_bind(new.name);
        values.push_bind(new.email);
        values.push_bind(new.password_hash);
        values.push_bind(new.role);
        values.push_unseparated(")");
    }

    fn push_assignments(builder: &mut QueryBuilder<'_, Postgres>, patch: AccountPatch) {
        let mut set = builder.separated(", ");
        if let Some(name) = patch.name {
            set.push("name = ").push_bind_unseparated(name);
        }
        if let Some(email) = patch.email {
            set.push("email = ").push_bind_unseparated(email);
        }
        if let Some(hash) = patch.password_hash {
            set.push("password_hash = ").push_bind_unseparated(hash);
        }
        set.push("updated_at = NOW()");
    }
}

impl PgDocument for MediaItem {
    const TABLE: &'static str = "media_items";
    const COLUMNS: &'static str = MEDIA_ITEM_COLUMNS;

    fn push_values(builder: &mut QueryBuilder<'_, Postgres>, id: Uuid, new: NewMediaItem) {
        builder.push("(id, name, genre, creator_id) VALUES (");
        let mut values = builder.separated(", ");
        values.push_bind(id);
        values.push_bind(new.name);
        values.push_bind(new.genre);
        values.push_bind(new.creator_id);
        values.push_unseparated(")");
    }

    fn push_assignments(builder: &mut QueryBuilder<'_, Postgres>, patch: MediaItemPatch) {
        let mut set = builder.separated(", ");
        if let Some(name) = patch.name {
            set.push("name = ").push_bind_unseparated(name);
        }
        if let Some(genre) = patch.genre {
            set.push("genre = ").push_bind_unseparated(genre);
        }
        set.push("updated_at = NOW()");
    }
}

impl PgDocument for Collection {
    const TABLE: &'static str = "collections";
    const COLUMNS: &'static str = COLLECTION_COLUMNS;

    fn push_values(builder: &mut QueryBuilder<'_, Postgres>, id: Uuid, new: NewCollection) {
        builder.push("(id, name, creator_id, media_item_ids, collaborator_ids) VALUES (");
        let mut values = builder.separated(", ");
        values.push_bind(id);
        values.push_bind(new.name);
        values.push_bind(new.creator_id);
        values.push_bind(new.media_item_ids);
        values.push_bind(new.collaborator_ids);
        values.push_unseparated(")");
    }

    fn push_assignments(builder: &mut QueryBuilder<'_, Postgres>, patch: CollectionPatch) {
        match patch {
            CollectionPatch::AddMediaItems(ids) => {
                builder
                    .push("media_item_ids = doc.media_item_ids || ")
                    .push_bind(ids)
                    .push("::uuid[]");
            }
            CollectionPatch::RemoveMediaItems(ids) => {
                builder
                    .push(
                        "media_item_ids = ARRAY(SELECT m FROM unnest(doc.media_item_ids) \
                         WITH ORDINALITY AS t(m, ord) WHERE m <> ALL(",
                    )
                    .push_bind(ids)
                    .push(") ORDER BY ord)");
            }
            // Appends ids in first-seen order, skipping ones already present
            CollectionPatch::AddCollaborators(ids) => {
                builder
                    .push(
                        "collaborator_ids = doc.collaborator_ids || ARRAY(SELECT c FROM unnest(",
                    )
                    .push_bind(ids)
                    .push(
                        "::uuid[]) WITH ORDINALITY AS t(c, ord) \
                         WHERE c <> ALL(doc.collaborator_ids) GROUP BY c ORDER BY MIN(ord))",
                    );
            }
            CollectionPatch::RemoveCollaborators(ids) => {
                builder
                    .push(
                        "collaborator_ids = ARRAY(SELECT c FROM unnest(doc.collaborator_ids) \
                         WITH ORDINALITY AS t(c, ord) WHERE c <> ALL(",
                    )
                    .push_bind(ids)
                    .push(") ORDER BY ord)");
            }
        }
        builder.push(", updated_at = NOW()");
    }
}

/// Compile a filter into a boolean SQL expression over `doc`
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    match filter {
        Filter::All => {
            builder.push("TRUE");
        }
        Filter::IdIn(ids) => {
            builder.push("doc.id = ANY(").push_bind(ids.clone()).push(")");
        }
        Filter::Equals(field, value) => {
            builder
                .push(format!("doc.{} = ", field.column()))
                .push_bind(value.clone());
        }
        Filter::Contains(field, term) => {
            builder
                .push(format!("doc.{} ILIKE ", field.column()))
                .push_bind(contains_pattern(term));
        }
        Filter::CreatorIs(id) => {
            builder.push("doc.creator_id = ").push_bind(*id);
        }
        Filter::HasCollaborator(id) => {
            builder
                .push_bind(*id)
                .push(" = ANY(doc.collaborator_ids)");
        }
        Filter::AnyOf(filters) if filters.is_empty() => {
            builder.push("FALSE");
        }
        Filter::AnyOf(filters) => {
            builder.push("(");
            for (i, nested) in filters.iter().enumerate() {
                if i > 0 {
                    builder.push(" OR ");
                }
                push_filter(builder, nested);
            }
            builder.push(")");
        }
    }
}

fn direction_sql(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Ascending => "ASC",
        SortDirection::Descending => "DESC",
    }
}

fn select_from<D: PgDocument>() -> QueryBuilder<'static, Postgres> {
    QueryBuilder::new(format!("SELECT {} FROM {} doc", D::COLUMNS, D::TABLE))
}

fn map_write_error(err: sqlx::Error, collection: super::CollectionName) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::Duplicate {
                collection,
                key: db_err.constraint().unwrap_or("unique key").to_string(),
            };
        }
    }
    StoreError::Database(err)
}

/// `UPDATE ... SET <patch> WHERE id AND <condition> RETURNING` as one statement
fn conditional_update<D: PgDocument>(
    id: Uuid,
    condition: &Filter,
    patch: D::Patch,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("UPDATE {} AS doc SET ", D::TABLE));
    D::push_assignments(&mut builder, patch);
    builder.push(" WHERE doc.id = ").push_bind(id).push(" AND ");
    push_filter(&mut builder, condition);
    builder.push(format!(" RETURNING {}", D::COLUMNS));
    builder
}

/// Store backed by PostgreSQL tables
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gateways backed by this pool
    pub fn store(&self) -> Store {
        Store {
            accounts: std::sync::Arc::new(self.clone()),
            media_items: std::sync::Arc::new(self.clone()),
            collections: std::sync::Arc::new(self.clone()),
        }
    }
}

#[async_trait]
impl<D: PgDocument> Gateway<D> for PgStore {
    async fn find_one(&self, filter: &Filter) -> StoreResult<Option<D>> {
        let mut builder = select_from::<D>();
        builder.push(" WHERE ");
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY doc.created_at ASC, doc.id ASC LIMIT 1");

        Ok(builder
            .build_query_as::<D>()
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find(&self, query: &FindQuery) -> StoreResult<Vec<D>> {
        let mut builder = select_from::<D>();
        builder.push(" WHERE ");
        push_filter(&mut builder, &query.filter);

        match query.sort {
            Some(sort) => builder.push(format!(
                " ORDER BY doc.{} {}, doc.id ASC",
                sort.field.column(),
                direction_sql(sort.direction)
            )),
            None => builder.push(" ORDER BY doc.created_at ASC, doc.id ASC"),
        };
        if let Some(limit) = query.limit {
            builder.push(" LIMIT ").push_bind(limit as i64);
        }
        if let Some(skip) = query.skip {
            builder.push(" OFFSET ").push_bind(skip as i64);
        }

        Ok(builder.build_query_as::<D>().fetch_all(&self.pool).await?)
    }

    async fn aggregate(&self, pipeline: &Pipeline) -> StoreResult<Vec<D>> {
        let joined = pipeline.joins_creator();
        let mut builder = select_from::<D>();
        if joined {
            builder.push(" LEFT JOIN accounts creator ON creator.id = doc.creator_id");
        }
        builder.push(" WHERE TRUE");

        let mut order = None;
        for stage in pipeline.stages() {
            match stage {
                Stage::LookupCreator => {}
                Stage::MatchCreatorName(term) if joined => {
                    builder
                        .push(" AND creator.name ILIKE ")
                        .push_bind(contains_pattern(term));
                }
                // Without the join there is no creator name to match
                Stage::MatchCreatorName(_) => {
                    builder.push(" AND FALSE");
                }
                Stage::SortByCreatorName(direction) if joined => order = Some(*direction),
                Stage::SortByCreatorName(_) => {}
            }
        }

        match order {
            Some(SortDirection::Ascending) => {
                builder.push(" ORDER BY creator.name ASC NULLS FIRST, doc.created_at ASC")
            }
            Some(SortDirection::Descending) => {
                builder.push(" ORDER BY creator.name DESC NULLS LAST, doc.created_at ASC")
            }
            None => builder.push(" ORDER BY doc.created_at ASC, doc.id ASC"),
        };

        Ok(builder.build_query_as::<D>().fetch_all(&self.pool).await?)
    }

    async fn create(&self, new: D::New) -> StoreResult<D> {
        let mut builder = QueryBuilder::new(format!("INSERT INTO {} AS doc ", D::TABLE));
        D::push_values(&mut builder, Uuid::new_v4(), new);
        builder.push(format!(" RETURNING {}", D::COLUMNS));

        builder
            .build_query_as::<D>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, D::COLLECTION))
    }

    async fn update_where(
        &self,
        id: Uuid,
        condition: &Filter,
        patch: D::Patch,
    ) -> StoreResult<Option<D>> {
        let mut builder = conditional_update::<D>(id, condition, patch);
        builder
            .build_query_as::<D>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, D::COLLECTION))
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<Option<D>> {
        let mut builder = QueryBuilder::new(format!("DELETE FROM {} AS doc WHERE doc.id = ", D::TABLE));
        builder
            .push_bind(id)
            .push(format!(" RETURNING {}", D::COLUMNS));

        Ok(builder
            .build_query_as::<D>()
            .fetch_optional(&self.pool)
            .await?)
    }
}
