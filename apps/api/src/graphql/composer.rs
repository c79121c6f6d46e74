//! Query composition for list operations
//!
//! Turns a `{pagination?, filter?, sorting?}` request into exactly one
//! gateway call. Strategies are mutually exclusive and picked in order:
//!
//! 1. pagination, when both `limit` and `page` are present (`page` may be 0)
//! 2. filter, the first recognized field of the filter input
//! 3. sorting, the first recognized field of the sort input
//! 4. unbounded scan of the whole collection
//!
//! Filters and sorts on the creator's name need the creator relation and
//! compile to an aggregation pipeline; all other fields compile to `find`.

use async_graphql::{Enum, InputObject};

use crate::error::{ApiError, ApiResult};
use crate::store::{Document, Field, FindQuery, Filter, Gateway, Pipeline, SortDirection};

/// Ascending/descending toggle for a sortable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl From<SortOrder> for SortDirection {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => SortDirection::Ascending,
            SortOrder::Desc => SortDirection::Descending,
        }
    }
}

/// Page window; applied only when both fields are present
#[derive(Debug, Clone, Copy, Default, InputObject)]
pub struct PaginationInput {
    /// Page size, at least 1
    pub limit: Option<i32>,
    /// Zero-based page number
    pub page: Option<i32>,
}

/// One backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPlan {
    Find(FindQuery),
    Aggregate(Pipeline),
}

impl QueryPlan {
    pub async fn execute<D: Document>(&self, gateway: &dyn Gateway<D>) -> ApiResult<Vec<D>> {
        Ok(match self {
            Self::Find(query) => gateway.find(query).await?,
            Self::Aggregate(pipeline) => gateway.aggregate(pipeline).await?,
        })
    }
}

/// A filter or sort variant that maps onto a single backend call
pub trait IntoPlan {
    fn into_plan(self) -> QueryPlan;
}

fn contains(field: Field, term: String) -> QueryPlan {
    QueryPlan::Find(FindQuery::filtered(Filter::Contains(field, term)))
}

fn sorted(field: Field, order: SortOrder) -> QueryPlan {
    QueryPlan::Find(FindQuery::sorted(field, order.into()))
}

fn creator_name_match(term: String) -> QueryPlan {
    QueryPlan::Aggregate(Pipeline::new().lookup_creator().match_creator_name(term))
}

fn creator_name_sort(order: SortOrder) -> QueryPlan {
    QueryPlan::Aggregate(Pipeline::new().lookup_creator().sort_by_creator_name(order.into()))
}

// ========== Accounts ==========

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountFilter {
    ByName(String),
    ByEmail(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountSort {
    ByName(SortOrder),
    ByEmail(SortOrder),
}

/// Case-insensitive substring filter; only the first set field applies
#[derive(Debug, Clone, Default, InputObject)]
pub struct AccountFilterInput {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct AccountSortInput {
    pub name: Option<SortOrder>,
    pub email: Option<SortOrder>,
}

impl AccountFilterInput {
    pub fn recognize(self) -> Option<AccountFilter> {
        match self {
            Self { name: Some(name), .. } => Some(AccountFilter::ByName(name)),
            Self { email: Some(email), .. } => Some(AccountFilter::ByEmail(email)),
            _ => None,
        }
    }
}

impl AccountSortInput {
    pub fn recognize(self) -> Option<AccountSort> {
        match self {
            Self { name: Some(order), .. } => Some(AccountSort::ByName(order)),
            Self { email: Some(order), .. } => Some(AccountSort::ByEmail(order)),
            _ => None,
        }
    }
}

impl IntoPlan for AccountFilter {
    fn into_plan(self) -> QueryPlan {
        match self {
            Self::ByName(term) => contains(Field::Name, term),
            Self::ByEmail(term) => contains(Field::Email, term),
        }
    }
}

impl IntoPlan for AccountSort {
    fn into_plan(self) -> QueryPlan {
        match self {
            Self::ByName(order) => sorted(Field::Name, order),
            Self::ByEmail(order) => sorted(Field::Email, order),
        }
    }
}

// ========== Media items ==========

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaItemFilter {
    ByName(String),
    ByGenre(String),
    ByCreatorName(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaItemSort {
    ByName(SortOrder),
    ByGenre(SortOrder),
    ByCreatorName(SortOrder),
}

/// Case-insensitive substring filter; only the first set field applies
#[derive(Debug, Clone, Default, InputObject)]
pub struct MediaItemFilterInput {
    pub name: Option<String>,
    pub genre: Option<String>,
    pub creator_name: Option<String>,
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct MediaItemSortInput {
    pub name: Option<SortOrder>,
    pub genre: Option<SortOrder>,
    pub creator_name: Option<SortOrder>,
}

impl MediaItemFilterInput {
    pub fn recognize(self) -> Option<MediaItemFilter> {
        match self {
            Self { name: Some(name), .. } => Some(MediaItemFilter::ByName(name)),
            Self { genre: Some(genre), .. } => Some(MediaItemFilter::ByGenre(genre)),
            Self {
                creator_name: Some(creator),
                ..
            } => Some(MediaItemFilter::ByCreatorName(creator)),
            _ => None,
        }
    }
}

impl MediaItemSortInput {
    pub fn recognize(self) -> Option<MediaItemSort> {
        match self {
            Self { name: Some(order), .. } => Some(MediaItemSort::ByName(order)),
            Self { genre: Some(order), .. } => Some(MediaItemSort::ByGenre(order)),
            Self {
                creator_name: Some(order),
                ..
            } => Some(MediaItemSort::ByCreatorName(order)),
            _ => None,
        }
    }
}

impl IntoPlan for MediaItemFilter {
    fn into_plan(self) -> QueryPlan {
        match self {
            Self::ByName(term) => contains(Field::Name, term),
            Self::ByGenre(term) => contains(Field::Genre, term),
            Self::ByCreatorName(term) => creator_name_match(term),
        }
    }
}

impl IntoPlan for MediaItemSort {
    fn into_plan(self) -> QueryPlan {
        match self {
            Self::ByName(order) => sorted(Field::Name, order),
            Self::ByGenre(order) => sorted(Field::Genre, order),
            Self::ByCreatorName(order) => creator_name_sort(order),
        }
    }
}

// ========== Collections ==========

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionFilter {
    ByName(String),
    ByCreatorName(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionSort {
    ByName(SortOrder),
    ByCreatorName(SortOrder),
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct CollectionFilterInput {
    pub name: Option<String>,
    pub creator_name: Option<String>,
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct CollectionSortInput {
    pub name: Option<SortOrder>,
    pub creator_name: Option<SortOrder>,
}

impl CollectionFilterInput {
    pub fn recognize(self) -> Option<CollectionFilter> {
        match self {
            Self { name: Some(name), .. } => Some(CollectionFilter::ByName(name)),
            Self {
                creator_name: Some(creator),
                ..
            } => Some(CollectionFilter::ByCreatorName(creator)),
            _ => None,
        }
    }
}

impl CollectionSortInput {
    pub fn recognize(self) -> Option<CollectionSort> {
        match self {
            Self { name: Some(order), .. } => Some(CollectionSort::ByName(order)),
            Self {
                creator_name: Some(order),
                ..
            } => Some(CollectionSort::ByCreatorName(order)),
            _ => None,
        }
    }
}

impl IntoPlan for CollectionFilter {
    fn into_plan(self) -> QueryPlan {
        match self {
            Self::ByName(term) => contains(Field::Name, term),
            Self::ByCreatorName(term) => creator_name_match(term),
        }
    }
}

impl IntoPlan for CollectionSort {
    fn into_plan(self) -> QueryPlan {
        match self {
            Self::ByName(order) => sorted(Field::Name, order),
            Self::ByCreatorName(order) => creator_name_sort(order),
        }
    }
}

// ========== Composition ==========

/// A list request after its inputs were reduced to recognized variants
#[derive(Debug, Clone)]
pub struct ListRequest<F, S> {
    pub pagination: Option<PaginationInput>,
    pub filter: Option<F>,
    pub sorting: Option<S>,
}

impl<F, S> Default for ListRequest<F, S> {
    fn default() -> Self {
        Self {
            pagination: None,
            filter: None,
            sorting: None,
        }
    }
}

impl<F: IntoPlan, S: IntoPlan> ListRequest<F, S> {
    /// Pick the single strategy this request runs with
    pub fn compose(self) -> ApiResult<QueryPlan> {
        if let Some(window) = self.pagination.map(page_window).transpose()?.flatten() {
            return Ok(QueryPlan::Find(window));
        }
        if let Some(filter) = self.filter {
            return Ok(filter.into_plan());
        }
        if let Some(sorting) = self.sorting {
            return Ok(sorting.into_plan());
        }
        Ok(QueryPlan::Find(FindQuery::all()))
    }
}

/// Skip/limit window when both `limit` and `page` are given
///
/// Incomplete pagination is ignored without validation.
fn page_window(pagination: PaginationInput) -> ApiResult<Option<FindQuery>> {
    let (Some(limit), Some(page)) = (pagination.limit, pagination.page) else {
        return Ok(None);
    };
    if limit < 1 {
        return Err(ApiError::ValidationError(
            "pagination limit must be at least 1".to_string(),
        ));
    }
    if page < 0 {
        return Err(ApiError::ValidationError(
            "pagination page must not be negative".to_string(),
        ));
    }

    let skip = limit as u64 * page as u64;
    Ok(Some(FindQuery::window(skip, limit as u64)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    type MediaItemRequest = ListRequest<MediaItemFilter, MediaItemSort>;

    fn pagination(limit: Option<i32>, page: Option<i32>) -> Option<PaginationInput> {
        Some(PaginationInput { limit, page })
    }

    #[test]
    fn test_first_recognized_filter_field_wins() {
        let input = MediaItemFilterInput {
            name: Some("x".to_string()),
            genre: Some("y".to_string()),
            creator_name: Some("z".to_string()),
        };
        assert_eq!(
            input.recognize(),
            Some(MediaItemFilter::ByName("x".to_string()))
        );

        let input = MediaItemFilterInput {
            genre: Some("y".to_string()),
            creator_name: Some("z".to_string()),
            ..Default::default()
        };
        assert_eq!(
            input.recognize(),
            Some(MediaItemFilter::ByGenre("y".to_string()))
        );

        assert_eq!(MediaItemFilterInput::default().recognize(), None);
    }

    #[test]
    fn test_first_recognized_sort_field_wins() {
        let input = CollectionSortInput {
            name: Some(SortOrder::Desc),
            creator_name: Some(SortOrder::Asc),
        };
        assert_eq!(input.recognize(), Some(CollectionSort::ByName(SortOrder::Desc)));

        let input = AccountSortInput {
            email: Some(SortOrder::Asc),
            ..Default::default()
        };
        assert_eq!(input.recognize(), Some(AccountSort::ByEmail(SortOrder::Asc)));
    }

    #[rstest]
    #[case::page_zero(pagination(Some(10), Some(0)), FindQuery::window(0, 10))]
    #[case::third_page(pagination(Some(5), Some(2)), FindQuery::window(10, 5))]
    fn test_pagination_takes_precedence(
        #[case] pagination: Option<PaginationInput>,
        #[case] expected: FindQuery,
    ) {
        let request = MediaItemRequest {
            pagination,
            filter: Some(MediaItemFilter::ByName("x".to_string())),
            sorting: Some(MediaItemSort::ByGenre(SortOrder::Asc)),
        };
        assert_eq!(request.compose().unwrap(), QueryPlan::Find(expected));
    }

    #[rstest]
    #[case::limit_only(pagination(Some(10), None))]
    #[case::page_only(pagination(None, Some(1)))]
    #[case::invalid_limit_only(pagination(Some(0), None))]
    #[case::negative_page_only(pagination(None, Some(-2)))]
    #[case::absent(None)]
    fn test_incomplete_pagination_falls_through_to_filter(
        #[case] pagination: Option<PaginationInput>,
    ) {
        let request = MediaItemRequest {
            pagination,
            filter: Some(MediaItemFilter::ByGenre("rock".to_string())),
            sorting: Some(MediaItemSort::ByName(SortOrder::Desc)),
        };
        assert_eq!(
            request.compose().unwrap(),
            QueryPlan::Find(FindQuery::filtered(Filter::Contains(
                Field::Genre,
                "rock".to_string()
            )))
        );
    }

    #[rstest]
    #[case::zero_limit(pagination(Some(0), Some(1)))]
    #[case::negative_limit(pagination(Some(-3), Some(1)))]
    #[case::negative_page(pagination(Some(10), Some(-1)))]
    fn test_invalid_pagination_is_rejected(#[case] pagination: Option<PaginationInput>) {
        let request = MediaItemRequest {
            pagination,
            ..Default::default()
        };
        assert!(matches!(
            request.compose(),
            Err(ApiError::ValidationError(_))
        ));
    }

    #[test]
    fn test_sort_applies_without_filter() {
        let request = MediaItemRequest {
            sorting: Some(MediaItemSort::ByGenre(SortOrder::Desc)),
            ..Default::default()
        };
        assert_eq!(
            request.compose().unwrap(),
            QueryPlan::Find(FindQuery::sorted(Field::Genre, SortDirection::Descending))
        );
    }

    #[test]
    fn test_creator_name_compiles_to_pipeline() {
        let request = ListRequest::<CollectionFilter, CollectionSort> {
            filter: Some(CollectionFilter::ByCreatorName("ada".to_string())),
            ..Default::default()
        };
        assert_eq!(
            request.compose().unwrap(),
            QueryPlan::Aggregate(Pipeline::new().lookup_creator().match_creator_name("ada"))
        );

        let request = MediaItemRequest {
            sorting: Some(MediaItemSort::ByCreatorName(SortOrder::Asc)),
            ..Default::default()
        };
        assert_eq!(
            request.compose().unwrap(),
            QueryPlan::Aggregate(
                Pipeline::new()
                    .lookup_creator()
                    .sort_by_creator_name(SortDirection::Ascending)
            )
        );
    }

    #[test]
    fn test_empty_request_scans_everything() {
        let request = ListRequest::<AccountFilter, AccountSort>::default();
        assert_eq!(request.compose().unwrap(), QueryPlan::Find(FindQuery::all()));
    }
}
