//! Query vocabulary understood by every store backend
//!
//! Filters, sorts and aggregation pipelines are plain data so the same
//! request can be interpreted in memory or translated to SQL.

use uuid::Uuid;

/// Text attribute a filter or sort can address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Genre,
}

impl Field {
    /// Column holding this attribute
    pub fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Genre => "genre",
        }
    }
}

/// Document predicate
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    /// Matches every document
    #[default]
    All,
    /// Document id is one of the given ids
    IdIn(Vec<Uuid>),
    /// Exact equality on a text field
    Equals(Field, String),
    /// Case-insensitive substring match on a text field
    Contains(Field, String),
    /// Document was created by the given account
    CreatorIs(Uuid),
    /// Document lists the given account as a collaborator
    HasCollaborator(Uuid),
    /// At least one of the nested filters matches (empty never matches)
    AnyOf(Vec<Filter>),
}

impl Filter {
    pub fn id(id: Uuid) -> Self {
        Self::IdIn(vec![id])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sort {
    pub field: Field,
    pub direction: SortDirection,
}

/// A `find` request: filter, optional ordering and window
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FindQuery {
    pub filter: Filter,
    pub sort: Option<Sort>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

impl FindQuery {
    /// Unbounded scan of the whole collection
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filtered(filter: Filter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn sorted(field: Field, direction: SortDirection) -> Self {
        Self {
            sort: Some(Sort { field, direction }),
            ..Self::default()
        }
    }

    /// Skip/limit window in backend-default order
    pub fn window(skip: u64, limit: u64) -> Self {
        Self {
            skip: Some(skip),
            limit: Some(limit),
            ..Self::default()
        }
    }
}

/// One step of an aggregation pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// Left-join each document with the account named by its creator id
    LookupCreator,
    /// Keep documents whose joined creator name contains the term (case-insensitive)
    MatchCreatorName(String),
    /// Order documents by the joined creator name
    SortByCreatorName(SortDirection),
}

/// Ordered list of stages evaluated by `Gateway::aggregate`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup_creator(mut self) -> Self {
        self.stages.push(Stage::LookupCreator);
        self
    }

    pub fn match_creator_name(mut self, term: impl Into<String>) -> Self {
        self.stages.push(Stage::MatchCreatorName(term.into()));
        self
    }

    pub fn sort_by_creator_name(mut self, direction: SortDirection) -> Self {
        self.stages.push(Stage::SortByCreatorName(direction));
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Whether any stage consumes the creator join
    pub fn joins_creator(&self) -> bool {
        self.stages.iter().any(|s| matches!(s, Stage::LookupCreator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_builder_keeps_stage_order() {
        let pipeline = Pipeline::new()
            .lookup_creator()
            .match_creator_name("ada")
            .sort_by_creator_name(SortDirection::Descending);

        assert_eq!(
            pipeline.stages(),
            &[
                Stage::LookupCreator,
                Stage::MatchCreatorName("ada".to_string()),
                Stage::SortByCreatorName(SortDirection::Descending),
            ]
        );
        assert!(pipeline.joins_creator());
        assert!(!Pipeline::new().joins_creator());
    }

    #[test]
    fn test_find_query_constructors() {
        assert_eq!(FindQuery::all().filter, Filter::All);

        let window = FindQuery::window(20, 10);
        assert_eq!((window.skip, window.limit), (Some(20), Some(10)));
        assert!(window.sort.is_none());

        let sorted = FindQuery::sorted(Field::Genre, SortDirection::Descending);
        assert_eq!(
            sorted.sort,
            Some(Sort {
                field: Field::Genre,
                direction: SortDirection::Descending
            })
        );
    }
}
