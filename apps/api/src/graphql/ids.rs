//! Conversion between GraphQL `ID`s and document ids

use async_graphql::ID;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

pub fn to_id(id: Uuid) -> ID {
    ID(id.to_string())
}

pub fn to_ids(ids: &[Uuid]) -> Vec<ID> {
    ids.iter().copied().map(to_id).collect()
}

/// Parse a client-supplied id; malformed ids are a validation error
pub fn parse_id(id: &ID) -> ApiResult<Uuid> {
    Uuid::parse_str(id.as_str())
        .map_err(|_| ApiError::ValidationError(format!("malformed id '{}'", id.as_str())))
}

pub fn parse_ids(ids: &[ID]) -> ApiResult<Vec<Uuid>> {
    ids.iter().map(parse_id).collect()
}
