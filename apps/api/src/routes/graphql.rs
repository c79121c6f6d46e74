//! GraphQL HTTP route handlers
//!
//! - `POST /graphql` - execute a GraphQL request
//! - `GET /graphql/playground` - GraphQL Playground IDE
//!
//! Each request gets a fresh [`RequestScope`] carrying its bearer token; the
//! token is verified lazily by the guard of the first gated field.

use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::Extension,
    http::{header, HeaderMap},
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};

use crate::graphql::{MixtapeSchema, RequestScope};
use crate::store::Store;

/// Create the GraphQL router
pub fn graphql_router(schema: MixtapeSchema, store: Store) -> Router {
    Router::new()
        .route("/graphql", post(graphql_handler))
        .route("/graphql/playground", get(graphql_playground))
        .layer(Extension(schema))
        .layer(Extension(store))
}

/// Extract the bearer token from the Authorization header
///
/// The scheme is matched case-insensitively and quotes around the token
/// are stripped. Anything else yields no token.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())?;

    let mut parts = value.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;

    // Reject malformed values like "Bearer <token> <extra>"
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim_matches(|c| c == '"' || c == '\'');
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

async fn graphql_handler(
    Extension(schema): Extension<MixtapeSchema>,
    Extension(store): Extension<Store>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let token = extract_bearer_token(&headers);
    if token.is_none() && headers.contains_key(header::AUTHORIZATION) {
        tracing::debug!("Ignoring malformed Authorization header");
    }

    let request = RequestScope::attach(req.into_inner(), token, &store);
    schema.execute(request).await.into()
}

/// GraphQL Playground handler for development
async fn graphql_playground() -> impl IntoResponse {
    Html(async_graphql::http::playground_source(
        async_graphql::http::GraphQLPlaygroundConfig::new("/graphql"),
    ))
}
