//! Integration tests for the HTTP surface
//!
//! Drives the router with `tower::ServiceExt::oneshot`: health routes and
//! bearer token extraction on `POST /graphql`.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use common::*;
use serde_json::{json, Value};
use tower::ServiceExt;

use mixtape_api::models::Role;
use mixtape_api::routes::{graphql_router, health_router, HealthState};

fn router(app: &TestApp) -> Router {
    graphql_router(app.schema.clone(), app.store.clone())
        .nest("/health", health_router(HealthState::memory()))
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn graphql_request(query: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder
        .body(Body::from(json!({ "query": query }).to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();

    let response = router(&app)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router(&app)
        .oneshot(Request::builder().uri("/health/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["store"], "memory");
}

#[tokio::test]
async fn test_quoted_lowercase_bearer_is_accepted() {
    let app = TestApp::new();
    let (ada, token) = app.account("Ada", Role::Enjoyer).await;

    let response = router(&app)
        .oneshot(graphql_request(
            "{ me { name } }",
            Some(&format!("bearer \"{token}\"")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["me"]["name"], ada.name);
}

#[tokio::test]
async fn test_other_scheme_counts_as_missing_credentials() {
    let app = TestApp::new();
    let (_, token) = app.account("Ada", Role::Enjoyer).await;

    let response = router(&app)
        .oneshot(graphql_request(
            "{ me { name } }",
            Some(&format!("Basic {token}")),
        ))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(error_code(&body), Some("UNAUTHENTICATED"));
    assert_eq!(error_message(&body), Some("missing credentials"));
}

#[tokio::test]
async fn test_playground_is_served() {
    let app = TestApp::new();

    let response = router(&app)
        .oneshot(
            Request::builder()
                .uri("/graphql/playground")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
