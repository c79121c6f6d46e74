//! Resolver behavior against the in-memory store
//!
//! Covers list composition, media item and collection mutations, ownership
//! checks and role guards.

mod common;

use common::*;
use serde_json::{json, Value};
use uuid::Uuid;

use mixtape_api::models::Role;

async fn names(app: &TestApp, query: &str, token: &str, field: &str) -> Vec<String> {
    let response = app.execute(query, json!({}), Some(token)).await;
    data(&response)[field]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap().to_string())
        .collect()
}

async fn seed_catalog(app: &TestApp) -> String {
    let (ada, token) = app.account("Ada", Role::Administrator).await;
    let (zed, _) = app.account("Zed", Role::Creator).await;
    media_item(&app.store, "Xylophone Dreams", "Jazz", zed.id).await;
    media_item(&app.store, "Yellow", "Rock", ada.id).await;
    media_item(&app.store, "Xenon", "rock", ada.id).await;
    media_item(&app.store, "Anthem", "Pop", zed.id).await;
    token
}

// ========== Lists ==========

#[tokio::test]
async fn test_first_filter_field_wins() {
    let app = TestApp::new();
    let token = seed_catalog(&app).await;

    let both = names(
        &app,
        r#"query { listMediaItems(filter: { name: "x", genre: "rock" }) { name } }"#,
        &token,
        "listMediaItems",
    )
    .await;
    let name_only = names(
        &app,
        r#"query { listMediaItems(filter: { name: "x" }) { name } }"#,
        &token,
        "listMediaItems",
    )
    .await;

    assert_eq!(both, name_only);
    assert_eq!(both, vec!["Xylophone Dreams", "Xenon"]);
}

#[tokio::test]
async fn test_filter_is_case_insensitive_substring() {
    let app = TestApp::new();
    let token = seed_catalog(&app).await;

    let rock = names(
        &app,
        r#"query { listMediaItems(filter: { genre: "ROCK" }) { name } }"#,
        &token,
        "listMediaItems",
    )
    .await;
    assert_eq!(rock, vec!["Yellow", "Xenon"]);
}

#[tokio::test]
async fn test_filter_by_creator_name() {
    let app = TestApp::new();
    let token = seed_catalog(&app).await;

    let by_zed = names(
        &app,
        r#"query { listMediaItems(filter: { creatorName: "ze" }) { name } }"#,
        &token,
        "listMediaItems",
    )
    .await;
    assert_eq!(by_zed, vec!["Xylophone Dreams", "Anthem"]);
}

#[tokio::test]
async fn test_sort_by_name_and_creator_name() {
    let app = TestApp::new();
    let token = seed_catalog(&app).await;

    let sorted = names(
        &app,
        "query { listMediaItems(sorting: { name: DESC }) { name } }",
        &token,
        "listMediaItems",
    )
    .await;
    assert_eq!(sorted, vec!["Yellow", "Xylophone Dreams", "Xenon", "Anthem"]);

    let response = app
        .execute(
            "query { listMediaItems(sorting: { creatorName: ASC }) { creator { name } } }",
            json!({}),
            Some(&token),
        )
        .await;
    let creators: Vec<&str> = data(&response)["listMediaItems"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["creator"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(creators, vec!["Ada", "Ada", "Zed", "Zed"]);
}

#[tokio::test]
async fn test_pagination_wins_over_filter() {
    let app = TestApp::new();
    let token = seed_catalog(&app).await;

    let first_page = names(
        &app,
        r#"query {
            listMediaItems(pagination: { limit: 3, page: 0 }, filter: { genre: "pop" }) { name }
        }"#,
        &token,
        "listMediaItems",
    )
    .await;
    assert_eq!(first_page, vec!["Xylophone Dreams", "Yellow", "Xenon"]);

    let second_page = names(
        &app,
        "query { listMediaItems(pagination: { limit: 3, page: 1 }) { name } }",
        &token,
        "listMediaItems",
    )
    .await;
    assert_eq!(second_page, vec!["Anthem"]);
}

#[tokio::test]
async fn test_negative_page_is_a_validation_error() {
    let app = TestApp::new();
    let token = seed_catalog(&app).await;

    let response = app
        .execute(
            "query { listMediaItems(pagination: { limit: 3, page: -1 }) { name } }",
            json!({}),
            Some(&token),
        )
        .await;
    assert_eq!(error_code(&response), Some("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_incomplete_pagination_is_ignored() {
    let app = TestApp::new();
    let token = seed_catalog(&app).await;

    let pop = names(
        &app,
        r#"query { listMediaItems(pagination: { limit: 0 }, filter: { genre: "pop" }) { name } }"#,
        &token,
        "listMediaItems",
    )
    .await;
    assert_eq!(pop, vec!["Anthem"]);
}

#[tokio::test]
async fn test_list_accounts_filtered_by_email() {
    let app = TestApp::new();
    let (_, token) = app.account("Ada", Role::Enjoyer).await;
    app.account("Grace", Role::Creator).await;

    let found = names(
        &app,
        r#"query { listAccounts(filter: { email: "GRACE@" }) { name } }"#,
        &token,
        "listAccounts",
    )
    .await;
    assert_eq!(found, vec!["Grace"]);
}

#[tokio::test]
async fn test_get_missing_document_is_null() {
    let app = TestApp::new();
    let (_, token) = app.account("Ada", Role::Enjoyer).await;

    let response = app
        .execute(
            "query($id: ID!) { getMediaItem(id: $id) { name } getAccount(id: $id) { name } }",
            json!({ "id": Uuid::new_v4() }),
            Some(&token),
        )
        .await;
    assert_eq!(
        data(&response),
        &json!({ "getMediaItem": null, "getAccount": null })
    );
}

#[tokio::test]
async fn test_malformed_id_is_a_validation_error() {
    let app = TestApp::new();
    let (_, token) = app.account("Ada", Role::Enjoyer).await;

    let response = app
        .execute(
            r#"query { getCollection(id: "not-an-id") { name } }"#,
            json!({}),
            Some(&token),
        )
        .await;
    assert_eq!(error_code(&response), Some("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_me_returns_caller() {
    let app = TestApp::new();
    let (ada, token) = app.account("Ada", Role::Creator).await;

    let response = app
        .execute("query { me { id name role } }", json!({}), Some(&token))
        .await;
    assert_eq!(
        data(&response)["me"],
        json!({ "id": ada.id.to_string(), "name": "Ada", "role": "Creator" })
    );
}

// ========== Media items ==========

const CREATE_MEDIA_ITEM: &str = r#"
    mutation($input: CreateMediaItemInput!) {
        createMediaItem(input: $input) { id name genre creatorId }
    }
"#;

#[tokio::test]
async fn test_create_media_item_stamps_caller() {
    let app = TestApp::new();
    let (admin, token) = app.account("Ada", Role::Administrator).await;

    let response = app
        .execute(
            CREATE_MEDIA_ITEM,
            json!({ "input": { "name": "Song", "genre": "Pop" } }),
            Some(&token),
        )
        .await;
    let created = data(&response)["createMediaItem"].clone();
    assert_eq!(created["creatorId"], admin.id.to_string());

    let response = app
        .execute(
            "query($id: ID!) { getMediaItem(id: $id) { name genre creator { id } } }",
            json!({ "id": created["id"] }),
            Some(&token),
        )
        .await;
    assert_eq!(
        data(&response)["getMediaItem"],
        json!({ "name": "Song", "genre": "Pop", "creator": { "id": admin.id.to_string() } })
    );
}

#[tokio::test]
async fn test_create_media_item_requires_administrator() {
    let app = TestApp::new();
    let (_, token) = app.account("Ada", Role::Creator).await;

    let response = app
        .execute(
            CREATE_MEDIA_ITEM,
            json!({ "input": { "name": "Song", "genre": "Pop" } }),
            Some(&token),
        )
        .await;
    assert_eq!(error_code(&response), Some("FORBIDDEN"));
    assert!(error_message(&response).unwrap().contains("Administrator"));
    assert_eq!(response["data"], Value::Null);
}

#[tokio::test]
async fn test_update_and_delete_media_item() {
    let app = TestApp::new();
    let (admin, _) = app.account("Ada", Role::Administrator).await;
    let (_, token) = app.account("Eve", Role::Enjoyer).await;
    let item = media_item(&app.store, "Song", "Pop", admin.id).await;

    let response = app
        .execute(
            r#"mutation($id: ID!) { updateMediaItem(id: $id, patch: { genre: "Disco" }) { name genre } }"#,
            json!({ "id": item.id }),
            Some(&token),
        )
        .await;
    assert_eq!(
        data(&response)["updateMediaItem"],
        json!({ "name": "Song", "genre": "Disco" })
    );

    let delete = r#"mutation($id: ID!) { deleteMediaItem(id: $id) { name } }"#;
    let response = app.execute(delete, json!({ "id": item.id }), Some(&token)).await;
    assert_eq!(data(&response)["deleteMediaItem"]["name"], "Song");

    let response = app.execute(delete, json!({ "id": item.id }), Some(&token)).await;
    assert_eq!(data(&response)["deleteMediaItem"], Value::Null);
}

// ========== Collections ==========

#[tokio::test]
async fn test_create_collection_requires_creator() {
    let app = TestApp::new();
    let (_, admin_token) = app.account("Ada", Role::Administrator).await;
    let (creator, creator_token) = app.account("Grace", Role::Creator).await;
    let create = r#"mutation { createCollection(input: { name: "Mix" }) { name creatorId mediaItemIds } }"#;

    let response = app.execute(create, json!({}), Some(&admin_token)).await;
    assert_eq!(error_code(&response), Some("FORBIDDEN"));

    let response = app.execute(create, json!({}), Some(&creator_token)).await;
    assert_eq!(
        data(&response)["createCollection"],
        json!({ "name": "Mix", "creatorId": creator.id.to_string(), "mediaItemIds": [] })
    );
}

const ADD_COLLABORATORS: &str = r#"
    mutation($id: ID!, $ids: [ID!]!, $creatorId: ID!) {
        addCollaboratorsToCollection(id: $id, collaboratorIds: $ids, creatorId: $creatorId) {
            collaboratorIds
        }
    }
"#;

#[tokio::test]
async fn test_only_creator_adds_collaborators() {
    let app = TestApp::new();
    let (owner, owner_token) = app.account("Ada", Role::Creator).await;
    let (stranger, stranger_token) = app.account("Mallory", Role::Creator).await;
    let (friend, _) = app.account("Grace", Role::Enjoyer).await;
    let (other, _) = app.account("Linus", Role::Enjoyer).await;
    let mix = collection(&app.store, "Mix", owner.id, vec![], vec![friend.id]).await;

    let response = app
        .execute(
            ADD_COLLABORATORS,
            json!({ "id": mix.id, "ids": [stranger.id], "creatorId": stranger.id }),
            Some(&stranger_token),
        )
        .await;
    assert_eq!(error_code(&response), Some("FORBIDDEN"));

    let response = app
        .execute(
            ADD_COLLABORATORS,
            json!({ "id": mix.id, "ids": [other.id, friend.id], "creatorId": owner.id }),
            Some(&owner_token),
        )
        .await;
    data(&response);

    let response = app
        .execute(
            "query($id: ID!) { getCollection(id: $id) { collaborators { name } } }",
            json!({ "id": mix.id }),
            Some(&owner_token),
        )
        .await;
    assert_eq!(
        data(&response)["getCollection"]["collaborators"],
        json!([{ "name": "Grace" }, { "name": "Linus" }])
    );
}

#[tokio::test]
async fn test_collaborator_edits_media_items() {
    let app = TestApp::new();
    let (owner, _) = app.account("Ada", Role::Creator).await;
    let (friend, friend_token) = app.account("Grace", Role::Enjoyer).await;
    let (_, stranger_token) = app.account("Mallory", Role::Enjoyer).await;
    let item = media_item(&app.store, "Song", "Pop", owner.id).await;
    let mix = collection(&app.store, "Mix", owner.id, vec![], vec![friend.id]).await;

    let add = r#"mutation($id: ID!, $items: [ID!]!) {
        addMediaItemsToCollection(id: $id, mediaItemIds: $items) { mediaItemIds }
    }"#;
    let variables = json!({ "id": mix.id, "items": [item.id, item.id] });

    let response = app.execute(add, variables.clone(), Some(&stranger_token)).await;
    assert_eq!(error_code(&response), Some("FORBIDDEN"));

    let response = app.execute(add, variables, Some(&friend_token)).await;
    assert_eq!(
        data(&response)["addMediaItemsToCollection"]["mediaItemIds"],
        json!([item.id.to_string(), item.id.to_string()])
    );

    let response = app
        .execute(
            r#"mutation($id: ID!, $items: [ID!]!) {
                removeMediaItemsFromCollection(id: $id, mediaItemIds: $items) { mediaItemIds }
            }"#,
            json!({ "id": mix.id, "items": [item.id] }),
            Some(&friend_token),
        )
        .await;
    assert_eq!(
        data(&response)["removeMediaItemsFromCollection"]["mediaItemIds"],
        json!([])
    );
}

#[tokio::test]
async fn test_membership_change_on_missing_collection() {
    let app = TestApp::new();
    let (owner, token) = app.account("Ada", Role::Creator).await;

    let response = app
        .execute(
            ADD_COLLABORATORS,
            json!({ "id": Uuid::new_v4(), "ids": [], "creatorId": owner.id }),
            Some(&token),
        )
        .await;
    assert_eq!(error_code(&response), Some("NOT_FOUND"));
}
