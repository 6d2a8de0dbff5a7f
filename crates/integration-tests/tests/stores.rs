//! Store lifecycle over HTTP.

use axum::http::StatusCode;
use serde_json::json;
use storeboard_integration_tests::{OWNER, STRANGER, TestApp, id_of};

#[tokio::test]
async fn test_create_list_and_show_store() {
    let app = TestApp::spawn().await;

    let (status, store) = app.post("/api/stores", OWNER, json!({ "name": "  Acme  " })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store["name"], "Acme");
    assert_eq!(store["userId"], OWNER);
    let store_id = id_of(&store);

    let (status, mine) = app
        .request(axum::http::Method::GET, "/api/stores", Some(OWNER), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().map(Vec::len), Some(1));

    let (status, theirs) = app
        .request(axum::http::Method::GET, "/api/stores", Some(STRANGER), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(theirs, json!([]));

    let (status, shown) = app.get(&format!("/api/stores/{store_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shown, store);
}

#[tokio::test]
async fn test_listing_own_stores_requires_identity() {
    let app = TestApp::spawn().await;
    let (status, _) = app.get("/api/stores").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rename_is_owner_only() {
    let app = TestApp::spawn().await;
    let store_id = app.create_store(OWNER, "Acme").await;
    let uri = format!("/api/stores/{store_id}");

    let (status, _) = app.patch(&uri, STRANGER, json!({ "name": "Hijacked" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, renamed) = app.patch(&uri, OWNER, json!({ "name": "Acme Outfitters" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "Acme Outfitters");

    let (_, shown) = app.get(&uri).await;
    assert_eq!(shown["name"], "Acme Outfitters");
}

#[tokio::test]
async fn test_store_with_resources_cannot_be_deleted() {
    let app = TestApp::spawn().await;
    let store_id = app.create_store(OWNER, "Acme").await;
    let size_id = app
        .create(&store_id, "sizes", json!({ "name": "Small", "value": "S" }))
        .await;
    let uri = format!("/api/stores/{store_id}");

    let (status, message) = app.delete(&uri, OWNER).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(message.as_str().is_some_and(|m| m.contains("sizes")));

    let (status, _) = app
        .delete(&format!("/api/{store_id}/sizes/{size_id}"), OWNER)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, deleted) = app.delete(&uri, OWNER).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({ "count": 1 }));

    let (status, _) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_store_is_not_found() {
    let app = TestApp::spawn().await;
    let uri = "/api/stores/00000000-0000-4000-8000-000000000000";

    let (status, _) = app.get(uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(uri, OWNER).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
