//! Authentication, validation and ownership checks, and the order they run in.

use axum::http::{Method, StatusCode};
use serde_json::json;
use storeboard_integration_tests::{OWNER, STRANGER, TestApp, id_of};

#[tokio::test]
async fn test_mutation_without_identity_is_unauthenticated() {
    let app = TestApp::spawn().await;
    let store_id = app.create_store(OWNER, "Acme").await;

    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/{store_id}/sizes"),
            None,
            Some(json!({ "name": "Small", "value": "S" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(Method::POST, "/api/stores", None, Some(json!({ "name": "Acme" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unauthenticated_before_validation() {
    let app = TestApp::spawn().await;
    let store_id = app.create_store(OWNER, "Acme").await;

    let (status, _) = app
        .request(Method::POST, &format!("/api/{store_id}/sizes"), None, Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_validation_before_ownership() {
    let app = TestApp::spawn().await;
    let store_id = app.create_store(OWNER, "Acme").await;

    let (status, message) = app
        .post(&format!("/api/{store_id}/sizes"), STRANGER, json!({ "value": "S" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(message.as_str().is_some_and(|m| m.contains("name")));

    let (status, _) = app
        .post(
            &format!("/api/{store_id}/sizes"),
            STRANGER,
            json!({ "name": "Small", "value": "S" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, sizes) = app.get(&format!("/api/{store_id}/sizes")).await;
    assert_eq!(sizes, json!([]));
}

#[tokio::test]
async fn test_unknown_store_before_ownership() {
    let app = TestApp::spawn().await;

    let (status, _) = app
        .post(
            "/api/00000000-0000-4000-8000-000000000000/sizes",
            STRANGER,
            json!({ "name": "Small", "value": "S" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_color_value() {
    let app = TestApp::spawn().await;
    let store_id = app.create_store(OWNER, "Acme").await;

    let (status, message) = app
        .post(
            &format!("/api/{store_id}/colors"),
            OWNER,
            json!({ "name": "Red", "value": "red" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(message.as_str().is_some_and(|m| m.contains("hex")));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::spawn().await;
    let store_id = app.create_store(OWNER, "Acme").await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/{store_id}/sizes"),
            Some(OWNER),
            Some(json!("not an object")),
        )
        .await;
    assert_eq!(response.0, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_ids_are_bad_request() {
    let app = TestApp::spawn().await;
    let store_id = app.create_store(OWNER, "Acme").await;

    let (status, _) = app.get("/api/not-a-store/sizes").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.get(&format!("/api/{store_id}/sizes/not-a-size")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deleting_missing_row_reports_zero() {
    let app = TestApp::spawn().await;
    let store_id = app.create_store(OWNER, "Acme").await;

    let (status, body) = app
        .delete(
            &format!("/api/{store_id}/sizes/00000000-0000-4000-8000-000000000000"),
            OWNER,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "count": 0 }));
}

#[tokio::test]
async fn test_every_kind_round_trips_and_rejects_strangers() {
    let app = TestApp::spawn().await;
    let catalog = app.catalog().await;
    let store_id = catalog.store_id.clone();
    let product_id = app
        .create(&store_id, "products", catalog.product("tee", "19.99"))
        .await;
    let order = |phone: &str| {
        json!({
            "phone": phone,
            "address": "1 Market Street",
            "isPaid": true,
            "items": [{ "productId": product_id, "quantity": 3 }],
        })
    };

    // (segment, create payload, update payload)
    let kinds = [
        (
            "billboards",
            json!({ "label": "Winter", "imageUrl": "https://img.example/winter.jpg" }),
            json!({ "label": "Spring", "imageUrl": "https://img.example/spring.jpg" }),
        ),
        (
            "categories",
            json!({ "name": "Hats", "billboardId": catalog.billboard_id }),
            json!({ "name": "Caps", "billboardId": catalog.billboard_id }),
        ),
        (
            "sizes",
            json!({ "name": "Large", "value": "L" }),
            json!({ "name": "Extra large", "value": "XL" }),
        ),
        (
            "colors",
            json!({ "name": "White", "value": "#ffffff" }),
            json!({ "name": "Red", "value": "#ff0000" }),
        ),
        (
            "products",
            catalog.product("cap", "12.00"),
            catalog.product("cap", "14.50"),
        ),
        ("orders", order("555-0100"), order("555-0199")),
    ];

    for (segment, payload, changed) in kinds {
        let collection = format!("/api/{store_id}/{segment}");

        let (status, created) = app.post(&collection, OWNER, payload.clone()).await;
        assert_eq!(status, StatusCode::OK, "create {segment}: {created}");
        for (key, value) in payload.as_object().into_iter().flatten() {
            if key != "images" && key != "items" {
                assert_eq!(&created[key], value, "{segment}.{key}");
            }
        }
        let member = format!("{collection}/{}", id_of(&created));
        let (status, fetched) = app.get(&member).await;
        assert_eq!(status, StatusCode::OK, "get {segment}");
        assert_eq!(fetched, created, "get {segment}");

        let (_, listed_before) = app.get(&collection).await;

        let (status, _) = app.post(&collection, STRANGER, payload.clone()).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "stranger create {segment}");
        let (status, _) = app.patch(&member, STRANGER, changed.clone()).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "stranger update {segment}");
        let (status, _) = app.delete(&member, STRANGER).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "stranger delete {segment}");

        let (_, listed_after) = app.get(&collection).await;
        assert_eq!(listed_after, listed_before, "{segment} list changed");
        let (_, unchanged) = app.get(&member).await;
        assert_eq!(unchanged, created, "{segment} changed");

        let (status, updated) = app.patch(&member, OWNER, changed.clone()).await;
        assert_eq!(status, StatusCode::OK, "update {segment}: {updated}");
        let (_, again) = app.patch(&member, OWNER, changed).await;
        assert_eq!(again, updated, "update {segment} is not idempotent");
    }

    let store = format!("/api/stores/{store_id}");
    let (_, before) = app.get(&store).await;
    let (status, _) = app.patch(&store, STRANGER, json!({ "name": "Hijacked" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.delete(&store, STRANGER).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, after) = app.get(&store).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after, before);
}
