//! Orders over HTTP: line items, totals and the sent flag.

use axum::http::StatusCode;
use serde_json::json;
use storeboard_integration_tests::{Catalog, OWNER, STRANGER, TestApp, id_of};

async fn place_order(app: &TestApp, catalog: &Catalog) -> (String, String) {
    let tee = app
        .create(&catalog.store_id, "products", catalog.product("tee", "19.99"))
        .await;
    let socks = app
        .create(&catalog.store_id, "products", catalog.product("socks", "5.50"))
        .await;
    let (status, order) = app
        .post(
            &format!("/api/{}/orders", catalog.store_id),
            OWNER,
            json!({
                "phone": "555-0100",
                "address": "1 Market Street",
                "isPaid": true,
                "items": [
                    { "productId": tee, "quantity": 2 },
                    { "productId": socks },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "create order: {order}");
    (id_of(&order), tee)
}

#[tokio::test]
async fn test_order_total_and_items() {
    let app = TestApp::spawn().await;
    let catalog = app.catalog().await;
    let (order_id, _) = place_order(&app, &catalog).await;

    let (status, order) = app
        .get(&format!("/api/{}/orders/{order_id}", catalog.store_id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["totalPrice"], "45.48");
    assert_eq!(order["isPaid"], true);
    assert_eq!(order["isSent"], false);
    assert_eq!(order["items"][0]["productName"], "tee");
    assert_eq!(order["items"][0]["quantity"], 2);
    assert_eq!(order["items"][1]["quantity"], 1);
}

#[tokio::test]
async fn test_sent_toggle() {
    let app = TestApp::spawn().await;
    let catalog = app.catalog().await;
    let (order_id, _) = place_order(&app, &catalog).await;
    let uri = format!("/api/{}/orders/{order_id}/sent", catalog.store_id);

    let (status, order) = app.patch(&uri, OWNER, json!({ "isSent": true })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["isSent"], true);

    let (status, _) = app.patch(&uri, STRANGER, json!({ "isSent": false })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.patch(&uri, OWNER, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, order) = app
        .get(&format!("/api/{}/orders/{order_id}", catalog.store_id))
        .await;
    assert_eq!(order["isSent"], true);
}

#[tokio::test]
async fn test_sent_toggle_for_unknown_order() {
    let app = TestApp::spawn().await;
    let catalog = app.catalog().await;

    let (status, _) = app
        .patch(
            &format!(
                "/api/{}/orders/00000000-0000-4000-8000-000000000000/sent",
                catalog.store_id
            ),
            OWNER,
            json!({ "isSent": true }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ordered_product_cannot_be_deleted_until_order_is() {
    let app = TestApp::spawn().await;
    let catalog = app.catalog().await;
    let (order_id, tee) = place_order(&app, &catalog).await;
    let product_uri = format!("/api/{}/products/{tee}", catalog.store_id);

    let (status, _) = app.delete(&product_uri, OWNER).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .delete(&format!("/api/{}/orders/{order_id}", catalog.store_id), OWNER)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, deleted) = app.delete(&product_uri, OWNER).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({ "count": 1 }));
}

#[tokio::test]
async fn test_order_needs_items() {
    let app = TestApp::spawn().await;
    let catalog = app.catalog().await;

    let (status, message) = app
        .post(
            &format!("/api/{}/orders", catalog.store_id),
            OWNER,
            json!({ "phone": "555-0100", "items": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(message.as_str().is_some_and(|m| m.contains("items")));
}

#[tokio::test]
async fn test_order_total_overflow() {
    const DECIMAL_MAX: &str = "79228162514264337593543950335";

    let app = TestApp::spawn().await;
    let catalog = app.catalog().await;
    let (order_id, tee) = place_order(&app, &catalog).await;

    let (status, _) = app
        .patch(
            &format!("/api/{}/products/{tee}", catalog.store_id),
            OWNER,
            catalog.product("tee", DECIMAL_MAX),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get(&format!("/api/{}/orders", catalog.store_id)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Internal server error");

    let (status, _) = app
        .get(&format!("/api/{}/orders/{order_id}", catalog.store_id))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, message) = app
        .post(
            &format!("/api/{}/orders", catalog.store_id),
            OWNER,
            json!({ "items": [{ "productId": tee, "quantity": 2 }] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(message.as_str().is_some_and(|m| m.contains("items.quantity")));
}
