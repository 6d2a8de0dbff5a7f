//! Integration tests for Storeboard.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storeboard-integration-tests
//! ```
//!
//! Every [`TestApp`] owns a fresh, migrated in-memory database and drives the
//! fully layered router in-process, so tests need no running server.
//!
//! # Test Categories
//!
//! - `stores` - Store lifecycle and ownership
//! - `resources` - Catalog CRUD, reference conflicts, filters
//! - `orders` - Orders, totals and the sent flag
//! - `access` - Authentication, validation and ownership precedence

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use storeboard_api::config::ApiConfig;
use storeboard_api::db;
use storeboard_api::routes;
use storeboard_api::state::AppState;
use tower::ServiceExt;

/// Identity that owns the stores created by most tests.
pub const OWNER: &str = "user_owner";

/// A second, unrelated identity.
pub const STRANGER: &str = "user_stranger";

/// Response status plus body. Bodies that are not JSON come back as
/// `Value::String`.
pub type TestResponse = (StatusCode, Value);

/// The application wired to a private in-memory database.
pub struct TestApp {
    router: Router,
    pool: SqlitePool,
}

impl TestApp {
    /// Build the application with default configuration.
    pub async fn spawn() -> Self {
        let config = ApiConfig::from_lookup(|key| {
            (key == "STOREBOARD_DATABASE_URL").then(|| "sqlite::memory:".to_string())
        })
        .expect("test configuration");
        let pool = db::create_pool(&config.database_url)
            .await
            .expect("in-memory pool");
        db::migrate(&pool).await.expect("migrations");

        let router = routes::app(AppState::new(config, pool.clone()));
        Self { router, pool }
    }

    /// Direct access to the database, for assertions on stored rows.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Send a request, optionally as `caller` and with a JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        caller: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(caller) = caller {
            builder = builder.header("x-user-id", caller);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("infallible router");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("response body")
            .to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    /// `GET` without an identity.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, None).await
    }

    /// `POST` a JSON body as `caller`.
    pub async fn post(&self, uri: &str, caller: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(caller), Some(body)).await
    }

    /// `PATCH` a JSON body as `caller`.
    pub async fn patch(&self, uri: &str, caller: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(caller), Some(body)).await
    }

    /// `DELETE` as `caller`.
    pub async fn delete(&self, uri: &str, caller: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(caller), None).await
    }

    /// Create a store owned by `owner` and return its id.
    pub async fn create_store(&self, owner: &str, name: &str) -> String {
        let (status, body) = self
            .post("/api/stores", owner, serde_json::json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::OK, "create store: {body}");
        id_of(&body)
    }

    /// Create a resource of kind `segment` in the store as [`OWNER`] and
    /// return its id.
    pub async fn create(&self, store_id: &str, segment: &str, body: Value) -> String {
        let (status, body) = self
            .post(&format!("/api/{store_id}/{segment}"), OWNER, body)
            .await;
        assert_eq!(status, StatusCode::OK, "create {segment}: {body}");
        id_of(&body)
    }

    /// A store owned by [`OWNER`] with one billboard, category, size and
    /// color, ready for products.
    pub async fn catalog(&self) -> Catalog {
        let store_id = self.create_store(OWNER, "Acme").await;
        let billboard_id = self
            .create(
                &store_id,
                "billboards",
                serde_json::json!({
                    "label": "Summer",
                    "imageUrl": "https://img.example/summer.jpg",
                }),
            )
            .await;
        let category_id = self
            .create(
                &store_id,
                "categories",
                serde_json::json!({ "name": "Shirts", "billboardId": billboard_id }),
            )
            .await;
        let size_id = self
            .create(&store_id, "sizes", serde_json::json!({ "name": "Medium", "value": "M" }))
            .await;
        let color_id = self
            .create(&store_id, "colors", serde_json::json!({ "name": "Black", "value": "#000000" }))
            .await;

        Catalog {
            store_id,
            billboard_id,
            category_id,
            size_id,
            color_id,
        }
    }
}

/// Ids of the rows created by [`TestApp::catalog`].
#[derive(Debug, Clone)]
pub struct Catalog {
    pub store_id: String,
    pub billboard_id: String,
    pub category_id: String,
    pub size_id: String,
    pub color_id: String,
}

impl Catalog {
    /// A valid product payload for this catalog.
    #[must_use]
    pub fn product(&self, name: &str, price: &str) -> Value {
        serde_json::json!({
            "name": name,
            "price": price,
            "categoryId": self.category_id,
            "colorId": self.color_id,
            "sizeId": self.size_id,
            "images": [{ "url": format!("https://img.example/{name}.jpg") }],
        })
    }
}

/// The `id` field of a JSON entity.
#[must_use]
pub fn id_of(body: &Value) -> String {
    body["id"].as_str().expect("entity has an id").to_owned()
}
