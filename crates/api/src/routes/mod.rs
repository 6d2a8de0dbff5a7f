//! HTTP routes.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                              - Liveness
//! GET    /health/ready                        - Readiness (database ping)
//!
//! # Stores
//! POST   /api/stores                          - Create a store owned by the caller
//! GET    /api/stores                          - The caller's stores
//! GET    /api/stores/{storeId}                - Public store lookup
//! PATCH  /api/stores/{storeId}                - Rename (owner only)
//! DELETE /api/stores/{storeId}                - Delete an empty store (owner only)
//!
//! # Store resources (billboards, categories, sizes, colors, products, orders)
//! GET    /api/{storeId}/{kind}                - List (public)
//! POST   /api/{storeId}/{kind}                - Create (owner only)
//! GET    /api/{storeId}/{kind}/{id}           - Get (public)
//! PATCH  /api/{storeId}/{kind}/{id}           - Replace fields (owner only)
//! DELETE /api/{storeId}/{kind}/{id}           - Delete (owner only)
//!
//! # Orders
//! PATCH  /api/{storeId}/orders/{id}/sent      - Set the sent flag (owner only)
//! ```

pub mod health;
pub mod orders;
pub mod resource;
pub mod stores;

use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, Method, Request, Response, header},
    middleware,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::Span;

use crate::middleware::request_id_middleware;
use crate::models::{Billboard, Category, Color, Order, Product, Size};
use crate::state::AppState;

/// Response body of a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    /// Number of rows removed; zero if the id did not exist.
    pub count: u64,
}

/// All routes, without middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(stores::router())
        .merge(orders::router())
        .merge(resource::router::<Billboard>())
        .merge(resource::router::<Category>())
        .merge(resource::router::<Size>())
        .merge(resource::router::<Color>())
        .merge(resource::router::<Product>())
        .merge(resource::router::<Order>())
}

/// The complete application: routes, state and middleware.
pub fn app(state: AppState) -> Router {
    let config = state.config();
    let cors = cors_layer(config.allowed_origins.as_slice(), &config.identity_header);

    routes()
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// CORS for browser clients. Origins that are not valid header values are skipped.
fn cors_layer(origins: &[String], identity_header: &header::HeaderName) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, identity_header.clone()])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::config::ApiConfig;
    use crate::db::testing;

    async fn test_app() -> Router {
        let config = ApiConfig::from_lookup(|key| {
            (key == "STOREBOARD_DATABASE_URL").then(|| "sqlite::memory:".to_string())
        })
        .unwrap();
        app(AppState::new(config, testing::pool().await))
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .await
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
            "nosniff"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_readiness() {
        let response = test_app()
            .await
            .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_store_id_is_bad_request() {
        let response = test_app()
            .await
            .oneshot(Request::get("/api/not-a-uuid/sizes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_anonymous_create_is_unauthenticated() {
        let uri = format!("/api/{}/sizes", storeboard_core::StoreId::generate());
        let response = test_app()
            .await
            .oneshot(
                Request::post(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"M","value":"42"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
