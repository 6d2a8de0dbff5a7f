//! Store routes.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, post},
};

use storeboard_core::StoreId;

use super::Deleted;
use crate::error::AppError;
use crate::middleware::RequireCaller;
use crate::models::{Store, StorePayload};
use crate::services::StoreService;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/stores", post(create).get(list_owned))
        .route("/api/stores/{store_id}", get(show).patch(rename).delete(destroy))
}

async fn create(
    State(state): State<AppState>,
    RequireCaller(caller): RequireCaller,
    payload: Result<Json<StorePayload>, JsonRejection>,
) -> Result<Json<Store>, AppError> {
    let Json(payload) = payload?;
    let store = StoreService::new(state.pool()).create(&caller, payload).await?;
    Ok(Json(store))
}

async fn list_owned(
    State(state): State<AppState>,
    RequireCaller(caller): RequireCaller,
) -> Result<Json<Vec<Store>>, AppError> {
    let stores = StoreService::new(state.pool()).list_owned(&caller).await?;
    Ok(Json(stores))
}

async fn show(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Store>, AppError> {
    let store = StoreService::new(state.pool()).get(store_id).await?;
    Ok(Json(store))
}

async fn rename(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    RequireCaller(caller): RequireCaller,
    payload: Result<Json<StorePayload>, JsonRejection>,
) -> Result<Json<Store>, AppError> {
    let Json(payload) = payload?;
    let store = StoreService::new(state.pool())
        .rename(store_id, &caller, payload)
        .await?;
    Ok(Json(store))
}

async fn destroy(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    RequireCaller(caller): RequireCaller,
) -> Result<Json<Deleted>, AppError> {
    let count = StoreService::new(state.pool()).delete(store_id, &caller).await?;
    Ok(Json(Deleted { count }))
}
