//! Generic handlers shared by every store resource kind.
//!
//! `router::<Size>()` mounts the five CRUD routes under
//! `/api/{store_id}/sizes`; the same holds for every [`Resource`].

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    routing::get,
};

use storeboard_core::StoreId;

use super::Deleted;
use crate::error::AppError;
use crate::middleware::RequireCaller;
use crate::services::{Resource, ResourceService};
use crate::state::AppState;

/// CRUD routes for one resource kind.
pub fn router<R: Resource>() -> Router<AppState> {
    let collection = format!("/api/{{store_id}}/{}", R::SEGMENT);
    let member = format!("{collection}/{{id}}");

    Router::new()
        .route(&collection, get(list::<R>).post(create::<R>))
        .route(&member, get(show::<R>).patch(update::<R>).delete(destroy::<R>))
}

async fn list<R: Resource>(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    Query(filter): Query<R::Filter>,
) -> Result<Json<Vec<R>>, AppError> {
    let items = ResourceService::<R>::new(state.pool())
        .list(store_id, &filter)
        .await?;
    Ok(Json(items))
}

async fn show<R: Resource>(
    State(state): State<AppState>,
    Path((store_id, id)): Path<(StoreId, R::Id)>,
) -> Result<Json<R>, AppError> {
    let item = ResourceService::<R>::new(state.pool())
        .get(store_id, id)
        .await?;
    Ok(Json(item))
}

async fn create<R: Resource>(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    RequireCaller(caller): RequireCaller,
    payload: Result<Json<R::Payload>, JsonRejection>,
) -> Result<Json<R>, AppError> {
    let Json(payload) = payload?;
    let item = ResourceService::<R>::new(state.pool())
        .create(store_id, &caller, payload)
        .await?;
    Ok(Json(item))
}

async fn update<R: Resource>(
    State(state): State<AppState>,
    Path((store_id, id)): Path<(StoreId, R::Id)>,
    RequireCaller(caller): RequireCaller,
    payload: Result<Json<R::Payload>, JsonRejection>,
) -> Result<Json<R>, AppError> {
    let Json(payload) = payload?;
    let item = ResourceService::<R>::new(state.pool())
        .update(store_id, &caller, id, payload)
        .await?;
    Ok(Json(item))
}

async fn destroy<R: Resource>(
    State(state): State<AppState>,
    Path((store_id, id)): Path<(StoreId, R::Id)>,
    RequireCaller(caller): RequireCaller,
) -> Result<Json<Deleted>, AppError> {
    let count = ResourceService::<R>::new(state.pool())
        .delete(store_id, &caller, id)
        .await?;
    Ok(Json(Deleted { count }))
}
