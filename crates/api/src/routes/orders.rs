//! Order routes beyond generic CRUD.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::patch,
};

use storeboard_core::{OrderId, StoreId};

use crate::error::AppError;
use crate::middleware::RequireCaller;
use crate::models::{Order, SentPayload};
use crate::services::ResourceService;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/{store_id}/orders/{id}/sent", patch(set_sent))
}

/// Toggle the sent flag. Dashboard clients flip the checkbox optimistically
/// and roll back if this returns an error.
async fn set_sent(
    State(state): State<AppState>,
    Path((store_id, order_id)): Path<(StoreId, OrderId)>,
    RequireCaller(caller): RequireCaller,
    payload: Result<Json<SentPayload>, JsonRejection>,
) -> Result<Json<Order>, AppError> {
    let Json(payload) = payload?;
    let order = ResourceService::<Order>::new(state.pool())
        .set_sent(store_id, &caller, order_id, payload)
        .await?;
    Ok(Json(order))
}
