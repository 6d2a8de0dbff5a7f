//! Order-specific operations beyond generic CRUD.

use tracing::{info, instrument};

use storeboard_core::{OrderId, StoreId, UserId};

use super::{ResourceError, ResourceService, guard};
use crate::db::orders;
use crate::models::{Order, SentPayload};
use crate::validation::Validate;

impl ResourceService<'_, Order> {
    /// Mark an order as sent or not sent.
    ///
    /// Only the flag changes; the order must belong to the store in the path.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::Validation` if `isSent` is missing.
    /// Returns `ResourceError::NotFound` if the store or the order does not exist.
    /// Returns `ResourceError::Denied` if the caller is not the owner.
    #[instrument(skip_all, fields(store_id = %store_id, order_id = %id, caller = %caller))]
    pub async fn set_sent(
        &self,
        store_id: StoreId,
        caller: &UserId,
        id: OrderId,
        payload: SentPayload,
    ) -> Result<Order, ResourceError> {
        let is_sent = payload.validate()?;

        let mut tx = self.pool().begin().await?;
        guard::require_owner(&mut tx, caller, store_id).await?;
        let order = orders::set_sent(&mut tx, store_id, id, is_sent)
            .await?
            .ok_or(ResourceError::NotFound("order"))?;
        tx.commit().await?;

        info!(is_sent, "order sent flag updated");
        Ok(order)
    }
}
