//! Store service.
//!
//! Any signed-in user may create a store and becomes its owner. Only the
//! owner may rename or delete it.

use sqlx::SqlitePool;
use tracing::{info, instrument, warn};

use storeboard_core::{StoreId, UserId};

use super::{ResourceError, guard};
use crate::db::stores;
use crate::models::{Store, StorePayload};
use crate::validation::Validate;

/// Store lifecycle operations.
pub struct StoreService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> StoreService<'a> {
    /// Create a new store service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a store owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::Validation` if the name is missing or blank.
    #[instrument(skip_all, fields(caller = %caller))]
    pub async fn create(
        &self,
        caller: &UserId,
        payload: StorePayload,
    ) -> Result<Store, ResourceError> {
        let draft = payload.validate()?;
        let mut conn = self.pool.acquire().await?;
        let store = stores::insert(&mut conn, caller, &draft).await?;

        info!(store_id = %store.id, "store created");
        Ok(store)
    }

    /// Stores owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::Repository` if the query fails.
    #[instrument(skip_all, fields(caller = %caller))]
    pub async fn list_owned(&self, caller: &UserId) -> Result<Vec<Store>, ResourceError> {
        let mut conn = self.pool.acquire().await?;
        Ok(stores::list_owned(&mut conn, caller).await?)
    }

    /// Get a store. Public.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::NotFound` if the store does not exist.
    #[instrument(skip(self))]
    pub async fn get(&self, id: StoreId) -> Result<Store, ResourceError> {
        let mut conn = self.pool.acquire().await?;
        stores::find(&mut conn, id)
            .await?
            .ok_or(ResourceError::NotFound("store"))
    }

    /// Rename a store.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::Validation` if the name is missing or blank.
    /// Returns `ResourceError::NotFound` if the store does not exist.
    /// Returns `ResourceError::Denied` if the caller is not the owner.
    #[instrument(skip_all, fields(store_id = %id, caller = %caller))]
    pub async fn rename(
        &self,
        id: StoreId,
        caller: &UserId,
        payload: StorePayload,
    ) -> Result<Store, ResourceError> {
        let draft = payload.validate()?;

        let mut tx = self.pool.begin().await?;
        guard::require_owner(&mut tx, caller, id).await?;
        let store = stores::rename(&mut tx, id, &draft).await?;
        tx.commit().await?;

        info!("store renamed");
        Ok(store)
    }

    /// Delete an empty store.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::NotFound` if the store does not exist.
    /// Returns `ResourceError::Denied` if the caller is not the owner.
    /// Returns `ResourceError::Conflict` while the store still owns resources.
    #[instrument(skip_all, fields(store_id = %id, caller = %caller))]
    pub async fn delete(&self, id: StoreId, caller: &UserId) -> Result<u64, ResourceError> {
        let mut tx = self.pool.begin().await?;
        guard::require_owner(&mut tx, caller, id).await?;

        if let Some(kind) = stores::first_child_kind(&mut tx, id).await? {
            warn!(kind, "store still has resources, delete rejected");
            return Err(ResourceError::Conflict(format!(
                "store still has {kind}; remove all products and categories first"
            )));
        }

        let count = stores::delete(&mut tx, id).await?;
        tx.commit().await?;

        info!("store deleted");
        Ok(count)
    }
}
