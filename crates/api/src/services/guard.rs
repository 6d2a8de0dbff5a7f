//! Ownership guard.
//!
//! A caller may mutate a store's resources only if they own the store. The
//! check runs on the caller's transaction so the store cannot change owner
//! between the check and the write.

use sqlx::SqliteConnection;
use tracing::warn;

use storeboard_core::{StoreId, UserId};

use super::ResourceError;
use crate::db::{RepositoryError, stores};
use crate::models::Store;

/// Outcome of an ownership check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// The caller owns the store.
    Allowed(Store),
    /// The store exists but belongs to someone else.
    Denied,
}

/// Decide whether `caller` may mutate `store_id`.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the store does not exist.
/// Returns `RepositoryError::Database` if the lookup fails.
pub async fn authorize(
    conn: &mut SqliteConnection,
    caller: &UserId,
    store_id: StoreId,
) -> Result<Access, RepositoryError> {
    let store = stores::find(conn, store_id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    if store.user_id == *caller {
        Ok(Access::Allowed(store))
    } else {
        Ok(Access::Denied)
    }
}

/// [`authorize`], with denial and a missing store turned into errors.
///
/// # Errors
///
/// Returns `ResourceError::NotFound` if the store does not exist.
/// Returns `ResourceError::Denied` if the caller is not the owner.
pub async fn require_owner(
    conn: &mut SqliteConnection,
    caller: &UserId,
    store_id: StoreId,
) -> Result<Store, ResourceError> {
    match authorize(conn, caller, store_id).await {
        Ok(Access::Allowed(store)) => Ok(store),
        Ok(Access::Denied) => {
            warn!(%caller, %store_id, "Mutation denied: caller does not own store");
            Err(ResourceError::Denied)
        }
        Err(RepositoryError::NotFound) => Err(ResourceError::NotFound("store")),
        Err(e) => Err(e.into()),
    }
}
