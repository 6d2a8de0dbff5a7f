//! Store management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a store owned by an identity
//! sb-cli store create -n "Acme Outfitters" -o user_2abc
//!
//! # List the stores an identity owns
//! sb-cli store list -o user_2abc
//! ```

use storeboard_api::models::{Store, StorePayload};
use storeboard_api::services::StoreService;
use storeboard_core::UserId;
use tracing::info;

use super::{CommandError, connect};

/// Create a store owned by `owner`.
///
/// # Errors
///
/// Returns `CommandError::Resource` if the name is rejected.
pub async fn create(name: &str, owner: &UserId) -> Result<Store, CommandError> {
    let pool = connect().await?;

    let store = StoreService::new(&pool)
        .create(
            owner,
            StorePayload {
                name: Some(name.to_owned()),
            },
        )
        .await?;

    info!(store_id = %store.id, name = %store.name, "Store created");
    Ok(store)
}

/// List the stores owned by `owner`, oldest first.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or the query fails.
pub async fn list(owner: &UserId) -> Result<Vec<Store>, CommandError> {
    let pool = connect().await?;

    let stores = StoreService::new(&pool).list_owned(owner).await?;
    if stores.is_empty() {
        info!(owner = %owner, "No stores");
    }
    for store in &stores {
        info!(store_id = %store.id, name = %store.name, created_at = %store.created_at, "Store");
    }
    Ok(stores)
}
