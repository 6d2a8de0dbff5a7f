//! Store: the tenant that owns every other resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storeboard_core::{StoreId, UserId};

use crate::validation::{Validate, ValidationError, required_text};

/// A store owned by a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    /// Unique store ID.
    pub id: StoreId,
    /// Display name.
    pub name: String,
    /// Identity of the owner; the only caller allowed to mutate the store.
    pub user_id: UserId,
    /// When the store was created.
    pub created_at: DateTime<Utc>,
}

/// Create/rename request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePayload {
    pub name: Option<String>,
}

/// Validated store fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreDraft {
    pub name: String,
}

impl Validate for StorePayload {
    type Draft = StoreDraft;

    fn validate(self) -> Result<StoreDraft, ValidationError> {
        Ok(StoreDraft {
            name: required_text("name", self.name)?,
        })
    }
}
