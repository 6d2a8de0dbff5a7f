//! Billboard: a hero banner shown on category pages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storeboard_core::{BillboardId, StoreId};

use crate::validation::{Validate, ValidationError, required_text};

/// A labelled banner image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Billboard {
    pub id: BillboardId,
    pub store_id: StoreId,
    pub label: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillboardPayload {
    pub label: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillboardDraft {
    pub label: String,
    pub image_url: String,
}

impl Validate for BillboardPayload {
    type Draft = BillboardDraft;

    fn validate(self) -> Result<BillboardDraft, ValidationError> {
        Ok(BillboardDraft {
            label: required_text("label", self.label)?,
            image_url: required_text("imageUrl", self.image_url)?,
        })
    }
}
