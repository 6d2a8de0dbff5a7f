//! Category: groups products and points at the billboard shown above them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storeboard_core::{BillboardId, CategoryId, StoreId};

use crate::validation::{Validate, ValidationError, required, required_text};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub store_id: StoreId,
    pub billboard_id: BillboardId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    pub name: Option<String>,
    pub billboard_id: Option<BillboardId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub billboard_id: BillboardId,
}

impl Validate for CategoryPayload {
    type Draft = CategoryDraft;

    fn validate(self) -> Result<CategoryDraft, ValidationError> {
        Ok(CategoryDraft {
            name: required_text("name", self.name)?,
            billboard_id: required("billboardId", self.billboard_id)?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_first_failing_field_wins() {
        let err = CategoryPayload::default().validate().unwrap_err();
        assert_eq!(err.field, "name");

        let err = CategoryPayload {
            name: Some("Shirts".to_string()),
            billboard_id: None,
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field, "billboardId");
    }
}
