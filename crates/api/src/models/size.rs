//! Size: a named product attribute such as `M` / `42`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storeboard_core::{SizeId, StoreId};

use crate::validation::{Validate, ValidationError, required_text};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Size {
    pub id: SizeId,
    pub store_id: StoreId,
    pub name: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizePayload {
    pub name: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeDraft {
    pub name: String,
    pub value: String,
}

impl Validate for SizePayload {
    type Draft = SizeDraft;

    fn validate(self) -> Result<SizeDraft, ValidationError> {
        Ok(SizeDraft {
            name: required_text("name", self.name)?,
            value: required_text("value", self.value)?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_size() {
        let draft = SizePayload {
            name: Some("M".to_string()),
            value: Some("42".to_string()),
        }
        .validate()
        .unwrap();
        assert_eq!(draft.value, "42");
    }

    #[test]
    fn test_blank_value_rejected() {
        let err = SizePayload {
            name: Some("M".to_string()),
            value: Some(String::new()),
        }
        .validate()
        .unwrap_err();
        assert_eq!(err, ValidationError::new("value", "must not be empty"));
    }
}
