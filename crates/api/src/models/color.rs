//! Color: a named product attribute whose value is a hex code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storeboard_core::{ColorId, StoreId};

use crate::validation::{Validate, ValidationError, required_text};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    pub id: ColorId,
    pub store_id: StoreId,
    pub name: String,
    /// Hex code such as `#fff` or `#1e90ff`.
    pub value: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorPayload {
    pub name: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorDraft {
    pub name: String,
    pub value: String,
}

impl Validate for ColorPayload {
    type Draft = ColorDraft;

    fn validate(self) -> Result<ColorDraft, ValidationError> {
        let name = required_text("name", self.name)?;
        let value = required_text("value", self.value)?;
        if !value.starts_with('#') || value.len() < 4 {
            return Err(ValidationError::new("value", "must be a valid hex code"));
        }
        Ok(ColorDraft { name, value })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn payload(value: &str) -> ColorPayload {
        ColorPayload {
            name: Some("White".to_string()),
            value: Some(value.to_string()),
        }
    }

    #[test]
    fn test_hex_codes_accepted() {
        assert!(payload("#fff").validate().is_ok());
        assert!(payload("#1e90ff").validate().is_ok());
    }

    #[test]
    fn test_non_hex_rejected() {
        assert_eq!(payload("white").validate().unwrap_err().field, "value");
        assert_eq!(payload("#ff").validate().unwrap_err().field, "value");
    }
}
