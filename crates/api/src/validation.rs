//! Payload validation.
//!
//! Payload structs deserialize every field as optional so that a missing
//! field is reported the same way as an empty one: as a [`ValidationError`]
//! naming the first field that failed. A successful [`Validate::validate`]
//! returns the typed draft that storage accepts.

use rust_decimal::Decimal;
use storeboard_core::Price;
use thiserror::Error;

/// A payload field failed its schema check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {message}")]
pub struct ValidationError {
    /// Client-facing (camelCase) field name.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    /// Create a validation error for a field.
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// The field was absent from the payload.
    #[must_use]
    pub fn required(field: &'static str) -> Self {
        Self::new(field, "is required")
    }
}

/// Turn an unchecked payload into a validated draft.
pub trait Validate {
    /// The validated form of the payload.
    type Draft;

    /// Check every field in declaration order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    fn validate(self) -> Result<Self::Draft, ValidationError>;
}

/// A required string with at least one non-whitespace character.
///
/// The value is trimmed.
///
/// # Errors
///
/// Returns a `ValidationError` if the value is missing or blank.
pub fn required_text(
    field: &'static str,
    value: Option<String>,
) -> Result<String, ValidationError> {
    let value = value.ok_or_else(|| ValidationError::required(field))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(trimmed.to_owned())
}

/// An explicitly optional string; missing becomes empty.
#[must_use]
pub fn optional_text(value: Option<String>) -> String {
    value.map(|v| v.trim().to_owned()).unwrap_or_default()
}

/// A required value of any type.
///
/// # Errors
///
/// Returns a `ValidationError` if the value is missing.
pub fn required<T>(field: &'static str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::required(field))
}

/// A required, strictly positive price.
///
/// # Errors
///
/// Returns a `ValidationError` if the value is missing, zero, or negative.
pub fn required_price(
    field: &'static str,
    value: Option<Decimal>,
) -> Result<Price, ValidationError> {
    let amount = required(field, value)?;
    Price::new(amount).map_err(|_| ValidationError::new(field, "must be greater than zero"))
}

/// A required list with at least one element.
///
/// # Errors
///
/// Returns a `ValidationError` if the list is missing or empty.
pub fn required_list<T>(
    field: &'static str,
    value: Option<Vec<T>>,
) -> Result<Vec<T>, ValidationError> {
    let items = required(field, value)?;
    if items.is_empty() {
        return Err(ValidationError::new(field, "must contain at least one entry"));
    }
    Ok(items)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_trims() {
        assert_eq!(
            required_text("name", Some("  Acme ".to_string())).unwrap(),
            "Acme"
        );
    }

    #[test]
    fn test_required_text_missing() {
        let err = required_text("name", None).unwrap_err();
        assert_eq!(err.field, "name");
        assert_eq!(err.to_string(), "name is required");
    }

    #[test]
    fn test_required_text_blank() {
        let err = required_text("label", Some("   ".to_string())).unwrap_err();
        assert_eq!(err, ValidationError::new("label", "must not be empty"));
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(None), "");
        assert_eq!(optional_text(Some(" 555-0100 ".to_string())), "555-0100");
    }

    #[test]
    fn test_required_price() {
        assert!(required_price("price", Some(Decimal::new(1, 0))).is_ok());
        assert_eq!(
            required_price("price", None).unwrap_err().field,
            "price"
        );
        let err = required_price("price", Some(Decimal::ZERO)).unwrap_err();
        assert_eq!(err.to_string(), "price must be greater than zero");
    }

    #[test]
    fn test_required_list() {
        assert_eq!(required_list("images", Some(vec![1])).unwrap(), vec![1]);
        assert!(required_list::<u8>("images", Some(vec![])).is_err());
        assert!(required_list::<u8>("images", None).is_err());
    }
}
