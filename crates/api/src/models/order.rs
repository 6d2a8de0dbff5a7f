//! Order: a customer order and its line items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storeboard_core::{OrderId, OrderItemId, Price, ProductId, StoreId};

use crate::validation::{Validate, ValidationError, optional_text, required, required_list};

/// A customer order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub store_id: StoreId,
    pub phone: String,
    pub address: String,
    pub is_paid: bool,
    pub is_sent: bool,
    pub items: Vec<OrderItem>,
    /// Sum of `unit_price * quantity` over all items, as a decimal string.
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// One line of an order, joined with the product it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Price,
    pub quantity: u32,
}

impl Order {
    /// Total of all line items, or `None` if it overflows a `Decimal`.
    #[must_use]
    pub fn total_of(items: &[OrderItem]) -> Option<Decimal> {
        items.iter().try_fold(Decimal::ZERO, |total, item| {
            total.checked_add(item.unit_price.times(item.quantity)?)
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_paid: Option<bool>,
    pub is_sent: Option<bool>,
    pub items: Option<Vec<OrderItemPayload>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    pub product_id: Option<ProductId>,
    pub quantity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub phone: String,
    pub address: String,
    pub is_paid: bool,
    pub is_sent: bool,
    pub items: Vec<OrderItemDraft>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderItemDraft {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl Validate for OrderPayload {
    type Draft = OrderDraft;

    fn validate(self) -> Result<OrderDraft, ValidationError> {
        let items = required_list("items", self.items)?
            .into_iter()
            .map(|item| {
                let product_id = required("items.productId", item.product_id)?;
                let quantity = item.quantity.unwrap_or(1);
                if quantity == 0 {
                    return Err(ValidationError::new("items.quantity", "must be at least 1"));
                }
                Ok(OrderItemDraft {
                    product_id,
                    quantity,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OrderDraft {
            phone: optional_text(self.phone),
            address: optional_text(self.address),
            is_paid: self.is_paid.unwrap_or(false),
            is_sent: self.is_sent.unwrap_or(false),
            items,
        })
    }
}

/// Body of `PATCH /api/{storeId}/orders/{orderId}/sent`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentPayload {
    pub is_sent: Option<bool>,
}

impl Validate for SentPayload {
    type Draft = bool;

    fn validate(self) -> Result<bool, ValidationError> {
        required("isSent", self.is_sent)
    }
}
