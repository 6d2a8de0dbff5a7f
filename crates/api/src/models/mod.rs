//! Domain models for the store and its resources.
//!
//! Each module holds three shapes of the same entity:
//!
//! - the entity itself, serialized to clients in camelCase
//! - a `*Payload` as it arrives over the wire (every field optional)
//! - a `*Draft` produced by [`Validate`](crate::validation::Validate), which is
//!   what the database layer writes

pub mod billboard;
pub mod category;
pub mod color;
pub mod order;
pub mod product;
pub mod size;
pub mod store;

use serde::Deserialize;

pub use billboard::{Billboard, BillboardDraft, BillboardPayload};
pub use category::{Category, CategoryDraft, CategoryPayload};
pub use color::{Color, ColorDraft, ColorPayload};
pub use order::{
    Order, OrderDraft, OrderItem, OrderItemDraft, OrderItemPayload, OrderPayload, SentPayload,
};
pub use product::{Image, ImagePayload, Product, ProductDraft, ProductFilter, ProductPayload};
pub use size::{Size, SizeDraft, SizePayload};
pub use store::{Store, StoreDraft, StorePayload};

/// List filter for kinds that take no query parameters.
///
/// Unknown query parameters are ignored.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct NoFilter {}
