//! Product: a catalog item with an ordered list of images.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storeboard_core::{CategoryId, ColorId, ImageId, Price, ProductId, SizeId, StoreId};

use crate::validation::{
    Validate, ValidationError, required, required_list, required_price, required_text,
};

/// A sellable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub store_id: StoreId,
    pub category_id: CategoryId,
    pub size_id: SizeId,
    pub color_id: ColorId,
    pub name: String,
    /// Serialized as a decimal string.
    pub price: Price,
    /// Shown on the storefront home page.
    pub is_featured: bool,
    /// Hidden from the storefront but kept for existing orders.
    pub is_archived: bool,
    /// Images in display order.
    pub images: Vec<Image>,
    pub created_at: DateTime<Utc>,
}

/// A product image. Position is the index in [`Product::images`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: ImageId,
    pub product_id: ProductId,
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub category_id: Option<CategoryId>,
    pub color_id: Option<ColorId>,
    pub size_id: Option<SizeId>,
    pub images: Option<Vec<ImagePayload>>,
    pub is_featured: Option<bool>,
    pub is_archived: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImagePayload {
    pub url: Option<String>,
}

/// Validated product fields. `images` holds the URLs in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub price: Price,
    pub category_id: CategoryId,
    pub color_id: ColorId,
    pub size_id: SizeId,
    pub images: Vec<String>,
    pub is_featured: bool,
    pub is_archived: bool,
}

impl Validate for ProductPayload {
    type Draft = ProductDraft;

    fn validate(self) -> Result<ProductDraft, ValidationError> {
        let name = required_text("name", self.name)?;
        let price = required_price("price", self.price)?;
        let category_id = required("categoryId", self.category_id)?;
        let color_id = required("colorId", self.color_id)?;
        let size_id = required("sizeId", self.size_id)?;
        let images = required_list("images", self.images)?
            .into_iter()
            .map(|image| required_text("images.url", image.url))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ProductDraft {
            name,
            price,
            category_id,
            color_id,
            size_id,
            images,
            is_featured: self.is_featured.unwrap_or(false),
            is_archived: self.is_archived.unwrap_or(false),
        })
    }
}

/// Query parameters accepted by the product list.
///
/// `GET /api/{storeId}/products?categoryId=..&isFeatured=true`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    pub category_id: Option<CategoryId>,
    pub color_id: Option<ColorId>,
    pub size_id: Option<SizeId>,
    pub is_featured: Option<bool>,
    pub is_archived: Option<bool>,
}
