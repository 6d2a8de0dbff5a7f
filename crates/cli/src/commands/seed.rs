//! Seed a store with a small demo catalog.
//!
//! Everything goes through the same services as the HTTP API, so the seed
//! is subject to ownership and validation checks like any other write.
//!
//! # Usage
//!
//! ```bash
//! sb-cli seed -s 0b6c2b9e-5c1f-4a4e-8d7a-0f5e2f1d9c11 -o user_2abc
//! ```

use rust_decimal::Decimal;
use sqlx::SqlitePool;
use storeboard_api::models::{
    Billboard, BillboardPayload, Category, CategoryPayload, Color, ColorPayload, ImagePayload,
    Order, OrderItemPayload, OrderPayload, Product, ProductPayload, Size, SizePayload,
};
use storeboard_api::services::{ResourceService, StoreService};
use storeboard_core::{StoreId, UserId};
use tracing::info;

use super::{CommandError, connect};

const SIZES: [(&str, &str); 3] = [("Small", "S"), ("Medium", "M"), ("Large", "L")];
/// Product price in cents for each size, smallest first.
const PRICES: [i64; 3] = [1999, 2199, 2399];
const COLORS: [(&str, &str); 2] = [("Black", "#000000"), ("White", "#ffffff")];

/// Seed the store with a billboard, a category, sizes, colors, one product
/// per size/color pair and a sample order.
///
/// # Errors
///
/// Returns `CommandError::Resource` if the store does not exist or is not
/// owned by `owner`.
pub async fn demo_catalog(store_id: StoreId, owner: &UserId) -> Result<(), CommandError> {
    let pool = connect().await?;

    // Fail early with NotFound rather than on the first insert.
    StoreService::new(&pool).get(store_id).await?;

    let billboard = ResourceService::<Billboard>::new(&pool)
        .create(
            store_id,
            owner,
            BillboardPayload {
                label: Some("New season".to_owned()),
                image_url: Some("https://images.example.com/billboards/new-season.jpg".to_owned()),
            },
        )
        .await?;

    let category = ResourceService::<Category>::new(&pool)
        .create(
            store_id,
            owner,
            CategoryPayload {
                name: Some("Shirts".to_owned()),
                billboard_id: Some(billboard.id),
            },
        )
        .await?;

    let sizes = create_sizes(&pool, store_id, owner).await?;
    let colors = create_colors(&pool, store_id, owner).await?;

    let products = ResourceService::<Product>::new(&pool);
    let mut created = Vec::new();
    for (i, (size, cents)) in sizes.iter().zip(PRICES).enumerate() {
        for color in &colors {
            let product = products
                .create(
                    store_id,
                    owner,
                    ProductPayload {
                        name: Some(format!("Classic tee ({}, {})", size.value, color.name)),
                        price: Some(Decimal::new(cents, 2)),
                        category_id: Some(category.id),
                        color_id: Some(color.id),
                        size_id: Some(size.id),
                        images: Some(vec![ImagePayload {
                            url: Some(format!(
                                "https://images.example.com/products/tee-{}-{}.jpg",
                                size.value.to_lowercase(),
                                color.name.to_lowercase()
                            )),
                        }]),
                        is_featured: Some(i == 0),
                        is_archived: Some(false),
                    },
                )
                .await?;
            created.push(product);
        }
    }

    let items = created
        .iter()
        .take(2)
        .map(|product| OrderItemPayload {
            product_id: Some(product.id),
            quantity: Some(1),
        })
        .collect();
    let order = ResourceService::<Order>::new(&pool)
        .create(
            store_id,
            owner,
            OrderPayload {
                phone: Some("555-0100".to_owned()),
                address: Some("1 Market Street".to_owned()),
                is_paid: Some(true),
                is_sent: Some(false),
                items: Some(items),
            },
        )
        .await?;

    info!(
        store_id = %store_id,
        products = created.len(),
        order_id = %order.id,
        total = %order.total_price,
        "Demo catalog seeded"
    );
    Ok(())
}

async fn create_sizes(
    pool: &SqlitePool,
    store_id: StoreId,
    owner: &UserId,
) -> Result<Vec<Size>, CommandError> {
    let service = ResourceService::<Size>::new(pool);
    let mut sizes = Vec::with_capacity(SIZES.len());
    for (name, value) in SIZES {
        let payload = SizePayload {
            name: Some(name.to_owned()),
            value: Some(value.to_owned()),
        };
        sizes.push(service.create(store_id, owner, payload).await?);
    }
    Ok(sizes)
}

async fn create_colors(
    pool: &SqlitePool,
    store_id: StoreId,
    owner: &UserId,
) -> Result<Vec<Color>, CommandError> {
    let service = ResourceService::<Color>::new(pool);
    let mut colors = Vec::with_capacity(COLORS.len());
    for (name, value) in COLORS {
        let payload = ColorPayload {
            name: Some(name.to_owned()),
            value: Some(value.to_owned()),
        };
        colors.push(service.create(store_id, owner, payload).await?);
    }
    Ok(colors)
}
