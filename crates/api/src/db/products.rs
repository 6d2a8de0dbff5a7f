//! Product queries.
//!
//! A product owns its images. Images are written in the same transaction as
//! the product, replaced as a whole when the URL list changes, and removed
//! with the product by `ON DELETE CASCADE`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use storeboard_core::{CategoryId, ColorId, ImageId, Price, ProductId, SizeId, StoreId};

use super::{RepositoryError, exists_in_store};
use crate::models::{Image, Product, ProductDraft, ProductFilter, ProductPayload};
use crate::services::{Resource, ResourceError};
use crate::validation::ValidationError;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    store_id: StoreId,
    category_id: CategoryId,
    size_id: SizeId,
    color_id: ColorId,
    name: String,
    price: String,
    is_featured: bool,
    is_archived: bool,
    created_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self, images: Vec<Image>) -> Result<Product, RepositoryError> {
        let price: Price = self.price.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price for product {}: {e}", self.id))
        })?;

        Ok(Product {
            id: self.id,
            store_id: self.store_id,
            category_id: self.category_id,
            size_id: self.size_id,
            color_id: self.color_id,
            name: self.name,
            price,
            is_featured: self.is_featured,
            is_archived: self.is_archived,
            images,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ImageRow {
    id: ImageId,
    product_id: ProductId,
    url: String,
}

impl From<ImageRow> for Image {
    fn from(row: ImageRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            url: row.url,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, store_id, category_id, size_id, color_id, name, price, \
     is_featured, is_archived, created_at";

// =============================================================================
// Images
// =============================================================================

async fn images_of(
    conn: &mut SqliteConnection,
    product_id: ProductId,
) -> Result<Vec<Image>, RepositoryError> {
    let rows: Vec<ImageRow> = sqlx::query_as(
        "SELECT id, product_id, url FROM product_image WHERE product_id = ? ORDER BY position",
    )
    .bind(product_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Images of every product in the store, grouped by product.
async fn images_in_store(
    conn: &mut SqliteConnection,
    store_id: StoreId,
) -> Result<HashMap<ProductId, Vec<Image>>, RepositoryError> {
    let rows: Vec<ImageRow> = sqlx::query_as(
        r"
        SELECT i.id, i.product_id, i.url
        FROM product_image i
        JOIN product p ON p.id = i.product_id
        WHERE p.store_id = ?
        ORDER BY i.product_id, i.position
        ",
    )
    .bind(store_id)
    .fetch_all(&mut *conn)
    .await?;

    let mut grouped: HashMap<ProductId, Vec<Image>> = HashMap::new();
    for row in rows {
        grouped.entry(row.product_id).or_default().push(row.into());
    }
    Ok(grouped)
}

/// Replace a product's images with `urls`, in order.
async fn replace_images(
    conn: &mut SqliteConnection,
    product_id: ProductId,
    urls: &[String],
) -> Result<(), RepositoryError> {
    sqlx::query("DELETE FROM product_image WHERE product_id = ?")
        .bind(product_id)
        .execute(&mut *conn)
        .await?;

    let now = Utc::now();
    for (position, url) in (0_i64..).zip(urls) {
        sqlx::query(
            r"
            INSERT INTO product_image (id, product_id, position, url, created_at)
            VALUES (?, ?, ?, ?, ?)
            ",
        )
        .bind(ImageId::generate())
        .bind(product_id)
        .bind(position)
        .bind(url)
        .bind(now)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

// =============================================================================
// Resource
// =============================================================================

impl Resource for Product {
    type Id = ProductId;
    type Payload = ProductPayload;
    type Draft = ProductDraft;
    type Filter = ProductFilter;

    const NAME: &'static str = "product";
    const SEGMENT: &'static str = "products";

    fn id(&self) -> ProductId {
        self.id
    }

    async fn list(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        filter: &ProductFilter,
    ) -> Result<Vec<Self>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM product
            WHERE store_id = ?1
              AND (?2 IS NULL OR category_id = ?2)
              AND (?3 IS NULL OR color_id = ?3)
              AND (?4 IS NULL OR size_id = ?4)
              AND (?5 IS NULL OR is_featured = ?5)
              AND (?6 IS NULL OR is_archived = ?6)
            ORDER BY created_at DESC, rowid DESC
            "
        );
        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(store_id)
            .bind(filter.category_id)
            .bind(filter.color_id)
            .bind(filter.size_id)
            .bind(filter.is_featured)
            .bind(filter.is_archived)
            .fetch_all(&mut *conn)
            .await?;

        let mut images = images_in_store(&mut *conn, store_id).await?;
        rows.into_iter()
            .map(|row| {
                let own = images.remove(&row.id).unwrap_or_default();
                row.into_product(own)
            })
            .collect()
    }

    async fn find(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        id: ProductId,
    ) -> Result<Option<Self>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE id = ? AND store_id = ?");
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(store_id)
            .fetch_optional(&mut *conn)
            .await?;

        match row {
            Some(row) => {
                let images = images_of(&mut *conn, row.id).await?;
                row.into_product(images).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn check_references(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        draft: &ProductDraft,
    ) -> Result<(), ResourceError> {
        let references = [
            ("category", "categoryId", draft.category_id.as_uuid()),
            ("color", "colorId", draft.color_id.as_uuid()),
            ("size", "sizeId", draft.size_id.as_uuid()),
        ];
        for (table, field, id) in references {
            if !exists_in_store(&mut *conn, table, id, store_id).await? {
                return Err(ValidationError::new(field, "does not exist in this store").into());
            }
        }
        Ok(())
    }

    async fn insert(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        draft: &ProductDraft,
    ) -> Result<Self, RepositoryError> {
        let id = ProductId::generate();
        sqlx::query(
            r"
            INSERT INTO product
                (id, store_id, category_id, size_id, color_id, name, price,
                 is_featured, is_archived, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(id)
        .bind(store_id)
        .bind(draft.category_id)
        .bind(draft.size_id)
        .bind(draft.color_id)
        .bind(&draft.name)
        .bind(draft.price.to_string())
        .bind(draft.is_featured)
        .bind(draft.is_archived)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await
        .map_err(|e| RepositoryError::from_write(e, Self::NAME))?;

        replace_images(&mut *conn, id, &draft.images).await?;

        Self::find(&mut *conn, store_id, id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn update(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Option<Self>, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE product
            SET category_id = ?, size_id = ?, color_id = ?, name = ?, price = ?,
                is_featured = ?, is_archived = ?
            WHERE id = ? AND store_id = ?
            ",
        )
        .bind(draft.category_id)
        .bind(draft.size_id)
        .bind(draft.color_id)
        .bind(&draft.name)
        .bind(draft.price.to_string())
        .bind(draft.is_featured)
        .bind(draft.is_archived)
        .bind(id)
        .bind(store_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| RepositoryError::from_write(e, Self::NAME))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let current: Vec<String> = images_of(&mut *conn, id)
            .await?
            .into_iter()
            .map(|image| image.url)
            .collect();
        if current != draft.images {
            replace_images(&mut *conn, id, &draft.images).await?;
        }

        Self::find(&mut *conn, store_id, id).await
    }

    async fn referenced_by(
        conn: &mut SqliteConnection,
        _store_id: StoreId,
        id: ProductId,
    ) -> Result<Option<&'static str>, RepositoryError> {
        let (used,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM order_item WHERE product_id = ?)")
                .bind(id)
                .fetch_one(&mut *conn)
                .await?;

        Ok(used.then_some("orders"))
    }

    async fn delete(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        id: ProductId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = ? AND store_id = ?")
            .bind(id)
            .bind(store_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| RepositoryError::from_write(e, Self::NAME))?;

        Ok(result.rows_affected())
    }
}
