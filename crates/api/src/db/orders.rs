//! Order queries.
//!
//! Items are read joined with their product so the order view can show the
//! product name and compute the total from the current product price.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::SqliteConnection;

use storeboard_core::{OrderId, OrderItemId, Price, ProductId, StoreId};

use super::RepositoryError;
use crate::models::{NoFilter, Order, OrderDraft, OrderItem, OrderItemDraft, OrderPayload};
use crate::services::{Resource, ResourceError};
use crate::validation::ValidationError;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    store_id: StoreId,
    phone: String,
    address: String,
    is_paid: bool,
    is_sent: bool,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Result<Order, RepositoryError> {
        let total_price = Order::total_of(&items).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("total of order {} overflows", self.id))
        })?;
        Ok(Order {
            id: self.id,
            store_id: self.store_id,
            phone: self.phone,
            address: self.address,
            is_paid: self.is_paid,
            is_sent: self.is_sent,
            total_price,
            items,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: OrderItemId,
    order_id: OrderId,
    product_id: ProductId,
    product_name: String,
    price: String,
    quantity: u32,
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = RepositoryError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        let unit_price: Price = row.price.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!(
                "invalid price for product {}: {e}",
                row.product_id
            ))
        })?;

        Ok(Self {
            id: row.id,
            product_id: row.product_id,
            product_name: row.product_name,
            unit_price,
            quantity: row.quantity,
        })
    }
}

const ORDER_COLUMNS: &str = "id, store_id, phone, address, is_paid, is_sent, created_at";

const ITEM_SELECT: &str = r"
    SELECT oi.id, oi.order_id, oi.product_id, p.name AS product_name, p.price, oi.quantity
    FROM order_item oi
    JOIN product p ON p.id = oi.product_id
";

// =============================================================================
// Items
// =============================================================================

async fn items_of(
    conn: &mut SqliteConnection,
    order_id: OrderId,
) -> Result<Vec<OrderItem>, RepositoryError> {
    let sql = format!("{ITEM_SELECT} WHERE oi.order_id = ? ORDER BY oi.rowid");
    let rows: Vec<OrderItemRow> = sqlx::query_as(&sql)
        .bind(order_id)
        .fetch_all(&mut *conn)
        .await?;

    rows.into_iter().map(TryInto::try_into).collect()
}

async fn items_in_store(
    conn: &mut SqliteConnection,
    store_id: StoreId,
) -> Result<HashMap<OrderId, Vec<OrderItem>>, RepositoryError> {
    let sql = format!(
        "{ITEM_SELECT} JOIN customer_order o ON o.id = oi.order_id \
         WHERE o.store_id = ? ORDER BY oi.rowid"
    );
    let rows: Vec<OrderItemRow> = sqlx::query_as(&sql)
        .bind(store_id)
        .fetch_all(&mut *conn)
        .await?;

    let mut grouped: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
    for row in rows {
        let order_id = row.order_id;
        grouped.entry(order_id).or_default().push(row.try_into()?);
    }
    Ok(grouped)
}

/// Replace an order's items, unless they already match the draft.
///
/// Leaving matching items alone keeps their ids stable across repeated
/// updates.
async fn sync_items(
    conn: &mut SqliteConnection,
    order_id: OrderId,
    items: &[OrderItemDraft],
) -> Result<(), RepositoryError> {
    let current: Vec<OrderItemDraft> = items_of(&mut *conn, order_id)
        .await?
        .into_iter()
        .map(|item| OrderItemDraft {
            product_id: item.product_id,
            quantity: item.quantity,
        })
        .collect();
    if current == items {
        return Ok(());
    }

    sqlx::query("DELETE FROM order_item WHERE order_id = ?")
        .bind(order_id)
        .execute(&mut *conn)
        .await?;

    for item in items {
        sqlx::query(
            "INSERT INTO order_item (id, order_id, product_id, quantity) VALUES (?, ?, ?, ?)",
        )
            .bind(OrderItemId::generate())
            .bind(order_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .execute(&mut *conn)
            .await
            .map_err(|e| RepositoryError::from_write(e, "order item"))?;
    }
    Ok(())
}

/// Set only the `is_sent` flag of an order in the store.
///
/// Returns `None` if the order does not belong to the store.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the update fails.
pub async fn set_sent(
    conn: &mut SqliteConnection,
    store_id: StoreId,
    id: OrderId,
    is_sent: bool,
) -> Result<Option<Order>, RepositoryError> {
    let result = sqlx::query("UPDATE customer_order SET is_sent = ? WHERE id = ? AND store_id = ?")
        .bind(is_sent)
        .bind(id)
        .bind(store_id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    Order::find(conn, store_id, id).await
}

// =============================================================================
// Resource
// =============================================================================

impl Resource for Order {
    type Id = OrderId;
    type Payload = OrderPayload;
    type Draft = OrderDraft;
    type Filter = NoFilter;

    const NAME: &'static str = "order";
    const SEGMENT: &'static str = "orders";

    fn id(&self) -> OrderId {
        self.id
    }

    async fn list(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        _filter: &NoFilter,
    ) -> Result<Vec<Self>, RepositoryError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM customer_order \
             WHERE store_id = ? ORDER BY created_at DESC, rowid DESC"
        );
        let rows: Vec<OrderRow> = sqlx::query_as(&sql)
            .bind(store_id)
            .fetch_all(&mut *conn)
            .await?;

        let mut items = items_in_store(&mut *conn, store_id).await?;
        rows.into_iter()
            .map(|row| {
                let own = items.remove(&row.id).unwrap_or_default();
                row.into_order(own)
            })
            .collect()
    }

    async fn find(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        id: OrderId,
    ) -> Result<Option<Self>, RepositoryError> {
        let sql =
            format!("SELECT {ORDER_COLUMNS} FROM customer_order WHERE id = ? AND store_id = ?");
        let row: Option<OrderRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(store_id)
            .fetch_optional(&mut *conn)
            .await?;

        match row {
            Some(row) => {
                let items = items_of(&mut *conn, row.id).await?;
                row.into_order(items).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn check_references(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        draft: &OrderDraft,
    ) -> Result<(), ResourceError> {
        let mut total = Decimal::ZERO;
        for item in &draft.items {
            let price: Option<(String,)> =
                sqlx::query_as("SELECT price FROM product WHERE id = ? AND store_id = ?")
                    .bind(item.product_id)
                    .bind(store_id)
                    .fetch_optional(&mut *conn)
                    .await?;
            let Some((price,)) = price else {
                return Err(
                    ValidationError::new("items.productId", "does not exist in this store").into(),
                );
            };
            let price: Price = price.parse().map_err(|e| {
                RepositoryError::DataCorruption(format!(
                    "invalid price for product {}: {e}",
                    item.product_id
                ))
            })?;

            // The total must stay representable or the order cannot be read back.
            total = price
                .times(item.quantity)
                .and_then(|line| total.checked_add(line))
                .ok_or_else(|| {
                    ValidationError::new("items.quantity", "makes the order total too large")
                })?;
        }
        Ok(())
    }

    async fn insert(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        draft: &OrderDraft,
    ) -> Result<Self, RepositoryError> {
        let id = OrderId::generate();
        sqlx::query(
            r"
            INSERT INTO customer_order (id, store_id, phone, address, is_paid, is_sent, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(id)
        .bind(store_id)
        .bind(&draft.phone)
        .bind(&draft.address)
        .bind(draft.is_paid)
        .bind(draft.is_sent)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await
        .map_err(|e| RepositoryError::from_write(e, Self::NAME))?;

        sync_items(&mut *conn, id, &draft.items).await?;

        Self::find(&mut *conn, store_id, id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn update(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        id: OrderId,
        draft: &OrderDraft,
    ) -> Result<Option<Self>, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE customer_order
            SET phone = ?, address = ?, is_paid = ?, is_sent = ?
            WHERE id = ? AND store_id = ?
            ",
        )
        .bind(&draft.phone)
        .bind(&draft.address)
        .bind(draft.is_paid)
        .bind(draft.is_sent)
        .bind(id)
        .bind(store_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| RepositoryError::from_write(e, Self::NAME))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        sync_items(&mut *conn, id, &draft.items).await?;
        Self::find(&mut *conn, store_id, id).await
    }

    async fn delete(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        id: OrderId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM customer_order WHERE id = ? AND store_id = ?")
            .bind(id)
            .bind(store_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| RepositoryError::from_write(e, Self::NAME))?;

        Ok(result.rows_affected())
    }
}
