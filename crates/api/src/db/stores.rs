//! Store queries.
//!
//! Stores are the ownership root, so unlike the other kinds they are not
//! scoped by a parent store id.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use storeboard_core::{StoreId, UserId};

use super::RepositoryError;
use crate::models::{Store, StoreDraft};

#[derive(Debug, sqlx::FromRow)]
struct StoreRow {
    id: StoreId,
    name: String,
    user_id: UserId,
    created_at: DateTime<Utc>,
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            user_id: row.user_id,
            created_at: row.created_at,
        }
    }
}

/// Resource tables with a `store_id` column, paired with the name reported
/// when a store still owns rows in them.
const CHILD_TABLES: [(&str, &str); 6] = [
    ("billboard", "billboards"),
    ("category", "categories"),
    ("size", "sizes"),
    ("color", "colors"),
    ("product", "products"),
    ("customer_order", "orders"),
];

/// Get a store by ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find(
    conn: &mut SqliteConnection,
    id: StoreId,
) -> Result<Option<Store>, RepositoryError> {
    let row: Option<StoreRow> =
        sqlx::query_as("SELECT id, name, user_id, created_at FROM store WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

    Ok(row.map(Into::into))
}

/// List the stores owned by a user, oldest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_owned(
    conn: &mut SqliteConnection,
    user_id: &UserId,
) -> Result<Vec<Store>, RepositoryError> {
    let rows: Vec<StoreRow> = sqlx::query_as(
        r"
        SELECT id, name, user_id, created_at
        FROM store
        WHERE user_id = ?
        ORDER BY created_at ASC, rowid ASC
        ",
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Insert a new store owned by `user_id`.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert(
    conn: &mut SqliteConnection,
    user_id: &UserId,
    draft: &StoreDraft,
) -> Result<Store, RepositoryError> {
    let row: StoreRow = sqlx::query_as(
        r"
        INSERT INTO store (id, name, user_id, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, name, user_id, created_at
        ",
    )
    .bind(StoreId::generate())
    .bind(&draft.name)
    .bind(user_id)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await?;

    Ok(row.into())
}

/// Rename a store.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the store does not exist.
/// Returns `RepositoryError::Database` if the update fails.
pub async fn rename(
    conn: &mut SqliteConnection,
    id: StoreId,
    draft: &StoreDraft,
) -> Result<Store, RepositoryError> {
    let row: Option<StoreRow> = sqlx::query_as(
        r"
        UPDATE store SET name = ?
        WHERE id = ?
        RETURNING id, name, user_id, created_at
        ",
    )
    .bind(&draft.name)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    row.map(Into::into).ok_or(RepositoryError::NotFound)
}

/// Name of the first resource kind that still has rows in the store.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if a query fails.
pub async fn first_child_kind(
    conn: &mut SqliteConnection,
    id: StoreId,
) -> Result<Option<&'static str>, RepositoryError> {
    for (table, kind) in CHILD_TABLES {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE store_id = ?)");
        let (exists,): (bool,) = sqlx::query_as(&sql).bind(id).fetch_one(&mut *conn).await?;
        if exists {
            return Ok(Some(kind));
        }
    }
    Ok(None)
}

/// Delete a store. Returns the number of rows removed.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if rows still reference the store.
/// Returns `RepositoryError::Database` if the delete fails.
pub async fn delete(conn: &mut SqliteConnection, id: StoreId) -> Result<u64, RepositoryError> {
    let result = sqlx::query("DELETE FROM store WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| RepositoryError::from_write(e, "store"))?;

    Ok(result.rows_affected())
}
