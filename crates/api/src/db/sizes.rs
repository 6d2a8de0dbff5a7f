//! Size queries. Sizes are referenced by products and cannot be deleted
//! while any product uses them.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use storeboard_core::{SizeId, StoreId};

use super::RepositoryError;
use crate::models::{NoFilter, Size, SizeDraft, SizePayload};
use crate::services::Resource;

#[derive(Debug, sqlx::FromRow)]
struct SizeRow {
    id: SizeId,
    store_id: StoreId,
    name: String,
    value: String,
    created_at: DateTime<Utc>,
}

impl From<SizeRow> for Size {
    fn from(row: SizeRow) -> Self {
        Self {
            id: row.id,
            store_id: row.store_id,
            name: row.name,
            value: row.value,
            created_at: row.created_at,
        }
    }
}

impl Resource for Size {
    type Id = SizeId;
    type Payload = SizePayload;
    type Draft = SizeDraft;
    type Filter = NoFilter;

    const NAME: &'static str = "size";
    const SEGMENT: &'static str = "sizes";

    fn id(&self) -> SizeId {
        self.id
    }

    async fn list(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        _filter: &NoFilter,
    ) -> Result<Vec<Self>, RepositoryError> {
        let rows: Vec<SizeRow> = sqlx::query_as(
            r"
            SELECT id, store_id, name, value, created_at
            FROM size
            WHERE store_id = ?
            ORDER BY created_at DESC, rowid DESC
            ",
        )
        .bind(store_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        id: SizeId,
    ) -> Result<Option<Self>, RepositoryError> {
        let row: Option<SizeRow> = sqlx::query_as(
            r"
            SELECT id, store_id, name, value, created_at
            FROM size
            WHERE id = ? AND store_id = ?
            ",
        )
        .bind(id)
        .bind(store_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn insert(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        draft: &SizeDraft,
    ) -> Result<Self, RepositoryError> {
        let row: SizeRow = sqlx::query_as(
            r"
            INSERT INTO size (id, store_id, name, value, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, store_id, name, value, created_at
            ",
        )
        .bind(SizeId::generate())
        .bind(store_id)
        .bind(&draft.name)
        .bind(&draft.value)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| RepositoryError::from_write(e, Self::NAME))?;

        Ok(row.into())
    }

    async fn update(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        id: SizeId,
        draft: &SizeDraft,
    ) -> Result<Option<Self>, RepositoryError> {
        let row: Option<SizeRow> = sqlx::query_as(
            r"
            UPDATE size SET name = ?, value = ?
            WHERE id = ? AND store_id = ?
            RETURNING id, store_id, name, value, created_at
            ",
        )
        .bind(&draft.name)
        .bind(&draft.value)
        .bind(id)
        .bind(store_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| RepositoryError::from_write(e, Self::NAME))?;

        Ok(row.map(Into::into))
    }

    async fn referenced_by(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        id: SizeId,
    ) -> Result<Option<&'static str>, RepositoryError> {
        let (used,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM product WHERE size_id = ? AND store_id = ?)",
        )
        .bind(id)
        .bind(store_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(used.then_some("products"))
    }

    async fn delete(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        id: SizeId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM size WHERE id = ? AND store_id = ?")
            .bind(id)
            .bind(store_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| RepositoryError::from_write(e, Self::NAME))?;

        Ok(result.rows_affected())
    }
}
