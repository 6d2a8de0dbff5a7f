//! Color queries.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use storeboard_core::{ColorId, StoreId};

use super::RepositoryError;
use crate::models::{Color, ColorDraft, ColorPayload, NoFilter};
use crate::services::Resource;

#[derive(Debug, sqlx::FromRow)]
struct ColorRow {
    id: ColorId,
    store_id: StoreId,
    name: String,
    value: String,
    created_at: DateTime<Utc>,
}

impl From<ColorRow> for Color {
    fn from(row: ColorRow) -> Self {
        Self {
            id: row.id,
            store_id: row.store_id,
            name: row.name,
            value: row.value,
            created_at: row.created_at,
        }
    }
}

impl Resource for Color {
    type Id = ColorId;
    type Payload = ColorPayload;
    type Draft = ColorDraft;
    type Filter = NoFilter;

    const NAME: &'static str = "color";
    const SEGMENT: &'static str = "colors";

    fn id(&self) -> ColorId {
        self.id
    }

    async fn list(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        _filter: &NoFilter,
    ) -> Result<Vec<Self>, RepositoryError> {
        let rows: Vec<ColorRow> = sqlx::query_as(
            r"
            SELECT id, store_id, name, value, created_at
            FROM color
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
        id: ColorId,
    ) -> Result<Option<Self>, RepositoryError> {
        let row: Option<ColorRow> = sqlx::query_as(
            r"
            SELECT id, store_id, name, value, created_at
            FROM color
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
        draft: &ColorDraft,
    ) -> Result<Self, RepositoryError> {
        let row: ColorRow = sqlx::query_as(
            r"
            INSERT INTO color (id, store_id, name, value, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, store_id, name, value, created_at
            ",
        )
        .bind(ColorId::generate())
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
        id: ColorId,
        draft: &ColorDraft,
    ) -> Result<Option<Self>, RepositoryError> {
        let row: Option<ColorRow> = sqlx::query_as(
            r"
            UPDATE color SET name = ?, value = ?
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
        id: ColorId,
    ) -> Result<Option<&'static str>, RepositoryError> {
        let (used,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM product WHERE color_id = ? AND store_id = ?)",
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
        id: ColorId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM color WHERE id = ? AND store_id = ?")
            .bind(id)
            .bind(store_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| RepositoryError::from_write(e, Self::NAME))?;

        Ok(result.rows_affected())
    }
}
