//! Billboard queries.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use storeboard_core::{BillboardId, StoreId};

use super::RepositoryError;
use crate::models::{Billboard, BillboardDraft, BillboardPayload, NoFilter};
use crate::services::Resource;

#[derive(Debug, sqlx::FromRow)]
struct BillboardRow {
    id: BillboardId,
    store_id: StoreId,
    label: String,
    image_url: String,
    created_at: DateTime<Utc>,
}

impl From<BillboardRow> for Billboard {
    fn from(row: BillboardRow) -> Self {
        Self {
            id: row.id,
            store_id: row.store_id,
            label: row.label,
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}

impl Resource for Billboard {
    type Id = BillboardId;
    type Payload = BillboardPayload;
    type Draft = BillboardDraft;
    type Filter = NoFilter;

    const NAME: &'static str = "billboard";
    const SEGMENT: &'static str = "billboards";

    fn id(&self) -> BillboardId {
        self.id
    }

    async fn list(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        _filter: &NoFilter,
    ) -> Result<Vec<Self>, RepositoryError> {
        let rows: Vec<BillboardRow> = sqlx::query_as(
            r"
            SELECT id, store_id, label, image_url, created_at
            FROM billboard
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
        id: BillboardId,
    ) -> Result<Option<Self>, RepositoryError> {
        let row: Option<BillboardRow> = sqlx::query_as(
            r"
            SELECT id, store_id, label, image_url, created_at
            FROM billboard
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
        draft: &BillboardDraft,
    ) -> Result<Self, RepositoryError> {
        let row: BillboardRow = sqlx::query_as(
            r"
            INSERT INTO billboard (id, store_id, label, image_url, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, store_id, label, image_url, created_at
            ",
        )
        .bind(BillboardId::generate())
        .bind(store_id)
        .bind(&draft.label)
        .bind(&draft.image_url)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| RepositoryError::from_write(e, Self::NAME))?;

        Ok(row.into())
    }

    async fn update(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        id: BillboardId,
        draft: &BillboardDraft,
    ) -> Result<Option<Self>, RepositoryError> {
        let row: Option<BillboardRow> = sqlx::query_as(
            r"
            UPDATE billboard SET label = ?, image_url = ?
            WHERE id = ? AND store_id = ?
            RETURNING id, store_id, label, image_url, created_at
            ",
        )
        .bind(&draft.label)
        .bind(&draft.image_url)
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
        id: BillboardId,
    ) -> Result<Option<&'static str>, RepositoryError> {
        let (used,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM category WHERE billboard_id = ? AND store_id = ?)",
        )
        .bind(id)
        .bind(store_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(used.then_some("categories"))
    }

    async fn delete(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        id: BillboardId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM billboard WHERE id = ? AND store_id = ?")
            .bind(id)
            .bind(store_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| RepositoryError::from_write(e, Self::NAME))?;

        Ok(result.rows_affected())
    }
}
