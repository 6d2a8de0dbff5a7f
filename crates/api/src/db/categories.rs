//! Category queries.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use storeboard_core::{BillboardId, CategoryId, StoreId};

use super::{RepositoryError, exists_in_store};
use crate::models::{Category, CategoryDraft, CategoryPayload, NoFilter};
use crate::services::{Resource, ResourceError};
use crate::validation::ValidationError;

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: CategoryId,
    store_id: StoreId,
    billboard_id: BillboardId,
    name: String,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            store_id: row.store_id,
            billboard_id: row.billboard_id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

impl Resource for Category {
    type Id = CategoryId;
    type Payload = CategoryPayload;
    type Draft = CategoryDraft;
    type Filter = NoFilter;

    const NAME: &'static str = "category";
    const SEGMENT: &'static str = "categories";

    fn id(&self) -> CategoryId {
        self.id
    }

    async fn list(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        _filter: &NoFilter,
    ) -> Result<Vec<Self>, RepositoryError> {
        let rows: Vec<CategoryRow> = sqlx::query_as(
            r"
            SELECT id, store_id, billboard_id, name, created_at
            FROM category
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
        id: CategoryId,
    ) -> Result<Option<Self>, RepositoryError> {
        let row: Option<CategoryRow> = sqlx::query_as(
            r"
            SELECT id, store_id, billboard_id, name, created_at
            FROM category
            WHERE id = ? AND store_id = ?
            ",
        )
        .bind(id)
        .bind(store_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn check_references(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        draft: &CategoryDraft,
    ) -> Result<(), ResourceError> {
        let billboard = draft.billboard_id.as_uuid();
        if !exists_in_store(&mut *conn, "billboard", billboard, store_id).await? {
            return Err(ValidationError::new("billboardId", "does not exist in this store").into());
        }
        Ok(())
    }

    async fn insert(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        draft: &CategoryDraft,
    ) -> Result<Self, RepositoryError> {
        let row: CategoryRow = sqlx::query_as(
            r"
            INSERT INTO category (id, store_id, billboard_id, name, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, store_id, billboard_id, name, created_at
            ",
        )
        .bind(CategoryId::generate())
        .bind(store_id)
        .bind(draft.billboard_id)
        .bind(&draft.name)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| RepositoryError::from_write(e, Self::NAME))?;

        Ok(row.into())
    }

    async fn update(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        id: CategoryId,
        draft: &CategoryDraft,
    ) -> Result<Option<Self>, RepositoryError> {
        let row: Option<CategoryRow> = sqlx::query_as(
            r"
            UPDATE category SET billboard_id = ?, name = ?
            WHERE id = ? AND store_id = ?
            RETURNING id, store_id, billboard_id, name, created_at
            ",
        )
        .bind(draft.billboard_id)
        .bind(&draft.name)
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
        id: CategoryId,
    ) -> Result<Option<&'static str>, RepositoryError> {
        let (used,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM product WHERE category_id = ? AND store_id = ?)",
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
        id: CategoryId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM category WHERE id = ? AND store_id = ?")
            .bind(id)
            .bind(store_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| RepositoryError::from_write(e, Self::NAME))?;

        Ok(result.rows_affected())
    }
}
