//! Ownership-scoped CRUD, written once for every resource kind.
//!
//! A kind plugs in by implementing [`Resource`]: its storage queries, the
//! payload it accepts and the references that block its deletion. The
//! [`ResourceService`] then runs every mutation the same way:
//!
//! 1. validate the payload (no database access)
//! 2. open a transaction
//! 3. check the caller owns the store
//! 4. check foreign ids in the payload belong to the same store
//! 5. write and commit
//!
//! Reads skip the ownership check; catalog data is public.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::{SqliteConnection, SqlitePool};
use thiserror::Error;
use tracing::{info, instrument, warn};

use storeboard_core::{StoreId, UserId};

use super::guard;
use crate::db::RepositoryError;
use crate::validation::{Validate, ValidationError};

/// Errors returned by resource services.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The caller does not own the store.
    #[error("caller does not own this store")]
    Denied,

    /// The payload failed validation.
    #[error("invalid payload: {0}")]
    Validation(#[from] ValidationError),

    /// The store, or the resource within the store, does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The operation would break a reference between resources.
    #[error("{0}")]
    Conflict(String),

    /// Storage failure.
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ResourceError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Conflict(message) => Self::Conflict(message),
            RepositoryError::NotFound => Self::NotFound("record"),
            other => Self::Repository(other),
        }
    }
}

impl From<sqlx::Error> for ResourceError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// A store-scoped resource kind.
///
/// Every query takes the store id and must only see rows of that store.
pub trait Resource: Serialize + Send + Sync + Sized + 'static {
    /// Typed id of the kind.
    type Id: Copy + fmt::Debug + fmt::Display + DeserializeOwned + Send + Sync + 'static;
    /// Request body for create and update.
    type Payload: Validate<Draft = Self::Draft> + DeserializeOwned + Send + 'static;
    /// Validated payload.
    type Draft: Send + Sync;
    /// Query parameters accepted by `list`.
    type Filter: DeserializeOwned + Default + Send + Sync + 'static;

    /// Singular name used in logs and error messages.
    const NAME: &'static str;
    /// Plural path segment under `/api/{storeId}/`.
    const SEGMENT: &'static str;

    fn id(&self) -> Self::Id;

    /// All rows of the store matching the filter, newest first.
    fn list(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        filter: &Self::Filter,
    ) -> impl Future<Output = Result<Vec<Self>, RepositoryError>> + Send;

    fn find(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        id: Self::Id,
    ) -> impl Future<Output = Result<Option<Self>, RepositoryError>> + Send;

    /// Reject foreign ids in the draft that do not belong to the store.
    ///
    /// Kinds without foreign ids keep the default.
    fn check_references(
        _conn: &mut SqliteConnection,
        _store_id: StoreId,
        _draft: &Self::Draft,
    ) -> impl Future<Output = Result<(), ResourceError>> + Send {
        async { Ok(()) }
    }

    fn insert(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        draft: &Self::Draft,
    ) -> impl Future<Output = Result<Self, RepositoryError>> + Send;

    /// Replace every mutable field. `None` if the id is not in the store.
    fn update(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        id: Self::Id,
        draft: &Self::Draft,
    ) -> impl Future<Output = Result<Option<Self>, RepositoryError>> + Send;

    /// Plural name of the first kind still referencing the row, if any.
    ///
    /// A row that is referenced cannot be deleted.
    fn referenced_by(
        _conn: &mut SqliteConnection,
        _store_id: StoreId,
        _id: Self::Id,
    ) -> impl Future<Output = Result<Option<&'static str>, RepositoryError>> + Send {
        async { Ok(None) }
    }

    /// Delete the row and anything it owns. Returns the number of rows of
    /// this kind removed.
    fn delete(
        conn: &mut SqliteConnection,
        store_id: StoreId,
        id: Self::Id,
    ) -> impl Future<Output = Result<u64, RepositoryError>> + Send;
}

/// CRUD operations for one resource kind.
pub struct ResourceService<'a, R> {
    pool: &'a SqlitePool,
    kind: PhantomData<fn() -> R>,
}

impl<'a, R: Resource> ResourceService<'a, R> {
    /// Create a new resource service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            pool,
            kind: PhantomData,
        }
    }

    pub(crate) const fn pool(&self) -> &'a SqlitePool {
        self.pool
    }

    /// List the store's rows. Public.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::Repository` if the query fails.
    #[instrument(skip_all, fields(kind = R::NAME, store_id = %store_id))]
    pub async fn list(
        &self,
        store_id: StoreId,
        filter: &R::Filter,
    ) -> Result<Vec<R>, ResourceError> {
        let mut conn = self.pool.acquire().await?;
        Ok(R::list(&mut conn, store_id, filter).await?)
    }

    /// Get one row of the store. Public.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::NotFound` if the id does not belong to the store.
    #[instrument(skip_all, fields(kind = R::NAME, store_id = %store_id, id = %id))]
    pub async fn get(&self, store_id: StoreId, id: R::Id) -> Result<R, ResourceError> {
        let mut conn = self.pool.acquire().await?;
        R::find(&mut conn, store_id, id)
            .await?
            .ok_or(ResourceError::NotFound(R::NAME))
    }

    /// Validate and insert a new row.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::Validation` if the payload is invalid; this is
    /// checked before anything else.
    /// Returns `ResourceError::NotFound` if the store does not exist.
    /// Returns `ResourceError::Denied` if the caller does not own the store.
    #[instrument(skip_all, fields(kind = R::NAME, store_id = %store_id, caller = %caller))]
    pub async fn create(
        &self,
        store_id: StoreId,
        caller: &UserId,
        payload: R::Payload,
    ) -> Result<R, ResourceError> {
        let draft = payload.validate()?;

        let mut tx = self.pool.begin().await?;
        guard::require_owner(&mut tx, caller, store_id).await?;
        R::check_references(&mut tx, store_id, &draft).await?;
        let entity = R::insert(&mut tx, store_id, &draft).await?;
        tx.commit().await?;

        info!(id = %entity.id(), "{} created", R::NAME);
        Ok(entity)
    }

    /// Validate and replace all mutable fields of a row.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create`], plus `ResourceError::NotFound` if the id
    /// does not belong to the store.
    #[instrument(
        skip_all,
        fields(kind = R::NAME, store_id = %store_id, id = %id, caller = %caller)
    )]
    pub async fn update(
        &self,
        store_id: StoreId,
        caller: &UserId,
        id: R::Id,
        payload: R::Payload,
    ) -> Result<R, ResourceError> {
        let draft = payload.validate()?;

        let mut tx = self.pool.begin().await?;
        guard::require_owner(&mut tx, caller, store_id).await?;
        R::check_references(&mut tx, store_id, &draft).await?;
        let entity = R::update(&mut tx, store_id, id, &draft)
            .await?
            .ok_or(ResourceError::NotFound(R::NAME))?;
        tx.commit().await?;

        info!("{} updated", R::NAME);
        Ok(entity)
    }

    /// Delete a row unless other rows still reference it.
    ///
    /// Deleting an id that does not exist succeeds with a count of zero.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::NotFound` if the store does not exist.
    /// Returns `ResourceError::Denied` if the caller does not own the store.
    /// Returns `ResourceError::Conflict` if the row is still referenced.
    #[instrument(
        skip_all,
        fields(kind = R::NAME, store_id = %store_id, id = %id, caller = %caller)
    )]
    pub async fn delete(
        &self,
        store_id: StoreId,
        caller: &UserId,
        id: R::Id,
    ) -> Result<u64, ResourceError> {
        let mut tx = self.pool.begin().await?;
        guard::require_owner(&mut tx, caller, store_id).await?;

        if let Some(referrer) = R::referenced_by(&mut tx, store_id, id).await? {
            warn!(referrer, "{} still in use, delete rejected", R::NAME);
            return Err(ResourceError::Conflict(format!(
                "{} is still used by {referrer}; remove those first",
                R::NAME
            )));
        }

        let count = R::delete(&mut tx, store_id, id).await?;
        tx.commit().await?;

        info!(count, "{} deleted", R::NAME);
        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::db::testing;
    use crate::models::{
        Billboard, BillboardPayload, Category, CategoryPayload, Color, ColorPayload, ImagePayload,
        NoFilter, Product, ProductFilter, ProductPayload, Size, SizePayload, StorePayload,
    };
    use crate::services::StoreService;

    fn u1() -> UserId {
        UserId::parse("u1").unwrap()
    }

    fn u2() -> UserId {
        UserId::parse("u2").unwrap()
    }

    async fn store(pool: &SqlitePool) -> StoreId {
        StoreService::new(pool)
            .create(
                &u1(),
                StorePayload {
                    name: Some("Acme".to_string()),
                },
            )
            .await
            .unwrap()
            .id
    }

    fn size_payload(name: &str, value: &str) -> SizePayload {
        SizePayload {
            name: Some(name.to_string()),
            value: Some(value.to_string()),
        }
    }

    struct Catalog {
        store_id: StoreId,
        billboard: Billboard,
        category: Category,
        size: Size,
        color: Color,
    }

    async fn catalog(pool: &SqlitePool) -> Catalog {
        let store_id = store(pool).await;
        let billboard = ResourceService::<Billboard>::new(pool)
            .create(
                store_id,
                &u1(),
                BillboardPayload {
                    label: Some("Summer".to_string()),
                    image_url: Some("https://cdn.example/summer.png".to_string()),
                },
            )
            .await
            .unwrap();
        let category = ResourceService::<Category>::new(pool)
            .create(
                store_id,
                &u1(),
                CategoryPayload {
                    name: Some("Shirts".to_string()),
                    billboard_id: Some(billboard.id),
                },
            )
            .await
            .unwrap();
        let size = ResourceService::<Size>::new(pool)
            .create(store_id, &u1(), size_payload("M", "42"))
            .await
            .unwrap();
        let color = ResourceService::<Color>::new(pool)
            .create(
                store_id,
                &u1(),
                ColorPayload {
                    name: Some("White".to_string()),
                    value: Some("#fff".to_string()),
                },
            )
            .await
            .unwrap();

        Catalog {
            store_id,
            billboard,
            category,
            size,
            color,
        }
    }

    fn product_payload(catalog: &Catalog, urls: &[&str]) -> ProductPayload {
        ProductPayload {
            name: Some("Tee".to_string()),
            price: Some(Decimal::new(1999, 2)),
            category_id: Some(catalog.category.id),
            color_id: Some(catalog.color.id),
            size_id: Some(catalog.size.id),
            images: Some(
                urls.iter()
                    .map(|url| ImagePayload {
                        url: Some((*url).to_string()),
                    })
                    .collect(),
            ),
            is_featured: Some(true),
            is_archived: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_returns_payload() {
        let pool = testing::pool().await;
        let store_id = store(&pool).await;
        let sizes = ResourceService::<Size>::new(&pool);

        let created = sizes.create(store_id, &u1(), size_payload("M", "42")).await.unwrap();
        let fetched = sizes.get(store_id, created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "M");
        assert_eq!(fetched.value, "42");
        assert_eq!(fetched.store_id, store_id);
    }

    #[tokio::test]
    async fn test_get_from_other_store_is_not_found() {
        let pool = testing::pool().await;
        let store_a = store(&pool).await;
        let store_b = store(&pool).await;
        let sizes = ResourceService::<Size>::new(&pool);

        let size = sizes.create(store_a, &u1(), size_payload("M", "42")).await.unwrap();
        assert!(matches!(
            sizes.get(store_b, size.id).await,
            Err(ResourceError::NotFound("size"))
        ));
    }

    #[tokio::test]
    async fn test_non_owner_mutations_are_denied_and_change_nothing() {
        let pool = testing::pool().await;
        let catalog = catalog(&pool).await;
        let billboards = ResourceService::<Billboard>::new(&pool);

        let patch = BillboardPayload {
            label: Some("Hijacked".to_string()),
            image_url: Some("https://evil.example/x.png".to_string()),
        };
        let err = billboards
            .update(catalog.store_id, &u2(), catalog.billboard.id, patch)
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceError::Denied));

        let err = billboards
            .create(
                catalog.store_id,
                &u2(),
                BillboardPayload {
                    label: Some("Other".to_string()),
                    image_url: Some("https://cdn.example/o.png".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceError::Denied));

        let err = ResourceService::<Size>::new(&pool)
            .delete(catalog.store_id, &u2(), catalog.size.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceError::Denied));

        let unchanged = billboards.get(catalog.store_id, catalog.billboard.id).await.unwrap();
        assert_eq!(unchanged, catalog.billboard);
        assert_eq!(billboards.list(catalog.store_id, &NoFilter {}).await.unwrap().len(), 1);
        assert!(
            ResourceService::<Size>::new(&pool)
                .get(catalog.store_id, catalog.size.id)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_validation_is_checked_before_ownership() {
        let pool = testing::pool().await;
        let store_id = store(&pool).await;

        let err = ResourceService::<Size>::new(&pool)
            .create(store_id, &u2(), SizePayload::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceError::Validation(ref e) if e.field == "name"));
    }

    #[tokio::test]
    async fn test_unknown_store_is_not_found() {
        let pool = testing::pool().await;
        let err = ResourceService::<Size>::new(&pool)
            .create(StoreId::generate(), &u1(), size_payload("M", "42"))
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceError::NotFound("store")));
    }

    #[tokio::test]
    async fn test_referenced_attributes_cannot_be_deleted() {
        let pool = testing::pool().await;
        let catalog = catalog(&pool).await;
        let products = ResourceService::<Product>::new(&pool);
        let product = products
            .create(
                catalog.store_id,
                &u1(),
                product_payload(&catalog, &["https://cdn.example/a.png"]),
            )
            .await
            .unwrap();

        let sizes = ResourceService::<Size>::new(&pool);
        let err = sizes.delete(catalog.store_id, &u1(), catalog.size.id).await.unwrap_err();
        assert!(matches!(err, ResourceError::Conflict(_)));
        assert!(sizes.get(catalog.store_id, catalog.size.id).await.is_ok());

        let err = ResourceService::<Color>::new(&pool)
            .delete(catalog.store_id, &u1(), catalog.color.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceError::Conflict(_)));

        let err = ResourceService::<Category>::new(&pool)
            .delete(catalog.store_id, &u1(), catalog.category.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceError::Conflict(_)));

        let err = ResourceService::<Billboard>::new(&pool)
            .delete(catalog.store_id, &u1(), catalog.billboard.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceError::Conflict(_)));

        assert_eq!(products.delete(catalog.store_id, &u1(), product.id).await.unwrap(), 1);
        assert_eq!(sizes.delete(catalog.store_id, &u1(), catalog.size.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_id_counts_zero() {
        let pool = testing::pool().await;
        let store_id = store(&pool).await;
        let count = ResourceService::<Size>::new(&pool)
            .delete(store_id, &u1(), storeboard_core::SizeId::generate())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_update_is_idempotent() {
        let pool = testing::pool().await;
        let catalog = catalog(&pool).await;
        let products = ResourceService::<Product>::new(&pool);
        let urls = ["https://cdn.example/a.png", "https://cdn.example/b.png"];
        let product = products
            .create(catalog.store_id, &u1(), product_payload(&catalog, &urls))
            .await
            .unwrap();

        let mut payload = product_payload(&catalog, &urls);
        payload.name = Some("Heavy Tee".to_string());
        let first = products
            .update(catalog.store_id, &u1(), product.id, payload.clone())
            .await
            .unwrap();
        let second = products
            .update(catalog.store_id, &u1(), product.id, payload)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first.name, "Heavy Tee");
        assert_eq!(first.images, product.images);
    }

    #[tokio::test]
    async fn test_update_replaces_images_wholesale() {
        let pool = testing::pool().await;
        let catalog = catalog(&pool).await;
        let products = ResourceService::<Product>::new(&pool);
        let product = products
            .create(
                catalog.store_id,
                &u1(),
                product_payload(
                    &catalog,
                    &["https://cdn.example/a.png", "https://cdn.example/b.png"],
                ),
            )
            .await
            .unwrap();

        let updated = products
            .update(
                catalog.store_id,
                &u1(),
                product.id,
                product_payload(&catalog, &["https://cdn.example/c.png"]),
            )
            .await
            .unwrap();

        let urls: Vec<&str> = updated.images.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, ["https://cdn.example/c.png"]);
    }

    #[tokio::test]
    async fn test_foreign_ids_must_belong_to_store() {
        let pool = testing::pool().await;
        let catalog = catalog(&pool).await;
        let other_store = store(&pool).await;

        let err = ResourceService::<Category>::new(&pool)
            .create(
                other_store,
                &u1(),
                CategoryPayload {
                    name: Some("Hats".to_string()),
                    billboard_id: Some(catalog.billboard.id),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceError::Validation(ref e) if e.field == "billboardId"));
    }

    #[tokio::test]
    async fn test_product_filters() {
        let pool = testing::pool().await;
        let catalog = catalog(&pool).await;
        let products = ResourceService::<Product>::new(&pool);

        products
            .create(
                catalog.store_id,
                &u1(),
                product_payload(&catalog, &["https://cdn.example/a.png"]),
            )
            .await
            .unwrap();
        let mut plain = product_payload(&catalog, &["https://cdn.example/b.png"]);
        plain.is_featured = Some(false);
        plain.is_archived = Some(true);
        products.create(catalog.store_id, &u1(), plain).await.unwrap();

        let all = products.list(catalog.store_id, &ProductFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let featured = ProductFilter {
            is_featured: Some(true),
            ..ProductFilter::default()
        };
        let listed = products.list(catalog.store_id, &featured).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].is_featured);

        let live = ProductFilter {
            is_archived: Some(false),
            size_id: Some(catalog.size.id),
            ..ProductFilter::default()
        };
        assert_eq!(products.list(catalog.store_id, &live).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let pool = testing::pool().await;
        let store_id = store(&pool).await;
        let sizes = ResourceService::<Size>::new(&pool);
        sizes.create(store_id, &u1(), size_payload("S", "38")).await.unwrap();
        sizes.create(store_id, &u1(), size_payload("M", "42")).await.unwrap();

        let names: Vec<String> = sizes
            .list(store_id, &NoFilter {})
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["M", "S"]);
    }
}
