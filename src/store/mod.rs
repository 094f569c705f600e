pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::{Product, ProductPatch};

/// Errors from the product store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence seam for the product collection.
///
/// Writes are last-write-wins; the catalog assumes admin-serialized
/// mutations. The one exception is `increment_views`, which every
/// implementation must make atomic so concurrent product-page views
/// never lose an update.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products in insertion (creation) order.
    async fn list(&self) -> Result<Vec<Product>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Product, StoreError>;

    async fn insert(&self, product: Product) -> Result<Product, StoreError>;

    /// Merge a partial update and append `new_images`, refreshing
    /// `updated_at` and re-running the freshness rule.
    async fn update(
        &self,
        id: Uuid,
        patch: ProductPatch,
        new_images: Vec<String>,
    ) -> Result<Product, StoreError>;

    /// Hard delete, no tombstone.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    /// Atomic single increment of the view counter. Leaves `updated_at`
    /// untouched (views are not an edit).
    async fn increment_views(&self, id: Uuid) -> Result<(), StoreError>;

    /// Connectivity probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
