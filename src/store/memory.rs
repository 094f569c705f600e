use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ProductStore, StoreError};
use crate::catalog::{Product, ProductPatch};

/// In-memory product store. Backs the test suite and local development
/// without a database; semantics mirror the Postgres store, including the
/// atomicity of `increment_views` (taken under the exclusive lock).
#[derive(Clone, Default)]
pub struct MemoryProductStore {
    products: Arc<RwLock<Vec<Product>>>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.read().await.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Product, StoreError> {
        self.products
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("product {} not found", id)))
    }

    async fn insert(&self, product: Product) -> Result<Product, StoreError> {
        let mut products = self.products.write().await;
        products.push(product.clone());
        Ok(product)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: ProductPatch,
        new_images: Vec<String>,
    ) -> Result<Product, StoreError> {
        let mut products = self.products.write().await;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("product {} not found", id)))?;
        product.apply_update(patch, new_images, Utc::now());
        Ok(product.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(StoreError::NotFound(format!("product {} not found", id)));
        }
        Ok(())
    }

    async fn increment_views(&self, id: Uuid) -> Result<(), StoreError> {
        let mut products = self.products.write().await;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("product {} not found", id)))?;
        product.views += 1;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
