use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool, Row};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use super::{ProductStore, StoreError};
use crate::catalog::{Product, ProductPatch, StockStatus};
use crate::config::DatabaseConfig;

const COLUMNS: &str = "id, name, description, price, category, sub_category, images, stock, \
                       quantity, contact_number, views, is_new_product, created_at, updated_at";

impl FromRow<'_, PgRow> for Product {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let stock_raw: String = row.try_get("stock")?;
        let stock = StockStatus::from_wire(&stock_raw).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "stock".to_string(),
            source: format!("unknown stock status: {}", stock_raw).into(),
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            category: row.try_get("category")?,
            sub_category: row.try_get("sub_category")?,
            images: row.try_get("images")?,
            stock,
            quantity: row.try_get("quantity")?,
            contact_number: row.try_get("contact_number")?,
            views: row.try_get("views")?,
            is_new_product: row.try_get("is_new_product")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Postgres-backed product store using runtime-bound queries.
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    /// Connect using `DATABASE_URL`, apply pending migrations, and return
    /// the store. Connection failures surface as `Unavailable`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| StoreError::Unavailable("DATABASE_URL not set".to_string()))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&url)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Query(format!("migration failed: {}", e)))?;

        info!("Connected product store and applied migrations");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn write_row(&self, product: &Product) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE products SET name = $2, description = $3, price = $4, category = $5, \
             sub_category = $6, images = $7, stock = $8, quantity = $9, contact_number = $10, \
             views = $11, is_new_product = $12, updated_at = $13 WHERE id = $1",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.category)
        .bind(&product.sub_category)
        .bind(&product.images)
        .bind(product.stock.as_str())
        .bind(product.quantity)
        .bind(&product.contact_number)
        .bind(product.views)
        .bind(product.is_new_product)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let sql = format!("SELECT {} FROM products ORDER BY created_at ASC", COLUMNS);
        Ok(sqlx::query_as::<_, Product>(&sql).fetch_all(&self.pool).await?)
    }

    async fn get(&self, id: Uuid) -> Result<Product, StoreError> {
        let sql = format!("SELECT {} FROM products WHERE id = $1", COLUMNS);
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("product {} not found", id)))
    }

    async fn insert(&self, product: Product) -> Result<Product, StoreError> {
        sqlx::query(
            "INSERT INTO products (id, name, description, price, category, sub_category, images, \
             stock, quantity, contact_number, views, is_new_product, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.category)
        .bind(&product.sub_category)
        .bind(&product.images)
        .bind(product.stock.as_str())
        .bind(product.quantity)
        .bind(&product.contact_number)
        .bind(product.views)
        .bind(product.is_new_product)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(product)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: ProductPatch,
        new_images: Vec<String>,
    ) -> Result<Product, StoreError> {
        // read-merge-write; concurrent edits resolve last-write-wins
        let mut product = self.get(id).await?;
        product.apply_update(patch, new_images, Utc::now());
        self.write_row(&product).await?;
        Ok(product)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("product {} not found", id)));
        }
        Ok(())
    }

    async fn increment_views(&self, id: Uuid) -> Result<(), StoreError> {
        // single-statement increment, atomic at the database level
        let result = sqlx::query("UPDATE products SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("product {} not found", id)));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
