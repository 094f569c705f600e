use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use uuid::Uuid;

use crate::catalog::query::split_csv;
use crate::catalog::{CatalogQuery, Product, ProductDraft, ProductPatch, SortKey};
use crate::error::ApiError;
use crate::middleware::auth::AdminUser;
use crate::state::AppState;
use crate::upload;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    /// Comma-separated category membership set
    pub category: Option<String>,
    #[serde(rename = "subCategory")]
    pub sub_category: Option<String>,
    pub sort: Option<String>,
}

impl ListParams {
    fn into_query(self) -> CatalogQuery {
        CatalogQuery {
            search: self.search,
            categories: split_csv(self.category.as_deref()),
            sub_categories: split_csv(self.sub_category.as_deref()),
            sort: SortKey::from_param(self.sort.as_deref()),
        }
    }
}

/// GET /api/products - Filtered and sorted catalog listing
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    let products = state.store.list().await?;
    let query = params.into_query();

    let now = Utc::now();
    let data: Vec<Value> = query.apply(&products).iter().map(|p| p.to_api(now)).collect();

    tracing::debug!("Catalog query returned {} of {} products", data.len(), products.len());
    Ok(Json(json!({ "success": true, "data": data })))
}

/// GET /api/products/:id - Single product
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let product = state.store.get(id).await?;
    Ok(Json(json!({ "success": true, "data": product.to_api(Utc::now()) })))
}

/// POST /api/products/:id/view - Atomic view-counter increment
pub async fn record_view(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    state.store.increment_views(id).await?;
    Ok(Json(json!({ "success": true })))
}

/// POST /api/products - Create a product (admin, multipart with >= 1 image)
pub async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (fields, images) = upload::collect(multipart, state.uploads.max_file_bytes).await?;

    let draft = ProductDraft::from_fields(&fields)
        .map_err(|errors| ApiError::validation_error("Invalid product", Some(errors)))?;

    if images.is_empty() {
        return Err(ApiError::validation_error(
            "Image is required",
            Some(HashMap::from([(
                "image".to_string(),
                "At least one image is required".to_string(),
            )])),
        ));
    }

    let image_paths = upload::store_images(&state.uploads, &images).await?;
    let product = Product::create(draft, image_paths.clone(), Utc::now());

    match state.store.insert(product).await {
        Ok(product) => {
            tracing::info!("Created product {} ({})", product.name, product.id);
            Ok((
                StatusCode::CREATED,
                Json(json!({ "success": true, "data": product.to_api(Utc::now()) })),
            ))
        }
        Err(e) => {
            // creation failed after the files landed on disk
            upload::discard(&state.uploads, &image_paths).await;
            Err(e.into())
        }
    }
}

/// PUT /api/products/:id - Partial update (admin, multipart; images append)
pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let (fields, images) = upload::collect(multipart, state.uploads.max_file_bytes).await?;

    let patch = ProductPatch::from_fields(&fields)
        .map_err(|errors| ApiError::validation_error("Invalid product update", Some(errors)))?;

    let image_paths = upload::store_images(&state.uploads, &images).await?;

    match state.store.update(id, patch, image_paths.clone()).await {
        Ok(product) => {
            tracing::info!("Updated product {}", product.id);
            Ok(Json(json!({ "success": true, "data": product.to_api(Utc::now()) })))
        }
        Err(e) => {
            upload::discard(&state.uploads, &image_paths).await;
            Err(e.into())
        }
    }
}

/// DELETE /api/products/:id - Hard delete (admin)
pub async fn remove(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    state.store.delete(id).await?;
    tracing::info!("Deleted product {}", id);
    Ok(Json(json!({ "success": true, "data": { "deleted": true } })))
}
