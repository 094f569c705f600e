pub mod admin;
pub mod products;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::HeaderValue,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::{self, SecurityConfig};
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let config = config::config();

    let router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Storefront catalog
        .route("/api/products", get(products::list).post(products::create))
        .route(
            "/api/products/:id",
            get(products::get_one).put(products::update).delete(products::remove),
        )
        .route("/api/products/:id/view", post(products::record_view))
        // Admin session
        .route("/admin/login", post(admin::login))
        .route("/admin/verify", get(admin::verify))
        // Uploaded images
        .nest_service("/uploads", ServeDir::new(state.uploads.root.clone()))
        // Global middleware
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .with_state(state);

    let router = if config.security.enable_cors {
        router.layer(cors_layer(&config.security))
    } else {
        router
    };

    if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// CORS policy from the security config: only listed origins are allowed.
/// An empty list admits no cross-origin caller; a literal "*" entry selects
/// the permissive policy.
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Catalog API",
            "version": version,
            "description": "Product catalog REST API built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "catalog": "GET /api/products[?search&category&subCategory&sort], GET /api/products/:id (public)",
                "views": "POST /api/products/:id/view (public)",
                "admin_products": "POST /api/products, PUT /api/products/:id, DELETE /api/products/:id (bearer token)",
                "admin_session": "POST /admin/login, GET /admin/verify",
                "uploads": "/uploads/* (public, static)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "store unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "store_error": e.to_string()
                }
            })),
        ),
    }
}
