#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use catalog_api::auth::{self, Claims};
use catalog_api::catalog::{Product, ProductDraft, StockStatus};
use catalog_api::handlers;
use catalog_api::state::AppState;
use catalog_api::store::memory::MemoryProductStore;
use catalog_api::upload::UploadSettings;

pub const BOUNDARY: &str = "catalog-test-boundary";

/// Router plus handles for seeding and asserting against the backing store.
pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryProductStore>,
    pub uploads: UploadSettings,
}

pub fn test_app() -> TestApp {
    test_app_with_upload_cap(5 * 1024 * 1024)
}

/// Same app with a custom per-file upload cap, for size-limit tests.
pub fn test_app_with_upload_cap(max_file_bytes: usize) -> TestApp {
    let store = Arc::new(MemoryProductStore::new());
    let uploads = UploadSettings {
        root: std::env::temp_dir().join(format!("catalog-api-test-{}", Uuid::new_v4())),
        public_base: "/uploads".to_string(),
        max_file_bytes,
    };
    let app = handlers::app(AppState {
        store: store.clone(),
        uploads: uploads.clone(),
    });
    TestApp { app, store, uploads }
}

/// Bearer token for the development admin, minted directly.
pub fn admin_bearer() -> String {
    let token = auth::issue_token(Claims::admin("admin")).expect("dev secret configured");
    format!("Bearer {}", token)
}

/// Dispatch and hand back the raw response, for header assertions.
pub async fn send_raw(app: &Router, request: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(request).await.expect("infallible")
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

/// Assemble a multipart/form-data body with text fields and file parts
/// (name, file name, content type, bytes).
pub fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str, &str, &[u8])]) -> Body {
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    for (name, file_name, content_type, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, name, file_name, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    Body::from(body)
}

pub fn multipart_request(method: &str, uri: &str, bearer: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", format!("multipart/form-data; boundary={}", BOUNDARY));
    if let Some(bearer) = bearer {
        builder = builder.header("authorization", bearer);
    }
    builder.body(body).expect("request")
}

/// Seed a product straight into the store, bypassing the upload path.
pub async fn seed_product(store: &MemoryProductStore, name: &str, category: &str, price: f64) -> Product {
    let draft = ProductDraft {
        name: name.to_string(),
        description: format!("{} description", name),
        price,
        category: category.to_string(),
        sub_category: None,
        stock: StockStatus::InStock,
        quantity: 1,
        contact_number: "555-0100".to_string(),
    };
    let product = Product::create(draft, vec!["/uploads/seed.jpg".to_string()], chrono::Utc::now());
    use catalog_api::store::ProductStore;
    store.insert(product).await.expect("seed insert")
}
