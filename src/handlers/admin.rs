use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{self, Claims};
use crate::config;
use crate::error::ApiError;
use crate::middleware::auth::AdminUser;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /admin/login - Check the configured admin credential pair and issue
/// a 24h bearer token. Fails closed when no credentials are configured.
pub async fn login(Json(payload): Json<LoginRequest>) -> Result<Json<Value>, ApiError> {
    let security = &config::config().security;

    let credentials_match = !security.admin_password.is_empty()
        && payload.username == security.admin_username
        && payload.password == security.admin_password;

    if !credentials_match {
        tracing::warn!("Failed admin login attempt for username {:?}", payload.username);
        return Err(ApiError::unauthorized("Invalid username or password"));
    }

    let token = auth::issue_token(Claims::admin(&payload.username)).map_err(|e| {
        tracing::error!("Unable to issue admin token: {}", e);
        ApiError::internal_server_error("Unable to issue session token")
    })?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "token": token,
            "expires_in": security.jwt_expiry_hours * 3600,
        }
    })))
}

/// GET /admin/verify - Validate the bearer credential and echo its claims
pub async fn verify(admin: AdminUser) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "username": admin.username,
            "role": admin.role,
        }
    }))
}
