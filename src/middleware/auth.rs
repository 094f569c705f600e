use axum::{async_trait, extract::FromRequestParts, http::request::Parts, http::HeaderMap};

use crate::auth::{self, ADMIN_ROLE};
use crate::error::ApiError;

/// Authenticated admin context extracted from the bearer JWT.
///
/// Handlers for mutating routes take this as an argument; any missing,
/// malformed, expired or mis-signed credential rejects with 401 before the
/// handler body runs.
#[derive(Clone, Debug)]
pub struct AdminUser {
    pub username: String,
    pub role: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(&parts.headers).map_err(ApiError::unauthorized)?;

        let claims = auth::decode_token(&token)
            .map_err(|e| ApiError::unauthorized(format!("Invalid or expired token: {}", e)))?;

        if claims.role != ADMIN_ROLE {
            return Err(ApiError::unauthorized("Admin role required"));
        }

        Ok(AdminUser {
            username: claims.sub,
            role: claims.role,
        })
    }
}

/// Extract the JWT from the Authorization header
fn extract_bearer(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Authentication required".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
