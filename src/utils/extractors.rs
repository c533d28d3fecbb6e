use axum::http::{HeaderMap, header::AUTHORIZATION};

use crate::error::{AppError, Result};

pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid token format".to_string()))
}
