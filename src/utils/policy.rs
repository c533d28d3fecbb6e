//! Authorization checks evaluated per request against verified claims.

use crate::{
    error::{AppError, Result},
    utils::jwt::Claims,
};

pub fn require_admin(claims: &Claims) -> Result<()> {
    if claims.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Admin access required".to_string()))
    }
}

/// Owners manage their own stores and products; admins manage everything.
pub fn require_owner_or_admin(claims: &Claims, owner_id: &str) -> Result<()> {
    if claims.sub == owner_id || claims.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You do not own this resource".to_string(),
        ))
    }
}
