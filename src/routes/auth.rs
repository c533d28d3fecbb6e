use axum::{Extension, Json};

use crate::{
    models::{AdminCheckResponse, ProfileResponse},
    utils::jwt::Claims,
};

pub async fn me(Extension(claims): Extension<Claims>) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        user_id: claims.sub,
        email: claims.email,
        name: claims.name,
        role: claims.role,
    })
}

// reachable only through the admin middleware
pub async fn verify_admin(Extension(claims): Extension<Claims>) -> Json<AdminCheckResponse> {
    Json(AdminCheckResponse {
        is_admin: claims.is_admin(),
    })
}
