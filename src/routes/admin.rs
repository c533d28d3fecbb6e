use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::Result,
    models::{AdminAction, AdminActionQuery, Product, Store, StoreRejection},
    utils::jwt::Claims,
};

//PRODUCT MODERATION
pub async fn pending_products(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Product>>> {
    let products = state.moderation.pending_products(&claims).await?;

    Ok(Json(products))
}

pub async fn inactive_products(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Product>>> {
    let products = state.moderation.inactive_products(&claims).await?;

    Ok(Json(products))
}

pub async fn approve_product(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> Result<Json<Product>> {
    let product = state.moderation.approve_product(&claims, id).await?;

    Ok(Json(product))
}

pub async fn disapprove_product(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    state.moderation.disapprove_product(&claims, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

//STORE MODERATION
pub async fn inactive_stores(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Store>>> {
    let stores = state.moderation.inactive_stores(&claims).await?;

    Ok(Json(stores))
}

pub async fn approve_store(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> Result<Json<Store>> {
    let store = state.moderation.approve_store(&claims, id).await?;

    Ok(Json(store))
}

pub async fn reject_store(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> Result<Json<StoreRejection>> {
    let rejection = state.moderation.reject_store(&claims, id).await?;

    Ok(Json(rejection))
}

//AUDIT LOG
pub async fn list_actions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<AdminActionQuery>,
) -> Result<Json<Vec<AdminAction>>> {
    let actions = state.moderation.actions(&claims, &params).await?;

    Ok(Json(actions))
}
