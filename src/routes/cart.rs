use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::Result,
    models::{AddToCartRequest, CartItem, CartResponse, UpdateQuantityRequest},
    utils::jwt::Claims,
};

pub async fn view_cart(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<CartResponse>> {
    let cart = state.cart.view(&claims).await?;

    Ok(Json(cart))
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<AddToCartRequest>,
) -> Result<Json<CartItem>> {
    let item = state.cart.add(&claims, payload).await?;

    Ok(Json(item))
}

pub async fn update_quantity(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> Result<Json<CartItem>> {
    let item = state
        .cart
        .update_quantity(&claims, id, payload.quantity)
        .await?;

    Ok(Json(item))
}

pub async fn remove_from_cart(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    state.cart.remove(&claims, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear_cart(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<StatusCode> {
    state.cart.clear(&claims).await?;

    Ok(StatusCode::NO_CONTENT)
}
