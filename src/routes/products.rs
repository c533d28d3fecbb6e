use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::Result,
    models::{CreateProductRequest, Product, ProductFilter, ProductPage, UpdateProductRequest},
    utils::jwt::Claims,
};

pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<ProductPage>> {
    let page = state.catalog.list_products(filter).await?;

    Ok(Json(page))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>> {
    let product = state.catalog.get_product(id).await?;

    Ok(Json(product))
}

pub async fn my_products(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Product>>> {
    let products = state.catalog.my_products(&claims).await?;

    Ok(Json(products))
}

pub async fn create_product(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = state.catalog.create_product(&claims, payload).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<Product>> {
    let product = state.catalog.update_product(&claims, id, payload).await?;

    Ok(Json(product))
}
