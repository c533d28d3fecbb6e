use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::Result,
    models::{CreateStoreRequest, Store, UpdateStoreRequest},
    utils::jwt::Claims,
};

pub async fn create_store(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateStoreRequest>,
) -> Result<(StatusCode, Json<Store>)> {
    let store = state.catalog.create_store(&claims, payload).await?;

    Ok((StatusCode::CREATED, Json(store)))
}

pub async fn my_stores(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Store>>> {
    let stores = state.catalog.my_stores(&claims).await?;

    Ok(Json(stores))
}

pub async fn update_store(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStoreRequest>,
) -> Result<Json<Store>> {
    let store = state.catalog.update_store(&claims, id, payload).await?;

    Ok(Json(store))
}
