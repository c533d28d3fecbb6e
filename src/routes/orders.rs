use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{
    AppState,
    error::Result,
    models::{CheckoutRequest, OrderResponse, PickupPointsResponse},
    utils::jwt::Claims,
};

pub async fn pickup_points(State(state): State<AppState>) -> Json<PickupPointsResponse> {
    Json(PickupPointsResponse {
        pickup_points: state.orders.pickup_points().to_vec(),
    })
}

pub async fn checkout(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<OrderResponse>)> {
    let order = state.orders.checkout(&claims, payload).await?;

    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn my_orders(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<OrderResponse>>> {
    let orders = state.orders.my_orders(&claims).await?;

    Ok(Json(orders))
}
