use std::sync::Arc;

use crate::{
    database::OrderRepository,
    error::{AppError, Result},
    models::{CheckoutRequest, OrderResponse},
    utils::jwt::Claims,
};

#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    pickup_points: Arc<Vec<String>>,
}

impl OrderService {
    pub fn new(orders: Arc<dyn OrderRepository>, pickup_points: Vec<String>) -> Self {
        Self {
            orders,
            pickup_points: Arc::new(pickup_points),
        }
    }

    pub fn pickup_points(&self) -> &[String] {
        &self.pickup_points
    }

    pub async fn checkout(&self, claims: &Claims, req: CheckoutRequest) -> Result<OrderResponse> {
        let requested = req.pickup_point.trim();
        let pickup_point = self
            .pickup_points
            .iter()
            .find(|p| p.eq_ignore_ascii_case(requested))
            .ok_or_else(|| {
                AppError::BadRequest(format!("Unknown pickup point '{}'", requested))
            })?;

        let order = self.orders.checkout(&claims.sub, pickup_point).await?;
        tracing::info!(
            "Order {} placed by {} for pickup at {}",
            order.order.reference,
            claims.sub,
            pickup_point
        );

        Ok(order)
    }

    pub async fn my_orders(&self, claims: &Claims) -> Result<Vec<OrderResponse>> {
        self.orders.list_orders(&claims.sub).await
    }
}
