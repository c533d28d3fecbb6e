use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Most units a single cart line may hold.
pub const MAX_LINE_QUANTITY: i32 = 9_999;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: i32,
    pub user_id: String,
    pub product_id: i32,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Line to insert, or to merge into an existing `(user_id, product_id)` line.
#[derive(Debug, Clone)]
pub struct NewCartItem {
    pub user_id: String,
    pub product_id: i32,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: i32,
    pub quantity: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub total_price: Decimal,
    pub item_count: i64,
}

impl CartResponse {
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let total_price = cart_total(&items);
        let item_count = items.iter().map(|i| i64::from(i.quantity)).sum();
        Self {
            items,
            total_price,
            item_count,
        }
    }
}

pub fn cart_total(items: &[CartItem]) -> Decimal {
    items.iter().map(CartItem::line_total).sum()
}

/// Quantities below one are raised to one.
pub fn clamp_quantity(requested: i32) -> i32 {
    requested.max(1)
}

/// Clamps to at least one, then refuses anything above [`MAX_LINE_QUANTITY`].
pub fn line_quantity(requested: i32) -> Result<i32> {
    let quantity = clamp_quantity(requested);
    if quantity > MAX_LINE_QUANTITY {
        return Err(AppError::BadRequest(format!(
            "quantity must be at most {}",
            MAX_LINE_QUANTITY
        )));
    }
    Ok(quantity)
}
