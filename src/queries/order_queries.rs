use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{CartItem, Order, OrderItem, OrderResponse, cart_total},
};

/// Converts the user's cart into an order in one transaction: validates
/// each line against the live product, decrements stock, writes the order
/// and its items, then empties the cart.
pub async fn checkout(pool: &PgPool, user_id: &str, pickup_point: &str) -> Result<OrderResponse> {
    let mut tx = pool.begin().await?;

    let cart = sqlx::query_as::<_, CartItem>(
        "SELECT * FROM cart_items WHERE user_id = $1 ORDER BY id FOR UPDATE",
    )
    .bind(user_id)
    .fetch_all(&mut *tx)
    .await?;

    if cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".to_string()));
    }

    for item in &cart {
        let result = sqlx::query(
            "UPDATE products p
             SET quantity = p.quantity - $1, updated_at = NOW()
             FROM stores s
             WHERE p.id = $2 AND s.id = p.store_id
               AND p.is_active = TRUE AND s.is_active_store = TRUE
               AND p.quantity >= $1",
        )
        .bind(item.quantity)
        .bind(item.product_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // dropping the transaction rolls back earlier decrements
            return Err(AppError::BadRequest(format!(
                "{} is unavailable or out of stock",
                item.name
            )));
        }
    }

    let order = sqlx::query_as::<_, Order>(
        "INSERT INTO orders (reference, user_id, pickup_point, total_price)
         VALUES ($1, $2, $3, $4)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(pickup_point)
    .bind(cart_total(&cart))
    .fetch_one(&mut *tx)
    .await?;

    let product_ids: Vec<i32> = cart.iter().map(|i| i.product_id).collect();
    let names: Vec<&str> = cart.iter().map(|i| i.name.as_str()).collect();
    let prices: Vec<Decimal> = cart.iter().map(|i| i.price).collect();
    let quantities: Vec<i32> = cart.iter().map(|i| i.quantity).collect();

    let items = sqlx::query_as::<_, OrderItem>(
        "INSERT INTO order_items (order_id, product_id, name, price, quantity)
         SELECT $1, unnest($2::int[]), unnest($3::varchar[]), unnest($4::decimal[]), unnest($5::int[])
         RETURNING *",
    )
    .bind(order.id)
    .bind(&product_ids)
    .bind(&names)
    .bind(&prices)
    .bind(&quantities)
    .fetch_all(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(OrderResponse { order, items })
}

pub async fn get_user_orders(pool: &PgPool, user_id: &str) -> Result<Vec<OrderResponse>> {
    let orders = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let order_ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT * FROM order_items WHERE order_id = ANY($1) ORDER BY id",
    )
    .bind(&order_ids)
    .fetch_all(pool)
    .await?;

    let mut items_map: HashMap<i32, Vec<OrderItem>> = HashMap::new();
    for item in items {
        items_map.entry(item.order_id).or_default().push(item);
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let items = items_map.remove(&order.id).unwrap_or_default();
            OrderResponse { order, items }
        })
        .collect())
}
