use sqlx::PgPool;

use crate::{
    error::{AppError, Result},
    models::{CartItem, MAX_LINE_QUANTITY, NewCartItem},
};

pub async fn list_for_user(pool: &PgPool, user_id: &str) -> Result<Vec<CartItem>> {
    let items = sqlx::query_as::<_, CartItem>(
        "SELECT * FROM cart_items WHERE user_id = $1 ORDER BY created_at ASC, id ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

pub async fn upsert_item(pool: &PgPool, item: &NewCartItem) -> Result<CartItem> {
    let item = sqlx::query_as::<_, CartItem>(
        r#"
        INSERT INTO cart_items (user_id, product_id, name, price, quantity, image)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (user_id, product_id) DO UPDATE
        SET
            quantity = cart_items.quantity + EXCLUDED.quantity,
            name = EXCLUDED.name,
            price = EXCLUDED.price,
            image = EXCLUDED.image,
            updated_at = NOW()
        WHERE cart_items.quantity + EXCLUDED.quantity <= $7
        RETURNING *
        "#,
    )
    .bind(&item.user_id)
    .bind(item.product_id)
    .bind(&item.name)
    .bind(item.price)
    .bind(item.quantity)
    .bind(&item.image)
    .bind(MAX_LINE_QUANTITY)
    .fetch_optional(pool)
    .await?;

    // a skipped conflict update returns no row
    item.ok_or_else(|| {
        AppError::BadRequest(format!(
            "a cart line may hold at most {} units",
            MAX_LINE_QUANTITY
        ))
    })
}

pub async fn set_quantity(
    pool: &PgPool,
    user_id: &str,
    id: i32,
    quantity: i32,
) -> Result<Option<CartItem>> {
    let item = sqlx::query_as::<_, CartItem>(
        "UPDATE cart_items SET quantity = $1, updated_at = NOW()
         WHERE id = $2 AND user_id = $3 RETURNING *",
    )
    .bind(quantity)
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(item)
}

pub async fn delete_item(pool: &PgPool, user_id: &str, id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn clear(pool: &PgPool, user_id: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
