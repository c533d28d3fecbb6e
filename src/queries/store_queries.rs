use sqlx::{PgPool, types::Json};

use crate::{
    error::{AppError, Result},
    models::{NewStore, Store, UpdateStoreRequest},
};

fn name_taken(name: &str) -> impl FnOnce() -> String + '_ {
    move || format!("A store named '{}' already exists", name)
}

pub async fn create_store(pool: &PgPool, store: &NewStore) -> Result<Store> {
    let store = sqlx::query_as::<_, Store>(
        r#"
        INSERT INTO stores (user_id, name, description, delivery_options)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(&store.user_id)
    .bind(&store.name)
    .bind(&store.description)
    .bind(Json(&store.delivery_options))
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::from(e).unique_as_conflict(name_taken(&store.name)))?;

    Ok(store)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Store>> {
    let store = sqlx::query_as::<_, Store>("SELECT * FROM stores WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(store)
}

pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Store>> {
    let store = sqlx::query_as::<_, Store>("SELECT * FROM stores WHERE LOWER(name) = LOWER($1)")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    Ok(store)
}

pub async fn list_by_owner(pool: &PgPool, user_id: &str) -> Result<Vec<Store>> {
    let stores = sqlx::query_as::<_, Store>(
        "SELECT * FROM stores WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(stores)
}

pub async fn update_store(
    pool: &PgPool,
    id: i32,
    req: &UpdateStoreRequest,
) -> Result<Option<Store>> {
    let store = sqlx::query_as::<_, Store>(
        r#"
        UPDATE stores
        SET
            name = COALESCE($1, name),
            description = COALESCE($2, description),
            delivery_options = COALESCE($3, delivery_options),
            updated_at = NOW()
        WHERE id = $4
        RETURNING *
        "#,
    )
    .bind(&req.name)
    .bind(&req.description)
    .bind(req.delivery_options.as_ref().map(Json))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        AppError::from(e).unique_as_conflict(name_taken(req.name.as_deref().unwrap_or_default()))
    })?;

    Ok(store)
}

pub async fn list_inactive(pool: &PgPool) -> Result<Vec<Store>> {
    let stores = sqlx::query_as::<_, Store>(
        "SELECT * FROM stores WHERE is_active_store = FALSE ORDER BY created_at ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(stores)
}
