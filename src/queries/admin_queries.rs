use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use crate::{
    error::{AppError, Result},
    models::{AdminAction, AdminActionQuery, NewAdminAction, Product, Store},
};

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

async fn record_action(
    tx: &mut Transaction<'_, Postgres>,
    action: &NewAdminAction,
) -> Result<AdminAction> {
    let action = sqlx::query_as::<_, AdminAction>(
        r#"
        INSERT INTO admin_actions (action_type, target_id, details, admin_id)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(action.action_type)
    .bind(&action.target_id)
    .bind(&action.details)
    .bind(&action.admin_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(action)
}

pub async fn approve_product(
    pool: &PgPool,
    id: i32,
    action: &NewAdminAction,
    require_active_store: bool,
) -> Result<Option<Product>> {
    let mut tx = pool.begin().await?;

    // locks both rows so the store cannot change state before commit
    let current = sqlx::query_as::<_, (bool, i32, bool)>(
        "SELECT p.is_active, s.id, s.is_active_store
         FROM products p
         JOIN stores s ON s.id = p.store_id
         WHERE p.id = $1
         FOR UPDATE OF p, s",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some((product_active, store_id, store_active)) = current else {
        tx.rollback().await?;
        return Ok(None);
    };

    if require_active_store && !product_active && !store_active {
        tx.rollback().await?;
        return Err(AppError::Conflict(format!(
            "Store {} must be approved before its products",
            store_id
        )));
    }

    let product = sqlx::query_as::<_, Product>(
        "UPDATE products SET is_active = TRUE, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(product) = product else {
        tx.rollback().await?;
        return Ok(None);
    };

    record_action(&mut tx, action).await?;
    tx.commit().await?;

    Ok(Some(product))
}

pub async fn reject_product(pool: &PgPool, id: i32, action: &NewAdminAction) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    record_action(&mut tx, action).await?;
    tx.commit().await?;

    Ok(true)
}

pub async fn approve_store(
    pool: &PgPool,
    id: i32,
    action: &NewAdminAction,
) -> Result<Option<Store>> {
    let mut tx = pool.begin().await?;

    let store = sqlx::query_as::<_, Store>(
        "UPDATE stores SET is_active_store = TRUE, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(store) = store else {
        tx.rollback().await?;
        return Ok(None);
    };

    record_action(&mut tx, action).await?;
    tx.commit().await?;

    Ok(Some(store))
}

/// Children first, then the parent, then the audit row; all or nothing.
pub async fn reject_store(pool: &PgPool, id: i32, action: &NewAdminAction) -> Result<Option<u64>> {
    let mut tx = pool.begin().await?;

    // lock the store row so no product can be added to it mid-rejection
    let exists = sqlx::query_scalar::<_, i32>("SELECT id FROM stores WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

    if exists.is_none() {
        tx.rollback().await?;
        return Ok(None);
    }

    let removed = sqlx::query("DELETE FROM products WHERE store_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM stores WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let action = NewAdminAction {
        details: format!("{} ({} products removed)", action.details, removed),
        ..action.clone()
    };
    record_action(&mut tx, &action).await?;
    tx.commit().await?;

    Ok(Some(removed))
}

pub async fn list_actions(pool: &PgPool, params: &AdminActionQuery) -> Result<Vec<AdminAction>> {
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = params.offset.unwrap_or(0).max(0);

    let mut query_builder =
        QueryBuilder::<Postgres>::new("SELECT * FROM admin_actions WHERE 1=1");

    if let Some(action_type) = params.action_type {
        query_builder.push(" AND action_type = ");
        query_builder.push_bind(action_type);
    }

    query_builder.push(" ORDER BY created_at DESC, id DESC");
    query_builder.push(" LIMIT ");
    query_builder.push_bind(limit);
    query_builder.push(" OFFSET ");
    query_builder.push_bind(offset);

    let actions = query_builder
        .build_query_as::<AdminAction>()
        .fetch_all(pool)
        .await?;

    Ok(actions)
}
