use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::Result,
    models::{NewProduct, Product, ProductFilter, ProductPage, UpdateProductRequest},
};

pub async fn create_product(pool: &PgPool, product: &NewProduct) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (
            store_id, user_id, name, description, category, price, quantity, image
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(product.store_id)
    .bind(&product.user_id)
    .bind(&product.name)
    .bind(&product.description)
    .bind(&product.category)
    .bind(product.price)
    .bind(product.quantity)
    .bind(&product.image)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

pub async fn list_by_owner(pool: &PgPool, user_id: &str) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(products)
}

pub async fn update_product(
    pool: &PgPool,
    id: i32,
    req: &UpdateProductRequest,
    reset_approval: bool,
) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        UPDATE products
        SET
            name = COALESCE($1, name),
            description = COALESCE($2, description),
            category = COALESCE($3, category),
            price = COALESCE($4, price),
            quantity = COALESCE($5, quantity),
            image = COALESCE($6, image),
            is_active = CASE WHEN $7 THEN FALSE ELSE is_active END,
            updated_at = NOW()
        WHERE id = $8
        RETURNING *
        "#,
    )
    .bind(&req.name)
    .bind(&req.description)
    .bind(&req.category)
    .bind(req.price)
    .bind(req.quantity)
    .bind(&req.image)
    .bind(reset_approval)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

const VISIBLE_PRODUCTS: &str = " FROM products p \
     JOIN stores s ON s.id = p.store_id \
     WHERE p.is_active = TRUE AND s.is_active_store = TRUE";

fn push_conditions<'a>(query: &mut QueryBuilder<'a, Postgres>, filter: &'a ProductFilter) {
    if let Some(ref category) = filter.category {
        query.push(" AND p.category = ");
        query.push_bind(category);
    }

    if let Some(min_price) = filter.min_price {
        query.push(" AND p.price >= ");
        query.push_bind(min_price);
    }

    if let Some(max_price) = filter.max_price {
        query.push(" AND p.price <= ");
        query.push_bind(max_price);
    }

    if let Some(ref store_name) = filter.store_name {
        query.push(" AND LOWER(s.name) = LOWER(");
        query.push_bind(store_name);
        query.push(")");
    }

    if let Some(ref user_id) = filter.user_id {
        query.push(" AND p.user_id = ");
        query.push_bind(user_id);
    }
}

/// Builds the visible-product listing query. Every supplied criterion is ANDed.
pub fn build_filter_query(filter: &ProductFilter) -> QueryBuilder<'_, Postgres> {
    let mut query: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT p.*, COUNT(*) OVER() AS total_count");
    query.push(VISIBLE_PRODUCTS);
    push_conditions(&mut query, filter);

    // sort columns come from a closed enum, never from the request text
    let direction = filter.sort_order.unwrap_or_default().keyword();
    query.push(" ORDER BY p.");
    query.push(filter.sort_by.unwrap_or_default().column());
    query.push(" ");
    query.push(direction);
    query.push(", p.id ");
    query.push(direction);

    query.push(" LIMIT ");
    query.push_bind(filter.limit());
    query.push(" OFFSET ");
    query.push_bind(filter.offset());

    query
}

pub async fn filter_products(pool: &PgPool, filter: &ProductFilter) -> Result<ProductPage> {
    #[derive(sqlx::FromRow)]
    struct SearchResult {
        #[sqlx(flatten)]
        product: Product,
        total_count: i64,
    }

    let results = build_filter_query(filter)
        .build_query_as::<SearchResult>()
        .fetch_all(pool)
        .await?;

    let total = match results.first() {
        Some(r) => r.total_count,
        // an out-of-range page still reports the real total
        None => count_visible(pool, filter).await?,
    };
    let products = results.into_iter().map(|r| r.product).collect();

    Ok(ProductPage {
        products,
        total,
        page: filter.page(),
        limit: filter.limit(),
    })
}

async fn count_visible(pool: &PgPool, filter: &ProductFilter) -> Result<i64> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*)");
    query.push(VISIBLE_PRODUCTS);
    push_conditions(&mut query, filter);

    let total = query.build_query_scalar::<i64>().fetch_one(pool).await?;

    Ok(total)
}

pub async fn list_pending(pool: &PgPool) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT p.* FROM products p
         JOIN stores s ON s.id = p.store_id
         WHERE p.is_active = FALSE AND s.is_active_store = TRUE
         ORDER BY p.created_at ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(products)
}

pub async fn list_inactive(pool: &PgPool) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE is_active = FALSE ORDER BY created_at ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(products)
}
