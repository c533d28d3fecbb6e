use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    database::{
        connection,
        repository::{CartRepository, CatalogRepository, OrderRepository},
    },
    error::Result,
    models::{
        AdminAction, AdminActionQuery, CartItem, NewAdminAction, NewCartItem, NewProduct,
        NewStore, OrderResponse, Product, ProductFilter, ProductPage, Store, UpdateProductRequest,
        UpdateStoreRequest,
    },
    queries::{admin_queries, cart_queries, order_queries, product_queries, store_queries},
};

/// Postgres-backed storage; every trait method is one call into `queries`.
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartRepository for PgRepository {
    async fn list_cart(&self, user_id: &str) -> Result<Vec<CartItem>> {
        cart_queries::list_for_user(&self.pool, user_id).await
    }

    async fn add_cart_item(&self, item: &NewCartItem) -> Result<CartItem> {
        cart_queries::upsert_item(&self.pool, item).await
    }

    async fn set_cart_quantity(
        &self,
        user_id: &str,
        id: i32,
        quantity: i32,
    ) -> Result<Option<CartItem>> {
        cart_queries::set_quantity(&self.pool, user_id, id, quantity).await
    }

    async fn delete_cart_item(&self, user_id: &str, id: i32) -> Result<bool> {
        Ok(cart_queries::delete_item(&self.pool, user_id, id).await? > 0)
    }

    async fn clear_cart(&self, user_id: &str) -> Result<u64> {
        cart_queries::clear(&self.pool, user_id).await
    }
}

#[async_trait]
impl CatalogRepository for PgRepository {
    async fn ping(&self) -> Result<()> {
        connection::check_health(&self.pool).await
    }

    async fn create_store(&self, store: &NewStore) -> Result<Store> {
        store_queries::create_store(&self.pool, store).await
    }

    async fn find_store(&self, id: i32) -> Result<Option<Store>> {
        store_queries::find_by_id(&self.pool, id).await
    }

    async fn find_store_by_name(&self, name: &str) -> Result<Option<Store>> {
        store_queries::find_by_name(&self.pool, name).await
    }

    async fn list_stores_by_owner(&self, user_id: &str) -> Result<Vec<Store>> {
        store_queries::list_by_owner(&self.pool, user_id).await
    }

    async fn update_store(&self, id: i32, req: &UpdateStoreRequest) -> Result<Option<Store>> {
        store_queries::update_store(&self.pool, id, req).await
    }

    async fn list_inactive_stores(&self) -> Result<Vec<Store>> {
        store_queries::list_inactive(&self.pool).await
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product> {
        product_queries::create_product(&self.pool, product).await
    }

    async fn find_product(&self, id: i32) -> Result<Option<Product>> {
        product_queries::find_by_id(&self.pool, id).await
    }

    async fn list_products_by_owner(&self, user_id: &str) -> Result<Vec<Product>> {
        product_queries::list_by_owner(&self.pool, user_id).await
    }

    async fn update_product(
        &self,
        id: i32,
        req: &UpdateProductRequest,
        reset_approval: bool,
    ) -> Result<Option<Product>> {
        product_queries::update_product(&self.pool, id, req, reset_approval).await
    }

    async fn filter_products(&self, filter: &ProductFilter) -> Result<ProductPage> {
        product_queries::filter_products(&self.pool, filter).await
    }

    async fn list_pending_products(&self) -> Result<Vec<Product>> {
        product_queries::list_pending(&self.pool).await
    }

    async fn list_inactive_products(&self) -> Result<Vec<Product>> {
        product_queries::list_inactive(&self.pool).await
    }

    async fn approve_product(
        &self,
        id: i32,
        action: &NewAdminAction,
        require_active_store: bool,
    ) -> Result<Option<Product>> {
        admin_queries::approve_product(&self.pool, id, action, require_active_store).await
    }

    async fn reject_product(&self, id: i32, action: &NewAdminAction) -> Result<bool> {
        admin_queries::reject_product(&self.pool, id, action).await
    }

    async fn approve_store(&self, id: i32, action: &NewAdminAction) -> Result<Option<Store>> {
        admin_queries::approve_store(&self.pool, id, action).await
    }

    async fn reject_store(&self, id: i32, action: &NewAdminAction) -> Result<Option<u64>> {
        admin_queries::reject_store(&self.pool, id, action).await
    }

    async fn list_admin_actions(&self, query: &AdminActionQuery) -> Result<Vec<AdminAction>> {
        admin_queries::list_actions(&self.pool, query).await
    }
}

#[async_trait]
impl OrderRepository for PgRepository {
    async fn checkout(&self, user_id: &str, pickup_point: &str) -> Result<OrderResponse> {
        order_queries::checkout(&self.pool, user_id, pickup_point).await
    }

    async fn list_orders(&self, user_id: &str) -> Result<Vec<OrderResponse>> {
        order_queries::get_user_orders(&self.pool, user_id).await
    }
}
