//! Storage seams used by the service layer.
//!
//! [`PgRepository`](super::PgRepository) backs all three traits in
//! production. Any other implementation must keep the multi-row operations
//! (`reject_store`, `checkout`, the moderation writes) atomic.

use async_trait::async_trait;

use crate::{
    error::Result,
    models::{
        AdminAction, AdminActionQuery, CartItem, NewAdminAction, NewCartItem, NewProduct,
        NewStore, OrderResponse, Product, ProductFilter, ProductPage, Store, UpdateProductRequest,
        UpdateStoreRequest,
    },
};

#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn list_cart(&self, user_id: &str) -> Result<Vec<CartItem>>;

    /// Inserts the line, or adds its quantity to the user's existing line
    /// for the same product. A merge past `MAX_LINE_QUANTITY` is a
    /// `BadRequest` and leaves the line unchanged.
    async fn add_cart_item(&self, item: &NewCartItem) -> Result<CartItem>;

    async fn set_cart_quantity(
        &self,
        user_id: &str,
        id: i32,
        quantity: i32,
    ) -> Result<Option<CartItem>>;

    async fn delete_cart_item(&self, user_id: &str, id: i32) -> Result<bool>;

    async fn clear_cart(&self, user_id: &str) -> Result<u64>;
}

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn ping(&self) -> Result<()>;

    async fn create_store(&self, store: &NewStore) -> Result<Store>;
    async fn find_store(&self, id: i32) -> Result<Option<Store>>;
    async fn find_store_by_name(&self, name: &str) -> Result<Option<Store>>;
    async fn list_stores_by_owner(&self, user_id: &str) -> Result<Vec<Store>>;
    async fn update_store(&self, id: i32, req: &UpdateStoreRequest) -> Result<Option<Store>>;
    async fn list_inactive_stores(&self) -> Result<Vec<Store>>;

    async fn create_product(&self, product: &NewProduct) -> Result<Product>;
    async fn find_product(&self, id: i32) -> Result<Option<Product>>;
    async fn list_products_by_owner(&self, user_id: &str) -> Result<Vec<Product>>;

    /// Applies the update; `reset_approval` also returns the product to pending.
    async fn update_product(
        &self,
        id: i32,
        req: &UpdateProductRequest,
        reset_approval: bool,
    ) -> Result<Option<Product>>;

    /// Visible products only: active, in an active store.
    async fn filter_products(&self, filter: &ProductFilter) -> Result<ProductPage>;

    /// Inactive products whose store is already active.
    async fn list_pending_products(&self) -> Result<Vec<Product>>;
    async fn list_inactive_products(&self) -> Result<Vec<Product>>;

    /// With `require_active_store`, approving a still-inactive product whose
    /// store is pending is a `Conflict`. The store check and the update share
    /// one transaction.
    async fn approve_product(
        &self,
        id: i32,
        action: &NewAdminAction,
        require_active_store: bool,
    ) -> Result<Option<Product>>;
    async fn reject_product(&self, id: i32, action: &NewAdminAction) -> Result<bool>;
    async fn approve_store(&self, id: i32, action: &NewAdminAction) -> Result<Option<Store>>;

    /// Deletes the store's products, then the store. Returns the number of
    /// products removed, or `None` if the store does not exist.
    async fn reject_store(&self, id: i32, action: &NewAdminAction) -> Result<Option<u64>>;

    async fn list_admin_actions(&self, query: &AdminActionQuery) -> Result<Vec<AdminAction>>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Turns the user's cart into an order, decrementing stock and emptying
    /// the cart in the same transaction.
    async fn checkout(&self, user_id: &str, pickup_point: &str) -> Result<OrderResponse>;

    async fn list_orders(&self, user_id: &str) -> Result<Vec<OrderResponse>>;
}
