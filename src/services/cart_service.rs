use std::sync::Arc;

use crate::{
    database::{CartRepository, CatalogRepository},
    error::{AppError, Result},
    models::{AddToCartRequest, CartItem, CartResponse, NewCartItem, line_quantity},
    services::catalog_service::find_visible_product,
    utils::jwt::Claims,
};

#[derive(Clone)]
pub struct CartService {
    carts: Arc<dyn CartRepository>,
    catalog: Arc<dyn CatalogRepository>,
}

impl CartService {
    pub fn new(carts: Arc<dyn CartRepository>, catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { carts, catalog }
    }

    pub async fn view(&self, claims: &Claims) -> Result<CartResponse> {
        let items = self.carts.list_cart(&claims.sub).await?;
        Ok(CartResponse::from_items(items))
    }

    /// Adds a visible product, merging into the existing line for it.
    pub async fn add(&self, claims: &Claims, req: AddToCartRequest) -> Result<CartItem> {
        let quantity = line_quantity(req.quantity.unwrap_or(1))?;
        let product = find_visible_product(self.catalog.as_ref(), req.product_id).await?;

        let item = NewCartItem {
            user_id: claims.sub.clone(),
            product_id: product.id,
            name: product.name,
            price: product.price,
            quantity,
            image: product.image,
        };

        self.carts.add_cart_item(&item).await
    }

    pub async fn update_quantity(&self, claims: &Claims, id: i32, quantity: i32) -> Result<CartItem> {
        let quantity = line_quantity(quantity)?;
        self.carts
            .set_cart_quantity(&claims.sub, id, quantity)
            .await?
            .ok_or_else(|| AppError::NotFound("Cart item not found".to_string()))
    }

    pub async fn remove(&self, claims: &Claims, id: i32) -> Result<()> {
        if !self.carts.delete_cart_item(&claims.sub, id).await? {
            return Err(AppError::NotFound("Cart item not found".to_string()));
        }
        Ok(())
    }

    pub async fn clear(&self, claims: &Claims) -> Result<u64> {
        self.carts.clear_cart(&claims.sub).await
    }
}
