use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    database::CatalogRepository,
    error::{AppError, Result},
    models::{
        CreateProductRequest, CreateStoreRequest, DeliveryOption, NewProduct, NewStore, Product,
        ProductFilter, ProductPage, Store, UpdateProductRequest, UpdateStoreRequest,
    },
    utils::{jwt::Claims, policy},
};

const MAX_NAME_LENGTH: usize = 255;

/// Seller-side store/product management and the buyer-facing catalog.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog }
    }

    pub async fn ping(&self) -> Result<()> {
        self.catalog.ping().await
    }

    pub async fn list_products(&self, filter: ProductFilter) -> Result<ProductPage> {
        let filter = filter.normalized();
        filter.validate()?;
        self.catalog.filter_products(&filter).await
    }

    pub async fn get_product(&self, id: i32) -> Result<Product> {
        find_visible_product(self.catalog.as_ref(), id).await
    }

    pub async fn my_products(&self, claims: &Claims) -> Result<Vec<Product>> {
        self.catalog.list_products_by_owner(&claims.sub).await
    }

    pub async fn create_product(
        &self,
        claims: &Claims,
        req: CreateProductRequest,
    ) -> Result<Product> {
        let store = self
            .catalog
            .find_store(req.store_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Store {} not found", req.store_id)))?;

        if store.user_id != claims.sub {
            return Err(AppError::Forbidden(
                "Products can only be added to your own store".to_string(),
            ));
        }

        if req.quantity < 0 {
            return Err(AppError::BadRequest("quantity must not be negative".to_string()));
        }

        let product = NewProduct {
            store_id: store.id,
            user_id: claims.sub.clone(),
            name: required_text("name", &req.name)?,
            description: optional_text(req.description),
            category: required_text("category", &req.category)?,
            price: valid_price(req.price)?,
            quantity: req.quantity,
            image: optional_text(req.image),
        };

        let product = self.catalog.create_product(&product).await?;
        tracing::info!(
            "Product {} created in store {} (pending review)",
            product.id,
            product.store_id
        );

        Ok(product)
    }

    /// Changing what buyers see about a product (name, description, image)
    /// sends it back to the review queue.
    pub async fn update_product(
        &self,
        claims: &Claims,
        id: i32,
        mut req: UpdateProductRequest,
    ) -> Result<Product> {
        let current = self
            .catalog
            .find_product(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;

        policy::require_owner_or_admin(claims, &current.user_id)?;

        req.name = req
            .name
            .as_deref()
            .map(|n| required_text("name", n))
            .transpose()?;
        req.category = req
            .category
            .as_deref()
            .map(|c| required_text("category", c))
            .transpose()?;
        req.price = req.price.map(valid_price).transpose()?;
        if matches!(req.quantity, Some(q) if q < 0) {
            return Err(AppError::BadRequest("quantity must not be negative".to_string()));
        }

        let reset_approval = current.is_active
            && (req.name.as_ref().is_some_and(|n| *n != current.name)
                || req
                    .description
                    .as_ref()
                    .is_some_and(|d| Some(d) != current.description.as_ref())
                || req
                    .image
                    .as_ref()
                    .is_some_and(|i| Some(i) != current.image.as_ref()));

        let product = self
            .catalog
            .update_product(id, &req, reset_approval)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;

        if reset_approval {
            tracing::info!("Product {} edited; returned to pending review", id);
        }

        Ok(product)
    }

    pub async fn my_stores(&self, claims: &Claims) -> Result<Vec<Store>> {
        self.catalog.list_stores_by_owner(&claims.sub).await
    }

    pub async fn create_store(&self, claims: &Claims, req: CreateStoreRequest) -> Result<Store> {
        let name = required_text("name", &req.name)?;
        validate_delivery_options(&req.delivery_options)?;

        if self.catalog.find_store_by_name(&name).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "A store named '{}' already exists",
                name
            )));
        }

        let store = NewStore {
            user_id: claims.sub.clone(),
            name,
            description: optional_text(req.description),
            delivery_options: req.delivery_options,
        };

        let store = self.catalog.create_store(&store).await?;
        tracing::info!("Store {} created by {} (pending review)", store.id, claims.sub);

        Ok(store)
    }

    pub async fn update_store(
        &self,
        claims: &Claims,
        id: i32,
        mut req: UpdateStoreRequest,
    ) -> Result<Store> {
        let current = self
            .catalog
            .find_store(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Store {} not found", id)))?;

        policy::require_owner_or_admin(claims, &current.user_id)?;

        req.name = req
            .name
            .as_deref()
            .map(|n| required_text("name", n))
            .transpose()?;

        if let Some(ref name) = req.name {
            if *name != current.name {
                if current.is_active_store {
                    return Err(AppError::BadRequest(
                        "Store name cannot be changed after approval".to_string(),
                    ));
                }

                if let Some(existing) = self.catalog.find_store_by_name(name).await? {
                    if existing.id != id {
                        return Err(AppError::Conflict(format!(
                            "A store named '{}' already exists",
                            name
                        )));
                    }
                }
            }
        }

        if let Some(ref options) = req.delivery_options {
            validate_delivery_options(options)?;
        }

        self.catalog
            .update_store(id, &req)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Store {} not found", id)))
    }
}

/// A product buyers may see: active, in an active store.
pub(crate) async fn find_visible_product(
    catalog: &dyn CatalogRepository,
    id: i32,
) -> Result<Product> {
    let not_found = || AppError::NotFound("Product not found".to_string());

    let product = catalog.find_product(id).await?.ok_or_else(not_found)?;
    if !product.is_active {
        return Err(not_found());
    }

    let store = catalog.find_store(product.store_id).await?;
    match store {
        Some(store) if store.is_active_store => Ok(product),
        _ => Err(not_found()),
    }
}

fn required_text(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }
    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::BadRequest(format!(
            "{} must be at most {} characters",
            field, MAX_NAME_LENGTH
        )));
    }
    Ok(value.to_string())
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Largest value a `NUMERIC(12,2)` price column holds.
fn max_price() -> Decimal {
    Decimal::new(999_999_999_999, 2)
}

fn valid_price(price: Decimal) -> Result<Decimal> {
    if price.is_sign_negative() {
        return Err(AppError::BadRequest("price must not be negative".to_string()));
    }
    let price = price.round_dp(2);
    if price > max_price() {
        return Err(AppError::BadRequest(format!(
            "price must be at most {}",
            max_price()
        )));
    }
    Ok(price)
}

fn validate_delivery_options(options: &[DeliveryOption]) -> Result<()> {
    for option in options {
        if option.label.trim().is_empty() {
            return Err(AppError::BadRequest(
                "delivery option label is required".to_string(),
            ));
        }
        if option.price.is_sign_negative() || option.days < 0 {
            return Err(AppError::BadRequest(format!(
                "delivery option '{}' has a negative price or time",
                option.label
            )));
        }
    }
    Ok(())
}
