#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, StatusCode, header},
};
use chrono::Utc;
use hoods_goods::{
    AppError, AppState, Result,
    app,
    config::{IdentityConfig, MarketplaceConfig},
    database::{CartRepository, CatalogRepository, OrderRepository},
    models::{
        AdminAction, AdminActionQuery, CartItem, DeliveryOption, MAX_LINE_QUANTITY,
        NewAdminAction, NewCartItem, NewProduct, NewStore, Order, OrderItem, OrderResponse,
        OrderStatus, Product, ProductFilter, ProductPage, SortBy, SortOrder, Store,
        UpdateProductRequest, UpdateStoreRequest,
    },
    utils::jwt::TokenVerifier,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

pub const SECRET: &str = "integration-secret";
pub const PICKUP_POINT: &str = "Main Campus Gate";

#[derive(Default)]
struct State {
    next_id: i32,
    stores: Vec<Store>,
    products: Vec<Product>,
    cart: Vec<CartItem>,
    actions: Vec<AdminAction>,
    orders: Vec<OrderResponse>,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn record(&mut self, action: &NewAdminAction) {
        let id = self.next_id();
        self.actions.push(AdminAction {
            id,
            action_type: action.action_type,
            target_id: action.target_id.clone(),
            details: action.details.clone(),
            admin_id: action.admin_id.clone(),
            created_at: Utc::now(),
        });
    }

    fn store_active(&self, store_id: i32) -> bool {
        self.stores
            .iter()
            .any(|s| s.id == store_id && s.is_active_store)
    }

    fn delete_products(&mut self, ids: &[i32]) {
        self.products.retain(|p| !ids.contains(&p.id));
        // mirrors the ON DELETE CASCADE on cart_items.product_id
        self.cart.retain(|c| !ids.contains(&c.product_id));
    }
}

/// In-memory stand-in for Postgres. One lock per call keeps every
/// operation atomic.
#[derive(Default)]
pub struct InMemoryRepository {
    state: Mutex<State>,
}

impl InMemoryRepository {
    pub fn store_count(&self) -> usize {
        self.state.lock().stores.len()
    }

    pub fn product_exists(&self, id: i32) -> bool {
        self.state.lock().products.iter().any(|p| p.id == id)
    }

    pub fn store_exists(&self, id: i32) -> bool {
        self.state.lock().stores.iter().any(|s| s.id == id)
    }

    pub fn action_count(&self) -> usize {
        self.state.lock().actions.len()
    }
}

#[async_trait]
impl CartRepository for InMemoryRepository {
    async fn list_cart(&self, user_id: &str) -> Result<Vec<CartItem>> {
        let state = self.state.lock();
        Ok(state
            .cart
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn add_cart_item(&self, item: &NewCartItem) -> Result<CartItem> {
        let mut state = self.state.lock();
        let now = Utc::now();

        if let Some(existing) = state
            .cart
            .iter_mut()
            .find(|c| c.user_id == item.user_id && c.product_id == item.product_id)
        {
            if existing.quantity + item.quantity > MAX_LINE_QUANTITY {
                return Err(AppError::BadRequest(format!(
                    "a cart line may hold at most {} units",
                    MAX_LINE_QUANTITY
                )));
            }
            existing.quantity += item.quantity;
            existing.name = item.name.clone();
            existing.price = item.price;
            existing.image = item.image.clone();
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let id = state.next_id();
        let line = CartItem {
            id,
            user_id: item.user_id.clone(),
            product_id: item.product_id,
            name: item.name.clone(),
            price: item.price,
            quantity: item.quantity,
            image: item.image.clone(),
            created_at: now,
            updated_at: now,
        };
        state.cart.push(line.clone());
        Ok(line)
    }

    async fn set_cart_quantity(
        &self,
        user_id: &str,
        id: i32,
        quantity: i32,
    ) -> Result<Option<CartItem>> {
        let mut state = self.state.lock();
        Ok(state
            .cart
            .iter_mut()
            .find(|c| c.id == id && c.user_id == user_id)
            .map(|c| {
                c.quantity = quantity;
                c.updated_at = Utc::now();
                c.clone()
            }))
    }

    async fn delete_cart_item(&self, user_id: &str, id: i32) -> Result<bool> {
        let mut state = self.state.lock();
        let before = state.cart.len();
        state.cart.retain(|c| !(c.id == id && c.user_id == user_id));
        Ok(state.cart.len() < before)
    }

    async fn clear_cart(&self, user_id: &str) -> Result<u64> {
        let mut state = self.state.lock();
        let before = state.cart.len();
        state.cart.retain(|c| c.user_id != user_id);
        Ok((before - state.cart.len()) as u64)
    }
}

#[async_trait]
impl CatalogRepository for InMemoryRepository {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn create_store(&self, store: &NewStore) -> Result<Store> {
        let mut state = self.state.lock();
        // mirrors the unique index on LOWER(name)
        if state
            .stores
            .iter()
            .any(|s| s.name.eq_ignore_ascii_case(&store.name))
        {
            return Err(AppError::Conflict(format!(
                "A store named '{}' already exists",
                store.name
            )));
        }
        let id = state.next_id();
        let now = Utc::now();
        let store = Store {
            id,
            user_id: store.user_id.clone(),
            name: store.name.clone(),
            description: store.description.clone(),
            delivery_options: store.delivery_options.clone(),
            is_active_store: false,
            created_at: now,
            updated_at: now,
        };
        state.stores.push(store.clone());
        Ok(store)
    }

    async fn find_store(&self, id: i32) -> Result<Option<Store>> {
        Ok(self.state.lock().stores.iter().find(|s| s.id == id).cloned())
    }

    async fn find_store_by_name(&self, name: &str) -> Result<Option<Store>> {
        Ok(self
            .state
            .lock()
            .stores
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn list_stores_by_owner(&self, user_id: &str) -> Result<Vec<Store>> {
        Ok(self
            .state
            .lock()
            .stores
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_store(&self, id: i32, req: &UpdateStoreRequest) -> Result<Option<Store>> {
        let mut state = self.state.lock();
        Ok(state.stores.iter_mut().find(|s| s.id == id).map(|s| {
            if let Some(ref name) = req.name {
                s.name = name.clone();
            }
            if let Some(ref description) = req.description {
                s.description = Some(description.clone());
            }
            if let Some(ref options) = req.delivery_options {
                s.delivery_options = options.clone();
            }
            s.updated_at = Utc::now();
            s.clone()
        }))
    }

    async fn list_inactive_stores(&self) -> Result<Vec<Store>> {
        Ok(self
            .state
            .lock()
            .stores
            .iter()
            .filter(|s| !s.is_active_store)
            .cloned()
            .collect())
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product> {
        let mut state = self.state.lock();
        let id = state.next_id();
        let now = Utc::now();
        let product = Product {
            id,
            store_id: product.store_id,
            user_id: product.user_id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            price: product.price,
            quantity: product.quantity,
            image: product.image.clone(),
            is_active: false,
            created_at: now,
            updated_at: now,
        };
        state.products.push(product.clone());
        Ok(product)
    }

    async fn find_product(&self, id: i32) -> Result<Option<Product>> {
        Ok(self
            .state
            .lock()
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn list_products_by_owner(&self, user_id: &str) -> Result<Vec<Product>> {
        Ok(self
            .state
            .lock()
            .products
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_product(
        &self,
        id: i32,
        req: &UpdateProductRequest,
        reset_approval: bool,
    ) -> Result<Option<Product>> {
        let mut state = self.state.lock();
        Ok(state.products.iter_mut().find(|p| p.id == id).map(|p| {
            if let Some(ref name) = req.name {
                p.name = name.clone();
            }
            if let Some(ref description) = req.description {
                p.description = Some(description.clone());
            }
            if let Some(ref category) = req.category {
                p.category = category.clone();
            }
            if let Some(price) = req.price {
                p.price = price;
            }
            if let Some(quantity) = req.quantity {
                p.quantity = quantity;
            }
            if let Some(ref image) = req.image {
                p.image = Some(image.clone());
            }
            if reset_approval {
                p.is_active = false;
            }
            p.updated_at = Utc::now();
            p.clone()
        }))
    }

    async fn filter_products(&self, filter: &ProductFilter) -> Result<ProductPage> {
        let state = self.state.lock();

        let mut matches: Vec<Product> = state
            .products
            .iter()
            .filter(|p| p.is_active && state.store_active(p.store_id))
            .filter(|p| filter.category.as_ref().is_none_or(|c| p.category == *c))
            .filter(|p| filter.min_price.is_none_or(|min| p.price >= min))
            .filter(|p| filter.max_price.is_none_or(|max| p.price <= max))
            .filter(|p| filter.user_id.as_ref().is_none_or(|u| p.user_id == *u))
            .filter(|p| {
                filter.store_name.as_ref().is_none_or(|name| {
                    state
                        .stores
                        .iter()
                        .any(|s| s.id == p.store_id && s.name.eq_ignore_ascii_case(name))
                })
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| {
            let ordering = match filter.sort_by.unwrap_or_default() {
                SortBy::Price => a.price.cmp(&b.price),
                SortBy::Name => a.name.cmp(&b.name),
                SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
            }
            .then(a.id.cmp(&b.id));

            match filter.sort_order.unwrap_or_default() {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = matches.len() as i64;
        let products = matches
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.limit() as usize)
            .collect();

        Ok(ProductPage {
            products,
            total,
            page: filter.page(),
            limit: filter.limit(),
        })
    }

    async fn list_pending_products(&self) -> Result<Vec<Product>> {
        let state = self.state.lock();
        Ok(state
            .products
            .iter()
            .filter(|p| !p.is_active && state.store_active(p.store_id))
            .cloned()
            .collect())
    }

    async fn list_inactive_products(&self) -> Result<Vec<Product>> {
        Ok(self
            .state
            .lock()
            .products
            .iter()
            .filter(|p| !p.is_active)
            .cloned()
            .collect())
    }

    async fn approve_product(
        &self,
        id: i32,
        action: &NewAdminAction,
        require_active_store: bool,
    ) -> Result<Option<Product>> {
        let mut state = self.state.lock();
        let Some((store_id, was_active)) = state
            .products
            .iter()
            .find(|p| p.id == id)
            .map(|p| (p.store_id, p.is_active))
        else {
            return Ok(None);
        };
        if require_active_store && !was_active && !state.store_active(store_id) {
            return Err(AppError::Conflict(format!(
                "Store {} must be approved before its products",
                store_id
            )));
        }
        let product = state.products.iter_mut().find(|p| p.id == id).map(|p| {
            p.is_active = true;
            p.clone()
        });
        state.record(action);
        Ok(product)
    }

    async fn reject_product(&self, id: i32, action: &NewAdminAction) -> Result<bool> {
        let mut state = self.state.lock();
        if !state.products.iter().any(|p| p.id == id) {
            return Ok(false);
        }
        state.delete_products(&[id]);
        state.record(action);
        Ok(true)
    }

    async fn approve_store(&self, id: i32, action: &NewAdminAction) -> Result<Option<Store>> {
        let mut state = self.state.lock();
        let store = state.stores.iter_mut().find(|s| s.id == id).map(|s| {
            s.is_active_store = true;
            s.clone()
        });
        if store.is_some() {
            state.record(action);
        }
        Ok(store)
    }

    async fn reject_store(&self, id: i32, action: &NewAdminAction) -> Result<Option<u64>> {
        let mut state = self.state.lock();
        if !state.stores.iter().any(|s| s.id == id) {
            return Ok(None);
        }

        let children: Vec<i32> = state
            .products
            .iter()
            .filter(|p| p.store_id == id)
            .map(|p| p.id)
            .collect();
        state.delete_products(&children);
        state.stores.retain(|s| s.id != id);
        state.record(action);

        Ok(Some(children.len() as u64))
    }

    async fn list_admin_actions(&self, query: &AdminActionQuery) -> Result<Vec<AdminAction>> {
        let state = self.state.lock();
        Ok(state
            .actions
            .iter()
            .rev()
            .filter(|a| query.action_type.is_none_or(|t| a.action_type == t))
            .skip(query.offset.unwrap_or(0).max(0) as usize)
            .take(query.limit.unwrap_or(50).clamp(1, 200) as usize)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl OrderRepository for InMemoryRepository {
    async fn checkout(&self, user_id: &str, pickup_point: &str) -> Result<OrderResponse> {
        let mut state = self.state.lock();

        let cart: Vec<CartItem> = state
            .cart
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        if cart.is_empty() {
            return Err(AppError::BadRequest("Cart is empty".to_string()));
        }

        for item in &cart {
            let available = state.products.iter().any(|p| {
                p.id == item.product_id
                    && p.is_active
                    && state.store_active(p.store_id)
                    && p.quantity >= item.quantity
            });
            if !available {
                return Err(AppError::BadRequest(format!(
                    "{} is unavailable or out of stock",
                    item.name
                )));
            }
        }

        for item in &cart {
            if let Some(p) = state.products.iter_mut().find(|p| p.id == item.product_id) {
                p.quantity -= item.quantity;
            }
        }

        let order_id = state.next_id();
        let mut items = Vec::with_capacity(cart.len());
        for line in &cart {
            let id = state.next_id();
            items.push(OrderItem {
                id,
                order_id,
                product_id: Some(line.product_id),
                name: line.name.clone(),
                price: line.price,
                quantity: line.quantity,
            });
        }

        let order = OrderResponse {
            order: Order {
                id: order_id,
                reference: Uuid::new_v4(),
                user_id: user_id.to_string(),
                pickup_point: pickup_point.to_string(),
                total_price: hoods_goods::models::cart_total(&cart),
                status: OrderStatus::Pending,
                created_at: Utc::now(),
            },
            items,
        };

        state.orders.push(order.clone());
        state.cart.retain(|c| c.user_id != user_id);

        Ok(order)
    }

    async fn list_orders(&self, user_id: &str) -> Result<Vec<OrderResponse>> {
        Ok(self
            .state
            .lock()
            .orders
            .iter()
            .rev()
            .filter(|o| o.order.user_id == user_id)
            .cloned()
            .collect())
    }
}

pub struct TestApp {
    pub router: Router,
    pub repo: Arc<InMemoryRepository>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_marketplace(MarketplaceConfig {
            require_active_store: true,
            pickup_points: vec![PICKUP_POINT.to_string(), "Library Desk".to_string()],
        })
    }

    pub fn with_marketplace(marketplace: MarketplaceConfig) -> Self {
        let repo = Arc::new(InMemoryRepository::default());
        let tokens = TokenVerifier::new(&IdentityConfig {
            jwt_secret: SECRET.to_string(),
            issuer: None,
            audience: None,
        })
        .unwrap();

        let state = AppState::new(repo.clone(), repo.clone(), repo.clone(), tokens, &marketplace);

        Self {
            router: app::router(state),
            repo,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, body_json(response).await)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(token), body).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Creates a store for `seller` and has `admin` approve it.
    pub async fn approved_store(&self, seller: &str, admin: &str, name: &str) -> i64 {
        let (status, store) = self
            .post(
                "/stores",
                seller,
                json!({
                    "name": name,
                    "deliveryOptions": [{ "label": "Pickup", "price": "0", "days": 1 }]
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{store}");
        let id = store["id"].as_i64().unwrap();

        let (status, _) = self
            .patch(&format!("/stores/{id}/approve"), admin, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        id
    }

    /// Creates a product in `store_id` and approves it.
    pub async fn approved_product(
        &self,
        seller: &str,
        admin: &str,
        store_id: i64,
        name: &str,
        category: &str,
        price: &str,
    ) -> i64 {
        let (status, product) = self
            .post(
                "/products",
                seller,
                json!({
                    "storeId": store_id,
                    "name": name,
                    "category": category,
                    "price": price,
                    "quantity": 10
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{product}");
        let id = product["id"].as_i64().unwrap();

        let (status, _) = self
            .patch(&format!("/products/{id}/approve"), admin, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        id
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

pub fn token(sub: &str, role: &str) -> String {
    let exp = Utc::now().timestamp() + 3600;
    encode(
        &Header::default(),
        &json!({ "sub": sub, "email": format!("{sub}@hoods.test"), "role": role, "exp": exp }),
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn admin_token() -> String {
    token("admin-1", "admin")
}

pub fn seller_token(sub: &str) -> String {
    token(sub, "seller")
}

pub fn buyer_token(sub: &str) -> String {
    token(sub, "buyer")
}

pub fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().unwrap(),
        Value::Number(n) => n.to_string().parse().unwrap(),
        other => panic!("not a decimal: {other}"),
    }
}

pub fn delivery(label: &str, price: Decimal, days: i32) -> DeliveryOption {
    DeliveryOption {
        label: label.to_string(),
        price,
        days,
    }
}
