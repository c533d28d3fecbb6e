use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::{AppConfig, MarketplaceConfig},
    database::{self, CartRepository, CatalogRepository, OrderRepository, PgRepository},
    error::{AppError, Result},
    routes,
    services::{CartService, CatalogService, ModerationService, OrderService},
    utils::jwt::TokenVerifier,
};

/// Services handed to every request; cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub cart: CartService,
    pub moderation: ModerationService,
    pub orders: OrderService,
    pub tokens: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(
        carts: Arc<dyn CartRepository>,
        catalog: Arc<dyn CatalogRepository>,
        orders: Arc<dyn OrderRepository>,
        tokens: TokenVerifier,
        marketplace: &MarketplaceConfig,
    ) -> Self {
        Self {
            catalog: CatalogService::new(catalog.clone()),
            cart: CartService::new(carts, catalog.clone()),
            moderation: ModerationService::new(catalog, marketplace.require_active_store),
            orders: OrderService::new(orders, marketplace.pickup_points.clone()),
            tokens: Arc::new(tokens),
        }
    }
}

/// Routes plus request tracing, without the deployment-specific layers.
pub fn router(state: AppState) -> Router {
    routes::create_router(&state)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    let pool = database::create_pool(&config.database).await?;
    let repository = Arc::new(PgRepository::new(pool));
    let tokens = TokenVerifier::new(&config.identity)?;

    let state = AppState::new(
        repository.clone(),
        repository.clone(),
        repository,
        tokens,
        &config.marketplace,
    );

    let allowed_origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| AppError::ConfigError(format!("Invalid CORS origin: {}", origin)))
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_origin(allowed_origins);

    let app = router(state)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(cors);

    Ok(app)
}
