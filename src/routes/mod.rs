mod admin;
mod auth;
mod cart;
mod health;
mod orders;
mod products;
mod stores;

use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};

use crate::{
    AppState,
    middleware::{admin_middleware, auth_middleware},
};

pub fn create_router(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/products", get(products::list_products))
        .route("/products/{id}", get(products::get_product))
        .route("/pickup-points", get(orders::pickup_points));

    let authenticated = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/products", post(products::create_product))
        .route("/products/mine", get(products::my_products))
        .route("/products/{id}", patch(products::update_product))
        .route("/stores", post(stores::create_store))
        .route("/stores/mine", get(stores::my_stores))
        .route("/stores/{id}", patch(stores::update_store))
        .route(
            "/cart",
            get(cart::view_cart)
                .post(cart::add_to_cart)
                .delete(cart::clear_cart),
        )
        .route(
            "/cart/{id}",
            patch(cart::update_quantity).delete(cart::remove_from_cart),
        )
        .route("/orders", get(orders::my_orders))
        .route("/orders/checkout", post(orders::checkout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin = Router::new()
        .route("/auth/verify-admin", get(auth::verify_admin))
        .route("/products/pending", get(admin::pending_products))
        .route("/products/inactive", get(admin::inactive_products))
        .route("/products/{id}/approve", patch(admin::approve_product))
        .route("/products/{id}/disapprove", delete(admin::disapprove_product))
        .route("/stores/inactive", get(admin::inactive_stores))
        .route("/stores/{id}/approve", patch(admin::approve_store))
        .route("/stores/{id}", delete(admin::reject_store))
        .route("/admin/actions", get(admin::list_actions))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_middleware,
        ));

    public.merge(authenticated).merge(admin)
}
