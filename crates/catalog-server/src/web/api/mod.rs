pub mod auth;
pub mod categories;
pub mod middleware;
pub mod products;

use crate::state::AppState;
use axum::{routing::get, routing::post, Router};
use std::sync::Arc;

pub fn build_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Auth routes (public)
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        // Category routes
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route("/categories/products", get(categories::list_with_products))
        .route(
            "/categories/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route(
            "/categories/{id}/products",
            get(categories::list_category_products),
        )
        // Product routes
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/products/lowest-price", get(products::list_by_price))
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .with_state(state)
}
