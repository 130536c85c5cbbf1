//! Route definitions for the `/products` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::product;
use crate::state::AppState;

/// Routes mounted at `/products`.
///
/// ```text
/// GET   /                     -> list_products
/// POST  /                     -> create_product
/// GET   /{id}                 -> get_product
/// PUT   /{id}                 -> update_product
/// PATCH /{id}/toggle-status   -> toggle_product_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(product::list_products).post(product::create_product),
        )
        .route(
            "/{id}",
            get(product::get_product).put(product::update_product),
        )
        .route(
            "/{id}/toggle-status",
            patch(product::toggle_product_status),
        )
}
