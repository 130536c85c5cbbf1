pub mod auth;
pub mod category;
pub mod dashboard;
pub mod health;
pub mod movement;
pub mod product;
pub mod user;
pub mod warehouse;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/login                          login (public)
/// /auth/verify                         current user (auth)
///
/// /products                            list, create
/// /products/{id}                       get, update (never stock)
/// /products/{id}/toggle-status         activate / deactivate
///
/// /movements                           list (filtered), record
/// /movements/summary                   current month totals
/// /movements/{id}                      get
///
/// /categories                          list, create
/// /warehouses                          list, create
///
/// /users                               list, create (administrator)
/// /users/{id}                          get, update
/// /users/{id}/password                 change password
/// /users/{id}/toggle-status            activate / deactivate
///
/// /dashboard/stats                     headline counters
/// /dashboard/low-stock                 products at or below minimum
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/products", product::router())
        .nest("/movements", movement::router())
        .nest("/categories", category::router())
        .nest("/warehouses", warehouse::router())
        .nest("/users", user::router())
        .nest("/dashboard", dashboard::router())
}
