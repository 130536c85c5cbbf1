//! Route definitions for the `/users` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// All routes require the administrator role (checked in each handler).
///
/// ```text
/// GET   /                    -> list_users
/// POST  /                    -> create_user
/// GET   /{id}                -> get_user
/// PUT   /{id}                -> update_user
/// PATCH /{id}/password       -> change_password
/// PATCH /{id}/toggle-status  -> toggle_user_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(user::list_users).post(user::create_user))
        .route("/{id}", get(user::get_user).put(user::update_user))
        .route("/{id}/password", patch(user::change_password))
        .route("/{id}/toggle-status", patch(user::toggle_user_status))
}
