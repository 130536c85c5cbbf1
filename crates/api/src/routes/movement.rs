//! Route definitions for the `/movements` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::movement;
use crate::state::AppState;

/// Routes mounted at `/movements`. Movements are append-only: there is no
/// update or delete route.
///
/// ```text
/// GET  /           -> list_movements
/// POST /           -> record_movement
/// GET  /summary    -> movement_summary
/// GET  /{id}       -> get_movement
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(movement::list_movements).post(movement::record_movement),
        )
        .route("/summary", get(movement::movement_summary))
        .route("/{id}", get(movement::get_movement))
}
