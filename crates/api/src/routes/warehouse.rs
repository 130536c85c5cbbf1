use axum::routing::get;
use axum::Router;

use crate::handlers::warehouse;
use crate::state::AppState;

/// Routes mounted at `/warehouses`.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(warehouse::list_warehouses).post(warehouse::create_warehouse),
    )
}
