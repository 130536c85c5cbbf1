//! Handlers for the `/dashboard` resource. Everything is aggregated per request.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use stockroom_core::policy::{Action, Resource};
use stockroom_core::reporting::day_bounds;
use stockroom_db::models::dashboard::DashboardStats;
use stockroom_db::models::product::ProductDetail;
use stockroom_db::repositories::{DashboardRepo, ProductRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    user.authorize(Action::Read, Resource::Dashboard)?;
    let (day_start, day_end) = day_bounds(Utc::now());
    let stats = DashboardRepo::stats(&state.pool, day_start, day_end).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/dashboard/low-stock
///
/// Active products at or below their minimum, lowest stock first.
pub async fn low_stock(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ProductDetail>>>> {
    user.authorize(Action::Read, Resource::Dashboard)?;
    let products = ProductRepo::list_low_stock(&state.pool).await?;
    Ok(Json(DataResponse { data: products }))
}
