//! Handlers for the `/warehouses` lookup.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use stockroom_core::error::CoreError;
use stockroom_core::policy::{Action, Resource};
use stockroom_db::models::warehouse::{CreateWarehouse, Warehouse};
use stockroom_db::repositories::WarehouseRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateWarehouseRequest {
    #[validate(length(min = 1, max = 200))]
    pub location: String,
}

/// GET /api/v1/warehouses
pub async fn list_warehouses(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Warehouse>>>> {
    user.authorize(Action::Read, Resource::Warehouse)?;
    let warehouses = WarehouseRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: warehouses }))
}

/// POST /api/v1/warehouses
pub async fn create_warehouse(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(input): ValidJson<CreateWarehouseRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Warehouse>>)> {
    user.authorize(Action::Create, Resource::Warehouse)?;

    let location = input.location.trim();
    if location.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "location must not be blank".into(),
        )));
    }

    let warehouse = WarehouseRepo::create(
        &state.pool,
        &CreateWarehouse {
            location: location.to_string(),
        },
    )
    .await?;

    tracing::info!(warehouse_id = warehouse.id, user_id = user.user_id, "Warehouse created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: warehouse })))
}
