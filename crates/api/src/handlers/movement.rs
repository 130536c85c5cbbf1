//! Handlers for the `/movements` resource: the stock ledger over HTTP.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use stockroom_core::error::CoreError;
use stockroom_core::ledger::{validate_note, validate_quantity, MovementKind};
use stockroom_core::policy::{Action, Resource};
use stockroom_core::reporting::month_bounds;
use stockroom_core::types::DbId;
use stockroom_db::models::movement::{
    CreateMovement, Movement, MovementFilter, MovementListItem, MovementReceipt, MovementSummary,
};
use stockroom_db::repositories::MovementRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiQuery, ValidJson};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /movements`.
///
/// `quantity` is taken as `i64` so that zero, negative and oversized values
/// all reach [`validate_quantity`] and get the same error shape.
#[derive(Debug, Deserialize, Validate)]
pub struct RecordMovementRequest {
    pub kind: MovementKind,
    pub quantity: i64,
    #[validate(range(min = 1, message = "product_id must be a positive id"))]
    pub product_id: DbId,
    pub note: Option<String>,
}

/// POST /api/v1/movements
///
/// Record an entry or exit. On success the movement row and the new stock
/// value are committed together; any rejection leaves both untouched.
pub async fn record_movement(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(input): ValidJson<RecordMovementRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<MovementReceipt>>)> {
    user.authorize(Action::RecordMovement, Resource::Movement)?;

    let quantity = validate_quantity(input.quantity)?;
    let note = input
        .note
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    validate_note(note.as_deref())?;

    let dto = CreateMovement {
        kind: input.kind,
        quantity,
        product_id: input.product_id,
        user_id: user.user_id,
        note,
    };
    let receipt = MovementRepo::record(&state.pool, &dto).await?;

    tracing::info!(
        movement_id = receipt.movement.id,
        product_id = dto.product_id,
        user_id = user.user_id,
        kind = %dto.kind,
        quantity,
        stock_before = receipt.stock_before,
        stock_after = receipt.stock_after,
        "Movement recorded"
    );

    if receipt.is_low_stock {
        tracing::warn!(
            product_id = dto.product_id,
            stock = receipt.stock_after,
            "Product at or below minimum stock"
        );
    }

    Ok((StatusCode::CREATED, Json(DataResponse { data: receipt })))
}

/// GET /api/v1/movements?kind=&from=&to=&product_id=&limit=&offset=
///
/// `from` / `to` are RFC 3339 timestamps and both bounds are inclusive.
pub async fn list_movements(
    State(state): State<AppState>,
    user: AuthUser,
    ApiQuery(filter): ApiQuery<MovementFilter>,
) -> AppResult<Json<DataResponse<Vec<MovementListItem>>>> {
    user.authorize(Action::Read, Resource::Movement)?;

    if let (Some(from), Some(to)) = (filter.from, filter.to) {
        if from > to {
            return Err(AppError::Core(CoreError::Validation(
                "'from' must not be after 'to'".into(),
            )));
        }
    }

    let movements = MovementRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: movements }))
}

/// GET /api/v1/movements/{id}
pub async fn get_movement(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Movement>>> {
    user.authorize(Action::Read, Resource::Movement)?;
    let movement = MovementRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Movement",
            id,
        }))?;
    Ok(Json(DataResponse { data: movement }))
}

/// GET /api/v1/movements/summary
///
/// Totals for the current calendar month (UTC).
pub async fn movement_summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<MovementSummary>>> {
    user.authorize(Action::Read, Resource::Movement)?;
    let (from, to) = month_bounds(Utc::now());
    let summary = MovementRepo::summary(&state.pool, from, to).await?;
    Ok(Json(DataResponse { data: summary }))
}
