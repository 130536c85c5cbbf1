//! Handlers for the `/categories` lookup.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use stockroom_core::error::CoreError;
use stockroom_core::policy::{Action, Resource};
use stockroom_db::models::category::{Category, CreateCategory};
use stockroom_db::repositories::CategoryRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// GET /api/v1/categories
pub async fn list_categories(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    user.authorize(Action::Read, Resource::Category)?;
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/categories
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(input): ValidJson<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    user.authorize(Action::Create, Resource::Category)?;

    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "name must not be blank".into(),
        )));
    }

    let category = CategoryRepo::create(
        &state.pool,
        &CreateCategory {
            name: name.to_string(),
        },
    )
    .await?;

    tracing::info!(category_id = category.id, user_id = user.user_id, "Category created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}
