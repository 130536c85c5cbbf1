//! Handlers for the `/products` resource (catalog side).
//!
//! Stock is not writable here: products are created with zero stock and the
//! update DTO has no stock field. Quantities change only through
//! `POST /movements`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use stockroom_core::error::CoreError;
use stockroom_core::policy::{Action, Resource};
use stockroom_core::types::DbId;
use stockroom_db::models::product::{CreateProduct, Product, ProductDetail, UpdateProduct};
use stockroom_db::repositories::ProductRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /products`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub code: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(range(min = 0))]
    pub min_stock: Option<i32>,
    pub category_id: Option<DbId>,
    pub warehouse_id: Option<DbId>,
}

/// Request body for `PUT /products/{id}`. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub code: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(range(min = 0))]
    pub min_stock: Option<i32>,
    pub category_id: Option<DbId>,
    pub warehouse_id: Option<DbId>,
    pub is_active: Option<bool>,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Trim a required text field. Blank input is rejected rather than ignored.
fn required(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "{field} must not be blank"
        ))));
    }
    Ok(value.to_string())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/products
pub async fn list_products(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ProductDetail>>>> {
    user.authorize(Action::Read, Resource::Product)?;
    let products = ProductRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: products }))
}

/// GET /api/v1/products/{id}
///
/// Returns the latest committed stock value.
pub async fn get_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProductDetail>>> {
    user.authorize(Action::Read, Resource::Product)?;
    let product = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))?;
    Ok(Json(DataResponse { data: product }))
}

/// POST /api/v1/products
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(input): ValidJson<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Product>>)> {
    user.authorize(Action::Create, Resource::Product)?;

    let dto = CreateProduct {
        name: required("name", &input.name)?,
        code: required("code", &input.code)?,
        description: trimmed(input.description),
        location: trimmed(input.location),
        min_stock: input.min_stock,
        category_id: input.category_id,
        warehouse_id: input.warehouse_id,
    };
    let product = ProductRepo::create(&state.pool, &dto).await?;

    tracing::info!(
        product_id = product.id,
        code = %product.code,
        user_id = user.user_id,
        "Product created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: product })))
}

/// PUT /api/v1/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<UpdateProductRequest>,
) -> AppResult<Json<DataResponse<Product>>> {
    user.authorize(Action::Update, Resource::Product)?;

    let dto = UpdateProduct {
        name: input.name.as_deref().map(|v| required("name", v)).transpose()?,
        code: input.code.as_deref().map(|v| required("code", v)).transpose()?,
        description: trimmed(input.description),
        location: trimmed(input.location),
        min_stock: input.min_stock,
        category_id: input.category_id,
        warehouse_id: input.warehouse_id,
        is_active: input.is_active,
    };
    let product = ProductRepo::update(&state.pool, id, &dto)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))?;

    tracing::info!(product_id = id, user_id = user.user_id, "Product updated");

    Ok(Json(DataResponse { data: product }))
}

/// PATCH /api/v1/products/{id}/toggle-status
pub async fn toggle_product_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Product>>> {
    user.authorize(Action::ToggleStatus, Resource::Product)?;

    let product = ProductRepo::toggle_active(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))?;

    tracing::info!(
        product_id = id,
        is_active = product.is_active,
        user_id = user.user_id,
        "Product status toggled"
    );

    Ok(Json(DataResponse { data: product }))
}
