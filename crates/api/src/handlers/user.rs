//! Handlers for the `/users` resource (user directory).
//!
//! Every handler requires the administrator role via the access policy.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use stockroom_core::error::CoreError;
use stockroom_core::policy::{Action, Resource};
use stockroom_core::roles::Role;
use stockroom_core::types::DbId;
use stockroom_db::models::user::{CreateUser, UpdateUser, UserResponse};
use stockroom_db::repositories::UserRepo;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// Request body for `PUT /users/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

/// Request body for `PATCH /users/{id}/password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    pub new_password: String,
}

/// Usernames are stored trimmed and must be 3 to 50 characters after trimming.
const USERNAME_LENGTH: std::ops::RangeInclusive<usize> = 3..=50;

fn normalize_username(raw: &str) -> AppResult<String> {
    let username = raw.trim();
    if !USERNAME_LENGTH.contains(&username.chars().count()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Username must be between {} and {} characters",
            USERNAME_LENGTH.start(),
            USERNAME_LENGTH.end()
        ))));
    }
    Ok(username.to_string())
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}

fn hash_checked(password: &str) -> AppResult<String> {
    validate_password_strength(password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    admin: AuthUser,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    admin.authorize(Action::Read, Resource::User)?;
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    admin: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    admin.authorize(Action::Read, Resource::User)?;
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: user.into() }))
}

/// POST /api/v1/users
///
/// Create a user. The password is checked for length and stored as an
/// Argon2id hash.
pub async fn create_user(
    State(state): State<AppState>,
    admin: AuthUser,
    ValidJson(input): ValidJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    admin.authorize(Action::Create, Resource::User)?;

    let username = normalize_username(&input.username)?;
    let password_hash = hash_checked(&input.password)?;
    let dto = CreateUser {
        username,
        password_hash,
        role: input.role.as_str().to_string(),
    };
    let user = UserRepo::create(&state.pool, &dto).await?;

    tracing::info!(
        user_id = user.id,
        role = %input.role,
        created_by = admin.user_id,
        "User created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: user.into() })))
}

/// PUT /api/v1/users/{id}
///
/// Update username, role or active flag. Passwords change through
/// `PATCH /users/{id}/password`.
pub async fn update_user(
    State(state): State<AppState>,
    admin: AuthUser,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    admin.authorize(Action::Update, Resource::User)?;

    if id == admin.user_id && input.is_active == Some(false) {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot deactivate your own account".into(),
        )));
    }

    let dto = UpdateUser {
        username: input.username.as_deref().map(normalize_username).transpose()?,
        role: input.role.map(|r| r.as_str().to_string()),
        is_active: input.is_active,
    };
    let user = UserRepo::update(&state.pool, id, &dto)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(user_id = id, updated_by = admin.user_id, "User updated");

    Ok(Json(DataResponse { data: user.into() }))
}

/// PATCH /api/v1/users/{id}/password
pub async fn change_password(
    State(state): State<AppState>,
    admin: AuthUser,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    admin.authorize(Action::ChangePassword, Resource::User)?;

    let password_hash = hash_checked(&input.new_password)?;
    let updated = UserRepo::update_password(&state.pool, id, &password_hash).await?;
    if !updated {
        return Err(not_found(id));
    }

    tracing::info!(user_id = id, changed_by = admin.user_id, "User password changed");

    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/users/{id}/toggle-status
pub async fn toggle_user_status(
    State(state): State<AppState>,
    admin: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    admin.authorize(Action::ToggleStatus, Resource::User)?;

    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot deactivate your own account".into(),
        )));
    }

    let user = UserRepo::toggle_active(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        user_id = id,
        is_active = user.is_active,
        changed_by = admin.user_id,
        "User status toggled"
    );

    Ok(Json(DataResponse { data: user.into() }))
}
