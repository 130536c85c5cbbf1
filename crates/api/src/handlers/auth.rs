//! Handlers for the `/auth` resource (login, token verification).

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use stockroom_core::error::CoreError;
use stockroom_core::roles::Role;
use stockroom_db::models::user::UserResponse;
use stockroom_db::repositories::UserRepo;
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{verify_password, verify_without_account};
use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Same message for unknown users, inactive users and wrong passwords.
const INVALID_CREDENTIALS: &str = "Invalid username or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with username + password and return a bearer token.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<LoginRequest>,
) -> AppResult<Json<DataResponse<LoginResponse>>> {
    let unauthorized = || AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into()));

    // Every path below runs exactly one Argon2 verification, so timing does
    // not distinguish unknown, inactive and wrong-password logins.
    let Some(user) = UserRepo::find_by_username(&state.pool, input.username.trim()).await? else {
        verify_without_account(&input.password);
        tracing::info!("Login failed: unknown username");
        return Err(unauthorized());
    };

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login failed: wrong password");
        return Err(unauthorized());
    }

    if !user.is_active {
        tracing::info!(user_id = user.id, "Login attempt on inactive account");
        return Err(unauthorized());
    }

    let role: Role = user
        .role
        .parse()
        .map_err(|_| AppError::InternalError(format!("User {} has unknown role", user.id)))?;

    let token = generate_access_token(user.id, role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, role = %role, "User logged in");

    Ok(Json(DataResponse {
        data: LoginResponse {
            token,
            expires_in: state.config.jwt.expires_in_secs(),
            user: user.into(),
        },
    }))
}

/// GET /api/v1/auth/verify
///
/// Confirm the bearer token is still good and return the current user.
pub async fn verify(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth_user.user_id,
        }))?;

    Ok(Json(DataResponse { data: user.into() }))
}
