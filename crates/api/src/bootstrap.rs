//! First-start provisioning.
//!
//! A fresh database has no users, and every route except login needs one.
//! When bootstrap credentials are configured and the users table is empty,
//! an administrator is created with them.

use stockroom_core::error::CoreError;
use stockroom_core::roles::Role;
use stockroom_db::models::user::CreateUser;
use stockroom_db::repositories::UserRepo;
use stockroom_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Create the bootstrap administrator if no users exist yet.
///
/// Returns `true` if a user was created.
pub async fn ensure_admin(pool: &DbPool, admin: &BootstrapAdmin) -> AppResult<bool> {
    if UserRepo::count(pool).await? > 0 {
        return Ok(false);
    }

    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: admin.username.clone(),
            password_hash,
            role: Role::Administrator.as_str().to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Bootstrap administrator created");
    Ok(true)
}
