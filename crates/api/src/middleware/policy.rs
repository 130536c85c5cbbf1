//! Access checks on top of [`stockroom_core::policy::can`].

use stockroom_core::error::CoreError;
use stockroom_core::policy::{can, Action, Resource};

use super::auth::AuthUser;
use crate::error::{AppError, AppResult};

impl AuthUser {
    /// Fail with 403 unless this user may perform `action` on `resource`.
    pub fn authorize(&self, action: Action, resource: Resource) -> AppResult<()> {
        if can(&self.actor(), action, resource) {
            return Ok(());
        }

        tracing::info!(
            user_id = self.user_id,
            role = %self.role,
            action = action.name(),
            resource = resource.name(),
            "Access denied"
        );

        Err(AppError::Core(CoreError::Forbidden(format!(
            "Role '{}' may not {} {}",
            self.role,
            action.name(),
            resource.name()
        ))))
    }
}
