//! Well-known role names and the [`Role`] enum.
//!
//! These must match the `ck_users_role` check constraint in
//! `20260301000001_create_users.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_ADMINISTRATOR: &str = "administrator";
pub const ROLE_SUPERVISOR: &str = "supervisor";
pub const ROLE_OPERATOR: &str = "operator";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMINISTRATOR, ROLE_SUPERVISOR, ROLE_OPERATOR];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Administrator,
    Supervisor,
    Operator,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Administrator => ROLE_ADMINISTRATOR,
            Role::Supervisor => ROLE_SUPERVISOR,
            Role::Operator => ROLE_OPERATOR,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMINISTRATOR => Ok(Role::Administrator),
            ROLE_SUPERVISOR => Ok(Role::Supervisor),
            ROLE_OPERATOR => Ok(Role::Operator),
            other => Err(CoreError::Validation(format!(
                "Invalid role '{other}'. Must be one of: {}",
                VALID_ROLES.join(", ")
            ))),
        }
    }
}
