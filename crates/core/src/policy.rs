//! Access policy.
//!
//! Every operation asks one question, [`can`], instead of carrying its own
//! role list. The table below is the complete set of grants:
//!
//! | Resource                          | Read          | Create / Update / Toggle  | Record movement |
//! |-----------------------------------|---------------|---------------------------|-----------------|
//! | Product, Category, Warehouse      | all roles     | administrator, supervisor | --              |
//! | Movement                          | all roles     | --                        | all roles       |
//! | Dashboard                         | all roles     | --                        | --              |
//! | User                              | administrator | administrator             | --              |

use serde::Serialize;

use crate::roles::Role;
use crate::types::DbId;

/// The authenticated identity attributed to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Actor {
    pub user_id: DbId,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    ToggleStatus,
    ChangePassword,
    RecordMovement,
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::ToggleStatus => "toggle the status of",
            Action::ChangePassword => "change the password of",
            Action::RecordMovement => "record",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Product,
    Category,
    Warehouse,
    Movement,
    Dashboard,
    User,
}

impl Resource {
    pub fn name(self) -> &'static str {
        match self {
            Resource::Product => "product",
            Resource::Category => "category",
            Resource::Warehouse => "warehouse",
            Resource::Movement => "movement",
            Resource::Dashboard => "dashboard",
            Resource::User => "user",
        }
    }
}

/// Decide whether `actor` may perform `action` on `resource`.
pub fn can(actor: &Actor, action: Action, resource: Resource) -> bool {
    let elevated = matches!(actor.role, Role::Administrator | Role::Supervisor);

    match resource {
        Resource::Product | Resource::Category | Resource::Warehouse => match action {
            Action::Read => true,
            Action::Create | Action::Update | Action::ToggleStatus => elevated,
            Action::ChangePassword | Action::RecordMovement => false,
        },
        Resource::Movement => matches!(action, Action::Read | Action::RecordMovement),
        Resource::Dashboard => action == Action::Read,
        Resource::User => actor.role == Role::Administrator && action != Action::RecordMovement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> Actor {
        Actor { user_id: 1, role }
    }

    const ALL_ROLES: [Role; 3] = [Role::Administrator, Role::Supervisor, Role::Operator];

    #[test]
    fn every_role_can_record_and_read_movements() {
        for role in ALL_ROLES {
            assert!(can(&actor(role), Action::RecordMovement, Resource::Movement));
            assert!(can(&actor(role), Action::Read, Resource::Movement));
        }
    }

    #[test]
    fn movements_are_never_edited() {
        for role in ALL_ROLES {
            assert!(!can(&actor(role), Action::Update, Resource::Movement));
            assert!(!can(&actor(role), Action::Create, Resource::Movement));
        }
    }

    #[test]
    fn catalog_edits_require_elevated_role() {
        for resource in [Resource::Product, Resource::Category, Resource::Warehouse] {
            assert!(can(&actor(Role::Administrator), Action::Create, resource));
            assert!(can(&actor(Role::Supervisor), Action::Update, resource));
            assert!(!can(&actor(Role::Operator), Action::Create, resource));
            assert!(!can(&actor(Role::Operator), Action::ToggleStatus, resource));
            assert!(can(&actor(Role::Operator), Action::Read, resource));
        }
    }

    #[test]
    fn user_directory_is_administrator_only() {
        assert!(can(&actor(Role::Administrator), Action::Read, Resource::User));
        assert!(can(&actor(Role::Administrator), Action::ChangePassword, Resource::User));
        assert!(!can(&actor(Role::Supervisor), Action::Read, Resource::User));
        assert!(!can(&actor(Role::Operator), Action::Create, Resource::User));
    }

    #[test]
    fn dashboard_is_read_only_for_everyone() {
        for role in ALL_ROLES {
            assert!(can(&actor(role), Action::Read, Resource::Dashboard));
            assert!(!can(&actor(role), Action::Update, Resource::Dashboard));
        }
    }
}
