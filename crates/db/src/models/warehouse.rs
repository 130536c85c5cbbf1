//! Warehouse lookup. A warehouse is identified to users by its location.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Warehouse {
    pub id: DbId,
    pub location: String,
    pub is_active: bool,
    pub created_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateWarehouse {
    pub location: String,
}
