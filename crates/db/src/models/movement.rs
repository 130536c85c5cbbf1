//! Stock movement models (the ledger).
//!
//! Movements have no `updated_at` field: rows are immutable once created.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::ledger::MovementKind;
use stockroom_core::types::{DbId, Timestamp};

/// A single ledger row from the `movements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Movement {
    pub id: DbId,
    /// `"entry"` or `"exit"`; enforced by `ck_movements_kind`.
    pub kind: String,
    pub quantity: i32,
    pub note: Option<String>,
    pub product_id: DbId,
    pub user_id: DbId,
    pub created_at: Timestamp,
}

/// A movement joined with the product and user it references, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MovementListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub movement: Movement,
    pub product_name: String,
    pub product_code: String,
    pub username: String,
}

/// A validated request to record a movement.
///
/// `quantity` has already passed `stockroom_core::ledger::validate_quantity`.
#[derive(Debug, Clone)]
pub struct CreateMovement {
    pub kind: MovementKind,
    pub quantity: i32,
    pub product_id: DbId,
    pub user_id: DbId,
    pub note: Option<String>,
}

/// Result of a committed movement.
#[derive(Debug, Clone, Serialize)]
pub struct MovementReceipt {
    pub movement: Movement,
    pub product_name: String,
    pub stock_before: i32,
    pub stock_after: i32,
    /// Whether the product is at or below its minimum after this movement.
    pub is_low_stock: bool,
}

/// Filter parameters for listing movements (`?kind=&from=&to=&product_id=`).
///
/// Each `Some` field adds one parameterized condition; `from` and `to` are
/// inclusive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovementFilter {
    pub kind: Option<MovementKind>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub product_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Aggregate totals for a time window.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MovementSummary {
    pub total_movements: i64,
    pub total_entered: i64,
    pub total_exited: i64,
    pub entry_count: i64,
    pub exit_count: i64,
}
