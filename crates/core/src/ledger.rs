//! Stock ledger rules.
//!
//! The database layer owns the transaction; this module owns the arithmetic
//! it commits. Given the locked stock value of a product, [`apply_movement`]
//! decides whether a movement is admissible and what the new stock is.
//! Keeping it pure lets the invariants be tested without a database.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

pub const KIND_ENTRY: &str = "entry";
pub const KIND_EXIT: &str = "exit";

/// All valid movement kinds.
pub const VALID_KINDS: &[&str] = &[KIND_ENTRY, KIND_EXIT];

/// Maximum length of the free-text note attached to a movement.
pub const MAX_NOTE_LENGTH: usize = 500;

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Entry,
    Exit,
}

impl MovementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MovementKind::Entry => KIND_ENTRY,
            MovementKind::Exit => KIND_EXIT,
        }
    }

    /// Signed stock delta for `quantity` units of this kind.
    pub fn signed(self, quantity: i32) -> i64 {
        match self {
            MovementKind::Entry => i64::from(quantity),
            MovementKind::Exit => -i64::from(quantity),
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            KIND_ENTRY => Ok(MovementKind::Entry),
            KIND_EXIT => Ok(MovementKind::Exit),
            other => Err(CoreError::Validation(format!(
                "Invalid movement kind '{other}'. Must be one of: {}",
                VALID_KINDS.join(", ")
            ))),
        }
    }
}

/// Stock values on either side of a committed movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockChange {
    pub stock_before: i32,
    pub stock_after: i32,
}

/// Validate a requested quantity and narrow it to the column type.
///
/// Quantities must be strictly positive and fit in a PostgreSQL `INTEGER`.
pub fn validate_quantity(quantity: i64) -> Result<i32, CoreError> {
    if quantity <= 0 {
        return Err(CoreError::Validation(
            "Quantity must be greater than 0".to_string(),
        ));
    }
    i32::try_from(quantity).map_err(|_| {
        CoreError::Validation(format!("Quantity must not exceed {}", i32::MAX))
    })
}

/// Validate the optional note attached to a movement.
pub fn validate_note(note: Option<&str>) -> Result<(), CoreError> {
    match note {
        Some(n) if n.chars().count() > MAX_NOTE_LENGTH => Err(CoreError::Validation(format!(
            "Note must be at most {MAX_NOTE_LENGTH} characters"
        ))),
        _ => Ok(()),
    }
}

/// Compute the effect of a movement on a product's current stock.
///
/// `current_stock` must be the value read under the row lock. Exits larger
/// than the current stock are rejected with [`CoreError::InsufficientStock`];
/// entries that would overflow the column are rejected as validation errors.
pub fn apply_movement(
    product_id: DbId,
    current_stock: i32,
    kind: MovementKind,
    quantity: i32,
) -> Result<StockChange, CoreError> {
    let stock_after = match kind {
        MovementKind::Entry => current_stock.checked_add(quantity).ok_or_else(|| {
            CoreError::Validation(format!(
                "Entry of {quantity} would exceed the maximum stock for product {product_id}"
            ))
        })?,
        MovementKind::Exit => {
            if quantity > current_stock {
                return Err(CoreError::InsufficientStock {
                    product_id,
                    current_stock,
                    requested: quantity,
                });
            }
            current_stock - quantity
        }
    };

    Ok(StockChange {
        stock_before: current_stock,
        stock_after,
    })
}

/// Replay movements in commit order on top of an initial stock value.
///
/// Used to check that a product's stored counter matches its history.
pub fn replay_stock<I>(initial_stock: i64, movements: I) -> i64
where
    I: IntoIterator<Item = (MovementKind, i32)>,
{
    movements
        .into_iter()
        .fold(initial_stock, |stock, (kind, quantity)| {
            stock + kind.signed(quantity)
        })
}

/// A product is low on stock when it holds no more than its minimum.
pub fn is_low_stock(stock: i32, min_stock: i32) -> bool {
    stock <= min_stock
}
