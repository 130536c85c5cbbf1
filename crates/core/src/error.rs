//! Domain errors shared by the repository and HTTP layers.
//!
//! Each variant maps to exactly one HTTP status in the api crate, so choosing
//! the variant is choosing what the client sees.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Missing row. Inactive products are reported this way to the ledger.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed or out-of-range input, rejected before any write.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// An exit asked for more units than the product currently holds.
    #[error("Insufficient stock for product {product_id}: requested {requested}, current stock {current_stock}")]
    InsufficientStock {
        product_id: DbId,
        current_stock: i32,
        requested: i32,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Broken invariant inside the service. The message is logged, not returned.
    #[error("Internal error: {0}")]
    Internal(String),
}
