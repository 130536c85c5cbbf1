//! Product entity model and DTOs.
//!
//! `stock` is read-only from the catalog's point of view: neither
//! [`CreateProduct`] nor [`UpdateProduct`] carries it. Products start at
//! zero and change only through recorded movements.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::types::{DbId, Timestamp};

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub stock: i32,
    pub min_stock: i32,
    pub category_id: Option<DbId>,
    pub warehouse_id: Option<DbId>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Derived in SQL as `stock <= min_stock`; not stored.
    pub is_low_stock: bool,
}

/// A product joined with its category name and warehouse location.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub product: Product,
    pub category_name: Option<String>,
    pub warehouse_location: Option<String>,
}

/// DTO for creating a new product.
#[derive(Debug, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub min_stock: Option<i32>,
    pub category_id: Option<DbId>,
    pub warehouse_id: Option<DbId>,
}

/// DTO for updating catalog fields. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub min_stock: Option<i32>,
    pub category_id: Option<DbId>,
    pub warehouse_id: Option<DbId>,
    pub is_active: Option<bool>,
}
