//! Repository for the `products` table (catalog side).
//!
//! Nothing here writes `stock`; see [`super::MovementRepo::record`].

use sqlx::PgPool;
use stockroom_core::types::DbId;

use crate::models::product::{CreateProduct, Product, ProductDetail, UpdateProduct};

/// Column list for single-table queries. `is_low_stock` is derived.
const COLUMNS: &str = "\
    id, name, code, description, location, stock, min_stock, \
    category_id, warehouse_id, is_active, created_at, updated_at, \
    (stock <= min_stock) AS is_low_stock";

/// Column list for queries joining categories and warehouses.
const DETAIL_COLUMNS: &str = "\
    p.id, p.name, p.code, p.description, p.location, p.stock, p.min_stock, \
    p.category_id, p.warehouse_id, p.is_active, p.created_at, p.updated_at, \
    (p.stock <= p.min_stock) AS is_low_stock, \
    c.name AS category_name, w.location AS warehouse_location";

const DETAIL_FROM: &str = "\
    FROM products p \
    LEFT JOIN categories c ON c.id = p.category_id \
    LEFT JOIN warehouses w ON w.id = p.warehouse_id";

pub struct ProductRepo;

impl ProductRepo {
    /// Insert a new product with zero stock.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products
                (name, code, description, location, min_stock, category_id, warehouse_id)
             VALUES ($1, $2, $3, $4, COALESCE($5, 0), $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&input.name)
            .bind(&input.code)
            .bind(&input.description)
            .bind(&input.location)
            .bind(input.min_stock)
            .bind(input.category_id)
            .bind(input.warehouse_id)
            .fetch_one(pool)
            .await
    }

    /// Find a product by ID, active or not, with its lookups resolved.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProductDetail>, sqlx::Error> {
        let query = format!("SELECT {DETAIL_COLUMNS} {DETAIL_FROM} WHERE p.id = $1");
        sqlx::query_as::<_, ProductDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all products ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<ProductDetail>, sqlx::Error> {
        let query = format!("SELECT {DETAIL_COLUMNS} {DETAIL_FROM} ORDER BY p.name, p.id");
        sqlx::query_as::<_, ProductDetail>(&query)
            .fetch_all(pool)
            .await
    }

    /// Active products at or below their minimum stock, emptiest first.
    pub async fn list_low_stock(pool: &PgPool) -> Result<Vec<ProductDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_FROM} \
             WHERE p.is_active = true AND p.stock <= p.min_stock \
             ORDER BY p.stock ASC, p.name"
        );
        sqlx::query_as::<_, ProductDetail>(&query)
            .fetch_all(pool)
            .await
    }

    /// Update catalog fields. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET
                name = COALESCE($2, name),
                code = COALESCE($3, code),
                description = COALESCE($4, description),
                location = COALESCE($5, location),
                min_stock = COALESCE($6, min_stock),
                category_id = COALESCE($7, category_id),
                warehouse_id = COALESCE($8, warehouse_id),
                is_active = COALESCE($9, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.code)
            .bind(&input.description)
            .bind(&input.location)
            .bind(input.min_stock)
            .bind(input.category_id)
            .bind(input.warehouse_id)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Flip `is_active`. Returns the updated row, or `None` if the product does not exist.
    pub async fn toggle_active(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET is_active = NOT is_active WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
