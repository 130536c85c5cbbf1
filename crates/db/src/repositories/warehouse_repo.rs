//! Repository for the `warehouses` table.

use sqlx::PgPool;

use crate::models::warehouse::{CreateWarehouse, Warehouse};

const COLUMNS: &str = "id, location, is_active, created_at";

pub struct WarehouseRepo;

impl WarehouseRepo {
    /// List all warehouses ordered by location.
    pub async fn list(pool: &PgPool) -> Result<Vec<Warehouse>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM warehouses ORDER BY location");
        sqlx::query_as::<_, Warehouse>(&query).fetch_all(pool).await
    }

    /// Insert a new warehouse. Duplicate locations violate `uq_warehouses_location`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateWarehouse,
    ) -> Result<Warehouse, sqlx::Error> {
        let query = format!("INSERT INTO warehouses (location) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Warehouse>(&query)
            .bind(&input.location)
            .fetch_one(pool)
            .await
    }
}
