//! Dashboard aggregate models.

use serde::Serialize;
use sqlx::FromRow;

/// Headline counters shown on the dashboard. Counts only active products.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DashboardStats {
    pub total_products: i64,
    pub low_stock_products: i64,
    pub movements_today: i64,
    pub entries_today: i64,
    pub exits_today: i64,
}
