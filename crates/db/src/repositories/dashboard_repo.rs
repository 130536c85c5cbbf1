//! Aggregation queries backing the dashboard.
//!
//! Computed on every request; nothing is cached or precomputed.

use sqlx::PgPool;
use stockroom_core::types::Timestamp;

use crate::models::dashboard::DashboardStats;

pub struct DashboardRepo;

impl DashboardRepo {
    /// Headline counters. `day_start`/`day_end` bound "today" as `[start, end)`.
    pub async fn stats(
        pool: &PgPool,
        day_start: Timestamp,
        day_end: Timestamp,
    ) -> Result<DashboardStats, sqlx::Error> {
        sqlx::query_as::<_, DashboardStats>(
            "SELECT \
                (SELECT COUNT(*) FROM products WHERE is_active = true)::BIGINT \
                    AS total_products, \
                (SELECT COUNT(*) FROM products \
                    WHERE is_active = true AND stock <= min_stock)::BIGINT \
                    AS low_stock_products, \
                COUNT(m.id)::BIGINT AS movements_today, \
                COUNT(m.id) FILTER (WHERE m.kind = 'entry')::BIGINT AS entries_today, \
                COUNT(m.id) FILTER (WHERE m.kind = 'exit')::BIGINT AS exits_today \
             FROM movements m \
             WHERE m.created_at >= $1 AND m.created_at < $2",
        )
        .bind(day_start)
        .bind(day_end)
        .fetch_one(pool)
        .await
    }
}
