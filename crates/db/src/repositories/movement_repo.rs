//! Repository for the `movements` table, including the stock ledger.
//!
//! [`MovementRepo::record`] is the only code path that writes
//! `products.stock`. It locks the product row, applies
//! [`stockroom_core::ledger::apply_movement`] to the locked value, appends
//! the movement and writes the new counter inside one transaction.

use sqlx::{PgPool, Postgres, Transaction};
use stockroom_core::error::CoreError;
use stockroom_core::ledger::{apply_movement, is_low_stock};
use stockroom_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use stockroom_core::types::{DbId, Timestamp};

use crate::models::movement::{
    CreateMovement, Movement, MovementFilter, MovementListItem, MovementReceipt, MovementSummary,
};

/// Column list for `movements` SELECT / RETURNING.
const COLUMNS: &str = "id, kind, quantity, note, product_id, user_id, created_at";

/// Column list for the joined listing query.
const LIST_COLUMNS: &str = "\
    m.id, m.kind, m.quantity, m.note, m.product_id, m.user_id, m.created_at, \
    p.name AS product_name, p.code AS product_code, u.username";

/// Why a movement was not recorded.
///
/// `Rejected` carries a domain rule violation (product missing or inactive,
/// insufficient stock). `Store` means the database failed; in both cases the
/// transaction was rolled back and nothing was written.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Rejected(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

pub struct MovementRepo;

impl MovementRepo {
    /// Record a movement and adjust the product's stock atomically.
    ///
    /// The product row is held with `SELECT ... FOR UPDATE` for the whole
    /// transaction, so concurrent movements on the same product serialize and
    /// each one validates against the stock left by the previous commit.
    /// If the returned future is dropped before commit, the transaction is
    /// rolled back when the connection returns to the pool.
    pub async fn record(
        pool: &PgPool,
        input: &CreateMovement,
    ) -> Result<MovementReceipt, LedgerError> {
        let mut tx = pool.begin().await?;

        let locked: Option<(i32, i32, String)> = sqlx::query_as(
            "SELECT stock, min_stock, name FROM products \
             WHERE id = $1 AND is_active = true \
             FOR UPDATE",
        )
        .bind(input.product_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((current_stock, min_stock, product_name)) = locked else {
            abandon(tx, input.product_id).await;
            return Err(CoreError::NotFound {
                entity: "Product",
                id: input.product_id,
            }
            .into());
        };

        let applied = apply_movement(input.product_id, current_stock, input.kind, input.quantity);
        let change = match applied {
            Ok(change) => change,
            Err(rejection) => {
                abandon(tx, input.product_id).await;
                tracing::info!(
                    product_id = input.product_id,
                    user_id = input.user_id,
                    kind = %input.kind,
                    quantity = input.quantity,
                    current_stock,
                    "Movement rejected"
                );
                return Err(rejection.into());
            }
        };

        let insert = format!(
            "INSERT INTO movements (kind, quantity, note, product_id, user_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let movement = sqlx::query_as::<_, Movement>(&insert)
            .bind(input.kind.as_str())
            .bind(input.quantity)
            .bind(&input.note)
            .bind(input.product_id)
            .bind(input.user_id)
            .fetch_one(&mut *tx)
            .await?;

        let updated = sqlx::query("UPDATE products SET stock = $2 WHERE id = $1")
            .bind(input.product_id)
            .bind(change.stock_after)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() != 1 {
            abandon(tx, input.product_id).await;
            return Err(CoreError::Internal(format!(
                "Stock update for product {} affected {} rows",
                input.product_id,
                updated.rows_affected()
            ))
            .into());
        }

        tx.commit().await?;

        tracing::debug!(
            movement_id = movement.id,
            product_id = input.product_id,
            stock_before = change.stock_before,
            stock_after = change.stock_after,
            "Movement recorded"
        );

        Ok(MovementReceipt {
            movement,
            product_name,
            stock_before: change.stock_before,
            stock_after: change.stock_after,
            is_low_stock: is_low_stock(change.stock_after, min_stock),
        })
    }

    /// Find a single movement by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Movement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movements WHERE id = $1");
        sqlx::query_as::<_, Movement>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List movements matching `filter`, newest first, with pagination.
    pub async fn list(
        pool: &PgPool,
        filter: &MovementFilter,
    ) -> Result<Vec<MovementListItem>, sqlx::Error> {
        let limit = clamp_limit(filter.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
        let offset = clamp_offset(filter.offset);

        let (where_clause, bind_values, bind_idx) = build_movement_filter(filter);

        let query = format!(
            "SELECT {LIST_COLUMNS} \
             FROM movements m \
             JOIN products p ON p.id = m.product_id \
             JOIN users u ON u.id = m.user_id \
             {where_clause} \
             ORDER BY m.created_at DESC, m.id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let mut q = sqlx::query_as::<_, MovementListItem>(&query);
        for val in &bind_values {
            q = match val {
                BindValue::BigInt(v) => q.bind(*v),
                BindValue::Text(v) => q.bind(*v),
                BindValue::Timestamp(v) => q.bind(*v),
            };
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// All movements of one product in commit order.
    pub async fn history_for_product(
        pool: &PgPool,
        product_id: DbId,
    ) -> Result<Vec<Movement>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM movements WHERE product_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, Movement>(&query)
            .bind(product_id)
            .fetch_all(pool)
            .await
    }

    /// Totals for movements created in `[from, to)`.
    pub async fn summary(
        pool: &PgPool,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<MovementSummary, sqlx::Error> {
        sqlx::query_as::<_, MovementSummary>(
            "SELECT \
                COUNT(*)::BIGINT AS total_movements, \
                COALESCE(SUM(quantity) FILTER (WHERE kind = 'entry'), 0)::BIGINT AS total_entered, \
                COALESCE(SUM(quantity) FILTER (WHERE kind = 'exit'), 0)::BIGINT AS total_exited, \
                COUNT(*) FILTER (WHERE kind = 'entry')::BIGINT AS entry_count, \
                COUNT(*) FILTER (WHERE kind = 'exit')::BIGINT AS exit_count \
             FROM movements \
             WHERE created_at >= $1 AND created_at < $2",
        )
        .bind(from)
        .bind(to)
        .fetch_one(pool)
        .await
    }
}

/// Roll back a transaction that is being abandoned for a domain reason.
///
/// A failed rollback is logged, not returned: the caller's rejection is the
/// meaningful error, and the connection discards the transaction anyway when
/// it goes back to the pool.
async fn abandon(tx: Transaction<'_, Postgres>, product_id: DbId) {
    if let Err(err) = tx.rollback().await {
        tracing::warn!(product_id, error = %err, "Rollback of rejected movement failed");
    }
}

// ---------------------------------------------------------------------------
// Filter builder
// ---------------------------------------------------------------------------

/// A typed bind value collected while building a WHERE clause.
#[derive(Debug, Clone, PartialEq)]
enum BindValue {
    BigInt(i64),
    Text(&'static str),
    Timestamp(Timestamp),
}

/// Build the WHERE clause for [`MovementRepo::list`].
///
/// Returns the clause (empty when unfiltered), the values to bind in order,
/// and the next free placeholder index.
fn build_movement_filter(filter: &MovementFilter) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(kind) = filter.kind {
        conditions.push(format!("m.kind = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(kind.as_str()));
    }

    if let Some(from) = filter.from {
        conditions.push(format!("m.created_at >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(from));
    }

    if let Some(to) = filter.to {
        conditions.push(format!("m.created_at <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(to));
    }

    if let Some(product_id) = filter.product_id {
        conditions.push(format!("m.product_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(product_id));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}
