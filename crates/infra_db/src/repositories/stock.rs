//! Stock position repository
//!
//! Confirming a sales bill decrements the on-hand quantity of every SKU
//! it sells, inside the confirming transaction. Quantities may not go
//! negative; a failed deduction aborts the whole confirmation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use domain_documents::{DocumentError, StockMovement};

use crate::error::DatabaseError;
use crate::repositories::documents::DocumentStoreError;

/// Repository for stock positions
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: PgPool,
}

impl StockRepository {
    /// Creates a new StockRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches the on-hand quantity for a SKU
    pub async fn position(&self, sku: &str) -> Result<StockPositionRow, DatabaseError> {
        sqlx::query_as::<_, StockPositionRow>(
            "SELECT * FROM stock_positions WHERE sku = $1",
        )
        .bind(sku)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)?
        .ok_or_else(|| DatabaseError::not_found("Stock position", sku))
    }

    /// Sets the on-hand quantity for a SKU, creating the row if needed
    pub async fn set_position(&self, sku: &str, on_hand: Decimal) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO stock_positions (sku, on_hand, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (sku) DO UPDATE
            SET on_hand = $2, updated_at = $3
            "#,
        )
        .bind(sku)
        .bind(on_hand)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)?;
        Ok(())
    }

    /// Applies the deductions for a confirmed sales bill
    ///
    /// Each movement decrements its SKU under the `on_hand >= quantity`
    /// guard; a miss means the SKU is unknown or short. The first failed
    /// deduction errors out, rolling the enclosing transaction back.
    pub(crate) async fn deduct_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        movements: &[StockMovement],
    ) -> Result<(), DocumentStoreError> {
        for movement in movements {
            let result = sqlx::query(
                r#"
                UPDATE stock_positions
                SET on_hand = on_hand - $2, updated_at = $3
                WHERE sku = $1 AND on_hand >= $2
                "#,
            )
            .bind(&movement.sku)
            .bind(movement.quantity)
            .bind(Utc::now())
            .execute(&mut **tx)
            .await
            .map_err(DatabaseError::from_sqlx)?;

            if result.rows_affected() == 0 {
                return Err(DocumentError::StockDeductionFailed {
                    sku: movement.sku.clone(),
                    reason: format!("on hand is below the requested {}", movement.quantity),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Restores stock for a cancelled sales bill
    pub(crate) async fn restore_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        movements: &[StockMovement],
    ) -> Result<(), DatabaseError> {
        for movement in movements {
            sqlx::query(
                r#"
                INSERT INTO stock_positions (sku, on_hand, updated_at)
                VALUES ($1, $2, $3)
                ON CONFLICT (sku) DO UPDATE
                SET on_hand = stock_positions.on_hand + $2, updated_at = $3
                "#,
            )
            .bind(&movement.sku)
            .bind(movement.quantity)
            .bind(Utc::now())
            .execute(&mut **tx)
            .await
            .map_err(DatabaseError::from_sqlx)?;
        }
        Ok(())
    }
}

/// Database row for a stock position
#[derive(Debug, Clone, FromRow)]
pub struct StockPositionRow {
    pub sku: String,
    pub on_hand: Decimal,
    pub updated_at: DateTime<Utc>,
}
