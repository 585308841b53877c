//! Durable sequence counter repository
//!
//! Counters live in the `sequence_counters` table, keyed by scope. The
//! next value is claimed with a single atomic upsert, so concurrent
//! callers never observe the same value and gaps appear only when a
//! claiming transaction rolls back. Scopes with historical data are
//! seeded by scanning the highest existing identifier; unparseable
//! legacy suffixes restart the scope at 1 with a warning.

use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::warn;

use core_kernel::sequence::{
    account_scope_key, format_identifier, numeric_suffix, SequenceScope, DEFAULT_WIDTH,
};

use crate::error::DatabaseError;

/// Repository for the durable identifier sequences
#[derive(Debug, Clone)]
pub struct SequenceRepository {
    pool: PgPool,
}

impl SequenceRepository {
    /// Creates a new SequenceRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Claims the next value in a scope and returns the formatted identifier
    ///
    /// Runs in its own transaction. Use [`next_in_tx`](Self::next_in_tx)
    /// when the number must be assigned inside an enclosing unit of work
    /// (e.g. a document confirmation) so a rollback releases it with the
    /// rest of the work.
    pub async fn next(&self, scope: SequenceScope) -> Result<String, DatabaseError> {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from_sqlx)?;
        let identifier = Self::next_in_tx(&mut tx, scope).await?;
        tx.commit().await.map_err(DatabaseError::from_sqlx)?;
        Ok(identifier)
    }

    /// Claims the next value in a scope inside an existing transaction
    ///
    /// The upsert is atomic: the row is created at 1 on first use, and
    /// incremented under a row lock thereafter. Two concurrent claims
    /// serialize on that lock and receive distinct values.
    pub async fn next_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        scope: SequenceScope,
    ) -> Result<String, DatabaseError> {
        let row = sqlx::query(
            r#"
            INSERT INTO sequence_counters (scope, prefix, last_value)
            VALUES ($1, $2, 1)
            ON CONFLICT (scope) DO UPDATE
            SET last_value = sequence_counters.last_value + 1
            RETURNING last_value
            "#,
        )
        .bind(scope.key())
        .bind(scope.prefix())
        .fetch_one(&mut **tx)
        .await
        .map_err(DatabaseError::from_sqlx)?;

        let value: i64 = row.get("last_value");
        Ok(scope.format(value as u64))
    }

    /// Claims the next account code under a parent control-account prefix
    ///
    /// Codes read as the parent prefix plus a zero-padded counter
    /// (`2108` yields `2108001`). Each parent owns its own counter row.
    pub async fn next_account_code(&self, parent: &str) -> Result<String, DatabaseError> {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from_sqlx)?;
        let code = Self::next_account_code_in_tx(&mut tx, parent).await?;
        tx.commit().await.map_err(DatabaseError::from_sqlx)?;
        Ok(code)
    }

    /// Claims the next account code inside an existing transaction
    ///
    /// Same atomic upsert as [`next_in_tx`](Self::next_in_tx); a rollback
    /// of the enclosing transaction releases the claimed value.
    pub async fn next_account_code_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        parent: &str,
    ) -> Result<String, DatabaseError> {
        let row = sqlx::query(
            r#"
            INSERT INTO sequence_counters (scope, prefix, last_value)
            VALUES ($1, $2, 1)
            ON CONFLICT (scope) DO UPDATE
            SET last_value = sequence_counters.last_value + 1
            RETURNING last_value
            "#,
        )
        .bind(account_scope_key(parent))
        .bind(parent)
        .fetch_one(&mut **tx)
        .await
        .map_err(DatabaseError::from_sqlx)?;

        let value: i64 = row.get("last_value");
        Ok(format_identifier(parent, value as u64, DEFAULT_WIDTH))
    }

    /// Returns the current counter value without claiming one
    pub async fn current(&self, scope: SequenceScope) -> Result<Option<u64>, DatabaseError> {
        let row = sqlx::query("SELECT last_value FROM sequence_counters WHERE scope = $1")
            .bind(scope.key())
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)?;

        Ok(row.map(|r| r.get::<i64, _>("last_value") as u64))
    }

    /// Seeds a scope's counter from the highest existing identifier
    ///
    /// Used when adopting historical data. When the supplied identifier
    /// does not parse under the scope's prefix, the counter restarts at
    /// zero (so the next claim yields 1) and a warning is logged; the
    /// call never fails on a corrupt suffix.
    pub async fn align_with_existing(
        &self,
        scope: SequenceScope,
        highest_identifier: Option<&str>,
    ) -> Result<u64, DatabaseError> {
        let seed = match highest_identifier {
            Some(identifier) => match numeric_suffix(identifier, scope.prefix()) {
                Some(value) => value,
                None => {
                    warn!(
                        scope = scope.key(),
                        identifier, "Unparseable legacy identifier, restarting sequence at 1"
                    );
                    0
                }
            },
            None => 0,
        };

        sqlx::query(
            r#"
            INSERT INTO sequence_counters (scope, prefix, last_value)
            VALUES ($1, $2, $3)
            ON CONFLICT (scope) DO UPDATE
            SET last_value = GREATEST(sequence_counters.last_value, $3)
            "#,
        )
        .bind(scope.key())
        .bind(scope.prefix())
        .bind(seed as i64)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)?;

        Ok(seed)
    }
}
