//! Durable ledger poster and balance queries
//!
//! `post_batch` is the single write path into the ledger. It validates
//! the batch, replays on an idempotency-key match, locks the referenced
//! accounts in code order, persists the batch and its entries, and
//! applies the signed balance deltas to the cached account balances,
//! all inside one transaction. Nothing is persisted for an unbalanced
//! batch. Reversals are new batches; posted entries are never deleted
//! or mutated.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Row, Transaction};
use tracing::{info, instrument};
use uuid::Uuid;

use core_kernel::sequence::SequenceScope;
use core_kernel::{BatchId, Currency, LedgerEntryId, Money};
use domain_ledger::{
    balance_delta, Account, AccountBalance, Batch, BatchResult, DocumentRef, EntrySide,
    LedgerError, PostedBatch, PostedEntry, TrialBalance,
};

use crate::error::DatabaseError;
use crate::repositories::accounts::AccountRepository;
use crate::repositories::sequences::SequenceRepository;

/// Errors from the posting path
///
/// Ledger rule violations and storage failures are distinct: the former
/// are the caller's problem (fix the batch), the latter are transient or
/// operational.
#[derive(Debug, thiserror::Error)]
pub enum PostingError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for PostingError {
    fn from(error: sqlx::Error) -> Self {
        PostingError::Database(DatabaseError::from_sqlx(error))
    }
}

impl crate::retry::Retryable for PostingError {
    fn is_retryable(&self) -> bool {
        matches!(self, PostingError::Database(e) if e.is_retryable())
    }
}

/// Repository for posting to and reading the ledger
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: PgPool,
}

impl LedgerRepository {
    /// Creates a new LedgerRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Posts a balanced batch atomically
    ///
    /// # Errors
    ///
    /// - `Ledger(UnbalancedBatch | EmptyBatch | InvalidEntry)` before any
    ///   write when the batch fails validation
    /// - `Ledger(AccountInactive)` when a referenced account is soft-deleted
    /// - `Database(NotFound)` when a referenced account does not exist
    /// - `Database(ConcurrencyConflict)` under lock contention; retryable
    #[instrument(skip(self, batch), fields(idempotency_key = %idempotency_key))]
    pub async fn post_batch(
        &self,
        batch: &Batch,
        idempotency_key: &str,
    ) -> Result<BatchResult, PostingError> {
        batch.validate()?;

        let mut tx = self.pool.begin().await?;
        let result = Self::post_batch_in_tx(&mut tx, batch, idempotency_key, None).await?;
        tx.commit().await?;
        Ok(result)
    }

    /// Posts a batch inside an existing transaction
    ///
    /// Used by the document repository so confirmation, numbering, and
    /// posting commit or roll back as one unit.
    pub(crate) async fn post_batch_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        batch: &Batch,
        idempotency_key: &str,
        reversal_of: Option<BatchId>,
    ) -> Result<BatchResult, PostingError> {
        batch.validate()?;

        // Idempotent replay: a key match returns the committed result
        // instead of posting twice.
        if let Some(prior) = Self::find_by_key_in_tx(tx, idempotency_key).await? {
            info!(batch_number = %prior.number, "Idempotency key matched, replaying prior result");
            let balances = Self::balances_for_codes(tx, &prior_entry_codes(&prior)).await?;
            return Ok(BatchResult {
                batch_id: prior.id,
                batch_number: prior.number,
                balances,
                replayed: true,
            });
        }

        let accounts = AccountRepository::lock_for_posting(tx, &batch.account_codes())
            .await
            .map_err(PostingError::Database)?;
        for account in &accounts {
            account.ensure_postable()?;
        }

        let batch_id = BatchId::new_v7();
        let number = SequenceRepository::next_in_tx(tx, SequenceScope::LedgerBatch)
            .await
            .map_err(PostingError::Database)?;
        let posted_at = Utc::now();
        let transaction_date = batch
            .transaction_date
            .unwrap_or_else(|| posted_at.date_naive());
        // Validation rejects empty and mixed-currency batches, so the
        // batch currency is well-defined here.
        let currency = batch.currency().unwrap_or_default();

        sqlx::query(
            r#"
            INSERT INTO ledger_batches (
                batch_id, batch_number, description, currency, document_kind,
                document_id, reversal_of, idempotency_key, posted_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(batch_id.as_uuid())
        .bind(&number)
        .bind(&batch.description)
        .bind(currency.code())
        .bind(batch.document_ref.as_ref().map(|r| r.kind.clone()))
        .bind(batch.document_ref.as_ref().map(|r| r.id))
        .bind(reversal_of.map(|id| *id.as_uuid()))
        .bind(idempotency_key)
        .bind(posted_at)
        .execute(&mut **tx)
        .await?;

        let mut balances = Vec::with_capacity(accounts.len());
        for entry in &batch.entries {
            let entry_id = LedgerEntryId::new_v7();
            sqlx::query(
                r#"
                INSERT INTO ledger_entries (
                    entry_id, batch_id, account_code, side, amount,
                    transaction_date, narration, reconciled
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, false)
                "#,
            )
            .bind(entry_id.as_uuid())
            .bind(batch_id.as_uuid())
            .bind(&entry.account_code)
            .bind(entry.side.as_str())
            .bind(entry.amount.amount())
            .bind(transaction_date)
            .bind(entry.narration.as_deref())
            .execute(&mut **tx)
            .await?;
        }

        // One delta per account, summed across the batch's entries
        for account in &accounts {
            let delta: Decimal = batch
                .entries
                .iter()
                .filter(|e| e.account_code == account.code)
                .map(|e| balance_delta(account.account_type, e.side, e.amount).amount())
                .sum();
            let new_balance =
                AccountRepository::apply_balance_delta(tx, &account.code, delta).await?;
            balances.push(AccountBalance {
                code: account.code.clone(),
                balance: Money::new(new_balance, account.currency),
            });
        }

        info!(batch_number = %number, entries = batch.entries.len(), "Posted ledger batch");
        Ok(BatchResult {
            batch_id,
            batch_number: number,
            balances,
            replayed: false,
        })
    }

    /// Posts the reversal of a committed batch
    ///
    /// The original entries stay untouched; the reversal is a fresh batch
    /// with every side flipped, linked through `reversal_of`.
    pub async fn reverse_batch(
        &self,
        batch_id: BatchId,
        reason: &str,
        idempotency_key: &str,
    ) -> Result<BatchResult, PostingError> {
        let mut tx = self.pool.begin().await?;
        let result =
            Self::reverse_batch_in_tx(&mut tx, batch_id, reason, idempotency_key).await?;
        tx.commit().await?;
        Ok(result)
    }

    /// Reverses a batch inside an existing transaction
    pub(crate) async fn reverse_batch_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        batch_id: BatchId,
        reason: &str,
        idempotency_key: &str,
    ) -> Result<BatchResult, PostingError> {
        let original = Self::get_batch_in_tx(tx, batch_id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Ledger batch", batch_id))?;

        let mut reversal = Batch::new(format!("Reversal: {reason}"));
        reversal.document_ref = original.document_ref.clone();
        for entry in &original.entries {
            reversal.entries.push(domain_ledger::EntryDraft {
                account_code: entry.account_code.clone(),
                side: entry.side.flipped(),
                amount: entry.amount,
                narration: Some(format!("Reversal: {reason}")),
            });
        }

        Self::post_batch_in_tx(tx, &reversal, idempotency_key, Some(batch_id)).await
    }

    /// Fetches a committed batch with its entries
    pub async fn get_batch(&self, batch_id: BatchId) -> Result<PostedBatch, PostingError> {
        let mut tx = self.pool.begin().await?;
        let batch = Self::get_batch_in_tx(&mut tx, batch_id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Ledger batch", batch_id))?;
        tx.commit().await?;
        Ok(batch)
    }

    /// Fetches the committed batch posted for a source document, if any
    pub async fn find_by_document(
        &self,
        document_id: Uuid,
    ) -> Result<Option<PostedBatch>, PostingError> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, BatchRow>(
            r#"
            SELECT * FROM ledger_batches
            WHERE document_id = $1 AND reversal_of IS NULL
            ORDER BY posted_at DESC
            LIMIT 1
            "#,
        )
        .bind(document_id)
        .fetch_optional(&mut *tx)
        .await?;

        let batch = match row {
            Some(row) => Some(Self::hydrate_batch(&mut tx, row).await?),
            None => None,
        };
        tx.commit().await?;
        Ok(batch)
    }

    /// Computes an account's balance as of a date
    ///
    /// Opening balance plus the signed sum of entries dated on or before
    /// the cutoff. The cached `current_balance` is not used here, so the
    /// report stays correct for historical dates.
    pub async fn balance_as_of(
        &self,
        code: &str,
        as_of: NaiveDate,
    ) -> Result<Money, PostingError> {
        let account_row = sqlx::query(
            "SELECT account_type, currency, opening_balance FROM accounts WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Account", code))?;

        let account_type = domain_ledger::AccountType::parse(account_row.get("account_type"))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        let currency = Currency::parse(account_row.get("currency"))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        let opening: Decimal = account_row.get("opening_balance");

        let rows = sqlx::query(
            r#"
            SELECT side, amount FROM ledger_entries
            WHERE account_code = $1 AND transaction_date <= $2
            "#,
        )
        .bind(code)
        .bind(as_of)
        .fetch_all(&self.pool)
        .await?;

        let mut balance = Money::new(opening, currency);
        for row in rows {
            let side = EntrySide::parse(row.get("side"))
                .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            let amount = Money::new(row.get::<Decimal, _>("amount"), currency);
            balance = balance + balance_delta(account_type, side, amount);
        }
        Ok(balance)
    }

    /// Builds the trial balance from the active chart of accounts
    pub async fn trial_balance(&self, currency: Currency) -> Result<TrialBalance, PostingError> {
        let accounts = AccountRepository::new(self.pool.clone())
            .list_active()
            .await?;
        Ok(TrialBalance::from_accounts(&accounts, currency))
    }

    async fn find_by_key_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        idempotency_key: &str,
    ) -> Result<Option<PostedBatch>, PostingError> {
        let row = sqlx::query_as::<_, BatchRow>(
            "SELECT * FROM ledger_batches WHERE idempotency_key = $1",
        )
        .bind(idempotency_key)
        .fetch_optional(&mut **tx)
        .await?;

        match row {
            Some(row) => Ok(Some(Self::hydrate_batch(tx, row).await?)),
            None => Ok(None),
        }
    }

    async fn get_batch_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        batch_id: BatchId,
    ) -> Result<Option<PostedBatch>, PostingError> {
        let row =
            sqlx::query_as::<_, BatchRow>("SELECT * FROM ledger_batches WHERE batch_id = $1")
                .bind(batch_id.as_uuid())
                .fetch_optional(&mut **tx)
                .await?;

        match row {
            Some(row) => Ok(Some(Self::hydrate_batch(tx, row).await?)),
            None => Ok(None),
        }
    }

    async fn hydrate_batch(
        tx: &mut Transaction<'_, Postgres>,
        row: BatchRow,
    ) -> Result<PostedBatch, PostingError> {
        let entry_rows = sqlx::query_as::<_, EntryRow>(
            "SELECT * FROM ledger_entries WHERE batch_id = $1 ORDER BY entry_id",
        )
        .bind(row.batch_id)
        .fetch_all(&mut **tx)
        .await?;

        let currency = Currency::parse(&row.currency)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        let mut entries = Vec::with_capacity(entry_rows.len());
        for e in entry_rows {
            entries.push(e.into_posted_entry(currency)?);
        }
        row.into_posted_batch(currency, entries)
    }

    async fn balances_for_codes(
        tx: &mut Transaction<'_, Postgres>,
        codes: &[String],
    ) -> Result<Vec<AccountBalance>, PostingError> {
        let rows = sqlx::query(
            "SELECT code, currency, current_balance FROM accounts WHERE code = ANY($1) ORDER BY code",
        )
        .bind(codes)
        .fetch_all(&mut **tx)
        .await?;

        let mut balances = Vec::with_capacity(rows.len());
        for row in rows {
            let currency = Currency::parse(row.get("currency"))
                .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            balances.push(AccountBalance {
                code: row.get("code"),
                balance: Money::new(row.get::<Decimal, _>("current_balance"), currency),
            });
        }
        Ok(balances)
    }
}

fn prior_entry_codes(batch: &PostedBatch) -> Vec<String> {
    let mut codes: Vec<String> = batch
        .entries
        .iter()
        .map(|e| e.account_code.clone())
        .collect();
    codes.sort_unstable();
    codes.dedup();
    codes
}

/// Database row for a ledger batch
#[derive(Debug, Clone, FromRow)]
struct BatchRow {
    batch_id: Uuid,
    batch_number: String,
    description: String,
    currency: String,
    document_kind: Option<String>,
    document_id: Option<Uuid>,
    reversal_of: Option<Uuid>,
    idempotency_key: String,
    posted_at: chrono::DateTime<Utc>,
}

impl BatchRow {
    fn into_posted_batch(
        self,
        currency: Currency,
        entries: Vec<PostedEntry>,
    ) -> Result<PostedBatch, PostingError> {
        let document_ref = match (self.document_kind, self.document_id) {
            (Some(kind), Some(id)) => Some(DocumentRef::new(kind, id)),
            _ => None,
        };
        Ok(PostedBatch {
            id: BatchId::from_uuid(self.batch_id),
            number: self.batch_number,
            description: self.description,
            currency,
            document_ref,
            reversal_of: self.reversal_of.map(BatchId::from_uuid),
            idempotency_key: self.idempotency_key,
            entries,
            posted_at: self.posted_at,
        })
    }
}

/// Database row for a ledger entry
#[derive(Debug, Clone, FromRow)]
struct EntryRow {
    entry_id: Uuid,
    account_code: String,
    side: String,
    amount: Decimal,
    transaction_date: NaiveDate,
    narration: Option<String>,
    reconciled: bool,
    reconciled_on: Option<NaiveDate>,
}

impl EntryRow {
    fn into_posted_entry(self, currency: Currency) -> Result<PostedEntry, PostingError> {
        let side = EntrySide::parse(&self.side)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        Ok(PostedEntry {
            id: LedgerEntryId::from_uuid(self.entry_id),
            account_code: self.account_code,
            side,
            // Entries store bare amounts; the batch row carries the currency.
            amount: Money::new(self.amount, currency),
            transaction_date: self.transaction_date,
            narration: self.narration,
            reconciled: self.reconciled,
            reconciled_on: self.reconciled_on,
        })
    }
}
