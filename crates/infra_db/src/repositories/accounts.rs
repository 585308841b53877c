//! Chart of accounts repository

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use core_kernel::{AccountId, Currency, Money};
use domain_ledger::{Account, AccountType};

use crate::error::DatabaseError;
use crate::repositories::sequences::SequenceRepository;

/// Repository for the chart of accounts
///
/// Accounts are soft-deleted only; ledger history must always be able to
/// resolve the account a posted entry refers to.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Creates a new AccountRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new account
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEntry` when the code is already taken.
    pub async fn create(&self, account: &Account) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from_sqlx)?;
        Self::insert_in_tx(&mut tx, account).await?;
        tx.commit().await.map_err(DatabaseError::from_sqlx)?;
        Ok(())
    }

    /// Creates an account with a code claimed from the parent's sequence
    ///
    /// Onboarding a party or employee-advance account never invents a
    /// code: the next one under the parent control account is claimed and
    /// the row inserted in a single transaction, so a rollback releases
    /// the number with the insert.
    pub async fn create_under_parent(
        &self,
        parent: &str,
        name: impl Into<String>,
        account_type: AccountType,
        currency: Currency,
        opening_balance: Option<Money>,
    ) -> Result<Account, DatabaseError> {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from_sqlx)?;
        let code = SequenceRepository::next_account_code_in_tx(&mut tx, parent).await?;

        let mut account = Account::new(code, name, account_type, currency);
        if let Some(opening) = opening_balance {
            account = account.with_opening_balance(opening);
        }
        Self::insert_in_tx(&mut tx, &account).await?;
        tx.commit().await.map_err(DatabaseError::from_sqlx)?;
        Ok(account)
    }

    async fn insert_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        account: &Account,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id, code, name, account_type, currency,
                opening_balance, current_balance, is_active, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(&account.code)
        .bind(&account.name)
        .bind(account.account_type.as_str())
        .bind(account.currency.code())
        .bind(account.opening_balance.amount())
        .bind(account.current_balance.amount())
        .bind(account.is_active)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| match DatabaseError::from_sqlx(e) {
            DatabaseError::DuplicateEntry(_) => {
                DatabaseError::duplicate("Account", "code", &account.code)
            }
            other => other,
        })?;

        Ok(())
    }

    /// Fetches an account by its business code
    pub async fn get_by_code(&self, code: &str) -> Result<Account, DatabaseError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT * FROM accounts WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)?
        .ok_or_else(|| DatabaseError::not_found("Account", code))?;

        row.into_account()
    }

    /// Lists active accounts, ordered by code
    pub async fn list_active(&self) -> Result<Vec<Account>, DatabaseError> {
        let rows = sqlx::query_as::<_, AccountRow>(
            "SELECT * FROM accounts WHERE is_active = true ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)?;

        rows.into_iter().map(AccountRow::into_account).collect()
    }

    /// Soft-deactivates an account by code
    pub async fn deactivate(&self, code: &str) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE accounts SET is_active = false, updated_at = $2 WHERE code = $1",
        )
        .bind(code)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Account", code));
        }
        Ok(())
    }

    /// Locks the accounts referenced by a posting, in code order
    ///
    /// Locking in a canonical order prevents two concurrent postings that
    /// touch the same accounts from deadlocking against each other. The
    /// caller passes codes pre-sorted and deduplicated.
    pub(crate) async fn lock_for_posting(
        tx: &mut Transaction<'_, Postgres>,
        codes: &[&str],
    ) -> Result<Vec<Account>, DatabaseError> {
        let codes: Vec<String> = codes.iter().map(|c| c.to_string()).collect();
        let rows = sqlx::query_as::<_, AccountRow>(
            "SELECT * FROM accounts WHERE code = ANY($1) ORDER BY code FOR UPDATE",
        )
        .bind(&codes)
        .fetch_all(&mut **tx)
        .await
        .map_err(DatabaseError::from_sqlx)?;

        if rows.len() != codes.len() {
            let found: Vec<&str> = rows.iter().map(|r| r.code.as_str()).collect();
            let missing: Vec<&String> =
                codes.iter().filter(|c| !found.contains(&c.as_str())).collect();
            return Err(DatabaseError::NotFound(format!(
                "Accounts not found: {missing:?}"
            )));
        }

        rows.into_iter().map(AccountRow::into_account).collect()
    }

    /// Applies a balance delta inside a posting transaction
    pub(crate) async fn apply_balance_delta(
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
        delta: Decimal,
    ) -> Result<Decimal, DatabaseError> {
        let row: (Decimal,) = sqlx::query_as(
            r#"
            UPDATE accounts
            SET current_balance = current_balance + $2, updated_at = $3
            WHERE code = $1
            RETURNING current_balance
            "#,
        )
        .bind(code)
        .bind(delta)
        .bind(Utc::now())
        .fetch_one(&mut **tx)
        .await
        .map_err(DatabaseError::from_sqlx)?;

        Ok(row.0)
    }
}

/// Database row for an account
#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub account_id: Uuid,
    pub code: String,
    pub name: String,
    pub account_type: String,
    pub currency: String,
    pub opening_balance: Decimal,
    pub current_balance: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountRow {
    /// Converts the storage row into the domain account
    pub fn into_account(self) -> Result<Account, DatabaseError> {
        let account_type = AccountType::parse(&self.account_type)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        let currency = Currency::parse(&self.currency)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(Account {
            id: AccountId::from_uuid(self.account_id),
            code: self.code,
            name: self.name,
            account_type,
            currency,
            opening_balance: Money::new(self.opening_balance, currency),
            current_balance: Money::new(self.current_balance, currency),
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
