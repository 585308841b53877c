//! Ledger DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_ledger::{BatchResult, PostedBatch, TrialBalance};

#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    pub account_code: String,
    /// DEBIT or CREDIT
    pub side: String,
    pub amount: Decimal,
    pub narration: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostBatchRequest {
    pub description: String,
    /// ISO currency code; defaults to INR
    pub currency: Option<String>,
    pub transaction_date: Option<NaiveDate>,
    /// Client-chosen key; a repeat with the same key replays the result
    pub idempotency_key: String,
    pub entries: Vec<EntryRequest>,
}

#[derive(Debug, Deserialize)]
pub struct ReverseBatchRequest {
    pub reason: String,
    pub idempotency_key: String,
}

#[derive(Debug, Serialize)]
pub struct AccountBalanceResponse {
    pub code: String,
    pub balance: Decimal,
}

#[derive(Debug, Serialize)]
pub struct BatchResultResponse {
    pub batch_id: Uuid,
    pub batch_number: String,
    pub replayed: bool,
    pub balances: Vec<AccountBalanceResponse>,
}

impl From<BatchResult> for BatchResultResponse {
    fn from(result: BatchResult) -> Self {
        Self {
            batch_id: *result.batch_id.as_uuid(),
            batch_number: result.batch_number,
            replayed: result.replayed,
            balances: result
                .balances
                .into_iter()
                .map(|b| AccountBalanceResponse {
                    code: b.code,
                    balance: b.balance.amount(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostedEntryResponse {
    pub account_code: String,
    pub side: String,
    pub amount: Decimal,
    pub transaction_date: NaiveDate,
    pub narration: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub batch_id: Uuid,
    pub batch_number: String,
    pub description: String,
    pub currency: String,
    pub reversal_of: Option<Uuid>,
    pub entries: Vec<PostedEntryResponse>,
}

impl From<PostedBatch> for BatchResponse {
    fn from(batch: PostedBatch) -> Self {
        Self {
            batch_id: *batch.id.as_uuid(),
            batch_number: batch.number,
            description: batch.description,
            currency: batch.currency.code().to_string(),
            reversal_of: batch.reversal_of.map(|id| *id.as_uuid()),
            entries: batch
                .entries
                .into_iter()
                .map(|e| PostedEntryResponse {
                    account_code: e.account_code,
                    side: e.side.as_str().to_string(),
                    amount: e.amount.amount(),
                    transaction_date: e.transaction_date,
                    narration: e.narration,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    /// Cutoff date; defaults to today
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub code: String,
    pub as_of: NaiveDate,
    pub balance: Decimal,
}

#[derive(Debug, Serialize)]
pub struct TrialBalanceRowResponse {
    pub account_code: String,
    pub account_name: String,
    pub debit: Decimal,
    pub credit: Decimal,
}

#[derive(Debug, Serialize)]
pub struct TrialBalanceResponse {
    pub rows: Vec<TrialBalanceRowResponse>,
    pub total_debits: Decimal,
    pub total_credits: Decimal,
    pub is_balanced: bool,
}

impl From<TrialBalance> for TrialBalanceResponse {
    fn from(tb: TrialBalance) -> Self {
        Self {
            rows: tb
                .rows
                .into_iter()
                .map(|r| TrialBalanceRowResponse {
                    account_code: r.account_code,
                    account_name: r.account_name,
                    debit: r.debit.amount(),
                    credit: r.credit.amount(),
                })
                .collect(),
            total_debits: tb.total_debits.amount(),
            total_credits: tb.total_credits.amount(),
            is_balanced: tb.is_balanced,
        }
    }
}
