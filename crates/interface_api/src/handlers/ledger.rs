//! Ledger posting and reporting handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

use core_kernel::{BatchId, Money};
use domain_ledger::{Batch, EntryDraft, EntrySide};
use infra_db::LedgerRepository;

use crate::dto::ledger::{
    BalanceQuery, BalanceResponse, BatchResponse, BatchResultResponse, PostBatchRequest,
    ReverseBatchRequest, TrialBalanceResponse,
};
use crate::error::ApiError;
use crate::handlers::accounts::parse_currency;
use crate::AppState;

/// Posts a manual ledger batch (journal entry)
pub async fn post_batch(
    State(state): State<AppState>,
    Json(request): Json<PostBatchRequest>,
) -> Result<Json<BatchResultResponse>, ApiError> {
    if request.idempotency_key.trim().is_empty() {
        return Err(ApiError::Validation("idempotency_key must not be empty".into()));
    }

    let currency = parse_currency(request.currency.as_deref())?;
    let mut batch = Batch::new(request.description);
    if let Some(date) = request.transaction_date {
        batch = batch.dated(date);
    }
    for entry in request.entries {
        let side = EntrySide::parse(&entry.side)?;
        let mut draft = match side {
            EntrySide::Debit => {
                EntryDraft::debit(entry.account_code, Money::new(entry.amount, currency))
            }
            EntrySide::Credit => {
                EntryDraft::credit(entry.account_code, Money::new(entry.amount, currency))
            }
        };
        if let Some(narration) = entry.narration {
            draft = draft.with_narration(narration);
        }
        batch = batch.entry(draft);
    }

    let result = LedgerRepository::new(state.pool.clone())
        .post_batch(&batch, &request.idempotency_key)
        .await?;
    Ok(Json(result.into()))
}

/// Gets a committed batch with its entries
pub async fn get_batch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BatchResponse>, ApiError> {
    let batch = LedgerRepository::new(state.pool.clone())
        .get_batch(BatchId::from_uuid(id))
        .await?;
    Ok(Json(batch.into()))
}

/// Reverses a committed batch
pub async fn reverse_batch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ReverseBatchRequest>,
) -> Result<Json<BatchResultResponse>, ApiError> {
    let result = LedgerRepository::new(state.pool.clone())
        .reverse_batch(BatchId::from_uuid(id), &request.reason, &request.idempotency_key)
        .await?;
    Ok(Json(result.into()))
}

/// Returns an account's balance as of a date
pub async fn account_balance(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let as_of = query.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let balance = LedgerRepository::new(state.pool.clone())
        .balance_as_of(&code, as_of)
        .await?;
    Ok(Json(BalanceResponse {
        code,
        as_of,
        balance: balance.amount(),
    }))
}

/// Returns the trial balance across active accounts
pub async fn trial_balance(
    State(state): State<AppState>,
) -> Result<Json<TrialBalanceResponse>, ApiError> {
    let tb = LedgerRepository::new(state.pool.clone())
        .trial_balance(parse_currency(None)?)
        .await?;
    Ok(Json(tb.into()))
}
