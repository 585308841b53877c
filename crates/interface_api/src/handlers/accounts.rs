//! Chart of accounts handlers

use axum::extract::{Path, State};
use axum::Json;

use core_kernel::{Currency, Money};
use domain_ledger::{Account, AccountType};
use infra_db::AccountRepository;

use crate::dto::accounts::{AccountResponse, CreateAccountRequest};
use crate::error::ApiError;
use crate::AppState;

/// Creates an account
///
/// Control accounts carry an explicit `code`; party and employee-advance
/// accounts omit it and name a `parent` prefix instead, and the next code
/// under that parent is generated inside the creating transaction.
pub async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account_type = AccountType::parse(&request.account_type)?;
    let currency = parse_currency(request.currency.as_deref())?;
    let opening = request
        .opening_balance
        .map(|amount| Money::new(amount, currency));
    let repo = AccountRepository::new(state.pool.clone());

    let account = match (request.code, request.parent) {
        (Some(code), _) => {
            let mut account = Account::new(code, request.name, account_type, currency);
            if let Some(opening) = opening {
                account = account.with_opening_balance(opening);
            }
            repo.create(&account).await?;
            account
        }
        (None, Some(parent)) => {
            repo.create_under_parent(&parent, request.name, account_type, currency, opening)
                .await?
        }
        (None, None) => {
            return Err(ApiError::Validation(
                "Either an explicit code or a parent prefix is required".to_string(),
            ))
        }
    };

    Ok(Json(account.into()))
}

/// Lists active accounts
pub async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let accounts = AccountRepository::new(state.pool.clone())
        .list_active()
        .await?;
    Ok(Json(accounts.into_iter().map(AccountResponse::from).collect()))
}

/// Gets an account by code
pub async fn get_account(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = AccountRepository::new(state.pool.clone())
        .get_by_code(&code)
        .await?;
    Ok(Json(account.into()))
}

/// Soft-deactivates an account
pub async fn deactivate_account(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let repo = AccountRepository::new(state.pool.clone());
    repo.deactivate(&code).await?;
    let account = repo.get_by_code(&code).await?;
    Ok(Json(account.into()))
}

pub(crate) fn parse_currency(code: Option<&str>) -> Result<Currency, ApiError> {
    match code {
        Some(code) => {
            Currency::parse(code).map_err(|e| ApiError::Validation(e.to_string()))
        }
        None => Ok(Currency::default()),
    }
}
