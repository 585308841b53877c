//! Account DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use domain_ledger::Account;

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Explicit business code (e.g. "CASH001"); omit to generate one
    pub code: Option<String>,
    /// Parent control-account prefix (e.g. "2108"); when set and no code
    /// is given, the next code under the parent is generated
    pub parent: Option<String>,
    pub name: String,
    /// ASSET, LIABILITY, EQUITY, REVENUE, or EXPENSE
    pub account_type: String,
    /// ISO currency code; defaults to INR
    pub currency: Option<String>,
    pub opening_balance: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub code: String,
    pub name: String,
    pub account_type: String,
    pub currency: String,
    pub opening_balance: Decimal,
    pub current_balance: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            code: account.code,
            name: account.name,
            account_type: account.account_type.as_str().to_string(),
            currency: account.currency.code().to_string(),
            opening_balance: account.opening_balance.amount(),
            current_balance: account.current_balance.amount(),
            is_active: account.is_active,
            created_at: account.created_at,
        }
    }
}
