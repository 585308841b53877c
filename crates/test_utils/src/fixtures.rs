//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for common entities across the
//! financial core. These fixtures are designed to be consistent and
//! predictable for unit tests.

use chrono::NaiveDate;
use core_kernel::{BatchId, Currency, DocumentId, Money, PaymentId};
use domain_documents::PostingAccounts;
use domain_ledger::{Account, AccountType};
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Creates a standard INR amount for testing
    pub fn inr_100() -> Money {
        Money::new(dec!(100.00), Currency::INR)
    }

    /// Creates a typical retail bill amount
    pub fn inr_bill_total() -> Money {
        Money::new(dec!(2360.00), Currency::INR)
    }

    /// Creates a zero amount
    pub fn inr_zero() -> Money {
        Money::zero(Currency::INR)
    }

    /// Creates a USD amount for currency mismatch tests
    pub fn usd_100() -> Money {
        Money::new(dec!(100.00), Currency::USD)
    }

    /// Creates a negative amount for adjustment scenarios
    pub fn inr_writeoff() -> Money {
        Money::new(dec!(-0.40), Currency::INR)
    }
}

/// Fixture for date test data
pub struct DateFixtures;

impl DateFixtures {
    /// Standard transaction date: Apr 1, 2024, the start of the fiscal year
    pub fn fiscal_year_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 1).expect("valid date")
    }

    /// Mid-year date for cutoff tests
    pub fn mid_year() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 15).expect("valid date")
    }

    /// A date before any fixture transaction
    pub fn before_fiscal_year() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")
    }

    /// Fiscal year end date
    pub fn fiscal_year_end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 31).expect("valid date")
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    /// Creates a deterministic document ID for testing
    pub fn document_id() -> DocumentId {
        DocumentId::from_uuid(
            Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").expect("valid uuid"),
        )
    }

    /// Creates a deterministic batch ID for testing
    pub fn batch_id() -> BatchId {
        BatchId::from_uuid(
            Uuid::parse_str("550e8400-e29b-41d4-a716-446655440002").expect("valid uuid"),
        )
    }

    /// Creates a deterministic payment ID for testing
    pub fn payment_id() -> PaymentId {
        PaymentId::from_uuid(
            Uuid::parse_str("550e8400-e29b-41d4-a716-446655440003").expect("valid uuid"),
        )
    }
}

/// Account codes used across the test chart of accounts
pub mod account_codes {
    pub const CASH: &str = "CASH001";
    pub const CUSTOMER: &str = "CUST001";
    pub const SUPPLIER: &str = "SUPP001";
    pub const SALES: &str = "SALES001";
    pub const PURCHASES: &str = "PURCH001";
    pub const GST_PAYABLE: &str = "GST001";
    /// Hierarchical employee sub-account under parent 2108
    pub const EMPLOYEE_ADVANCE: &str = "2108001";
}

/// Fixture for a minimal chart of accounts covering the posting paths
pub struct ChartFixtures;

impl ChartFixtures {
    /// Cash in hand (asset, debit normal)
    pub fn cash() -> Account {
        Account::new(account_codes::CASH, "Cash In Hand", AccountType::Asset, Currency::INR)
    }

    /// Customer receivable (asset, debit normal)
    pub fn customer() -> Account {
        Account::new(
            account_codes::CUSTOMER,
            "Retail Customer",
            AccountType::Asset,
            Currency::INR,
        )
    }

    /// Supplier payable (liability, credit normal)
    pub fn supplier() -> Account {
        Account::new(
            account_codes::SUPPLIER,
            "Fabric Supplier",
            AccountType::Liability,
            Currency::INR,
        )
    }

    /// Sales revenue (credit normal)
    pub fn sales() -> Account {
        Account::new(account_codes::SALES, "Garment Sales", AccountType::Revenue, Currency::INR)
    }

    /// Purchases (expense, debit normal)
    pub fn purchases() -> Account {
        Account::new(
            account_codes::PURCHASES,
            "Fabric Purchases",
            AccountType::Expense,
            Currency::INR,
        )
    }

    /// GST payable (liability, credit normal)
    pub fn gst_payable() -> Account {
        Account::new(
            account_codes::GST_PAYABLE,
            "GST Payable",
            AccountType::Liability,
            Currency::INR,
        )
    }

    /// Employee advance with an opening balance
    pub fn employee_advance() -> Account {
        Account::new(
            account_codes::EMPLOYEE_ADVANCE,
            "Employee Advance - Tailoring",
            AccountType::Asset,
            Currency::INR,
        )
        .with_opening_balance(Money::new(dec!(5000.00), Currency::INR))
    }

    /// Every account in the test chart
    pub fn all() -> Vec<Account> {
        vec![
            Self::cash(),
            Self::customer(),
            Self::supplier(),
            Self::sales(),
            Self::purchases(),
            Self::gst_payable(),
            Self::employee_advance(),
        ]
    }

    /// Posting accounts for confirming a sales bill
    pub fn sales_posting_accounts() -> PostingAccounts {
        PostingAccounts {
            trading_account: account_codes::SALES.to_string(),
            tax_account: account_codes::GST_PAYABLE.to_string(),
            cash_account: account_codes::CASH.to_string(),
        }
    }

    /// Posting accounts for confirming a purchase order
    pub fn purchase_posting_accounts() -> PostingAccounts {
        PostingAccounts {
            trading_account: account_codes::PURCHASES.to_string(),
            tax_account: account_codes::GST_PAYABLE.to_string(),
            cash_account: account_codes::CASH.to_string(),
        }
    }
}

/// Fixture for string test data
pub struct StringFixtures;

impl StringFixtures {
    /// A representative garment SKU
    pub fn sku() -> &'static str {
        "TSHIRT-M-BLUE"
    }

    /// A second SKU for multi-line bills
    pub fn sku_alt() -> &'static str {
        "JEANS-32-BLACK"
    }

    /// A formatted sales bill number
    pub fn bill_number() -> &'static str {
        "SB0001"
    }

    /// A formatted purchase order number
    pub fn order_number() -> &'static str {
        "PO0001"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_covers_posting_accounts() {
        let codes: Vec<String> = ChartFixtures::all().into_iter().map(|a| a.code).collect();
        let accounts = ChartFixtures::sales_posting_accounts();

        assert!(codes.contains(&accounts.trading_account));
        assert!(codes.contains(&accounts.tax_account));
        assert!(codes.contains(&accounts.cash_account));
    }

    #[test]
    fn test_employee_advance_seeds_cached_balance() {
        let account = ChartFixtures::employee_advance();
        assert_eq!(account.opening_balance, account.current_balance);
    }
}
