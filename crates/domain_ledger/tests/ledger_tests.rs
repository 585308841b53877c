//! Ledger domain integration tests
//!
//! Exercises batch validation, posting arithmetic, and reversal symmetry
//! across the module boundaries.

use core_kernel::{Currency, Money};
use domain_ledger::{
    balance_delta, Account, AccountType, Batch, EntrySide, LedgerError, TrialBalance,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn inr(amount: Decimal) -> Money {
    Money::new(amount, Currency::INR)
}

/// Applies a validated batch to an in-memory chart of accounts, the same
/// arithmetic the durable poster runs under row locks.
fn apply(batch: &Batch, accounts: &mut [Account]) {
    batch.validate().expect("batch must validate before applying");
    for entry in &batch.entries {
        let account = accounts
            .iter_mut()
            .find(|a| a.code == entry.account_code)
            .expect("entry references a known account");
        let delta = balance_delta(account.account_type, entry.side, entry.amount);
        account.current_balance = account.current_balance + delta;
    }
}

fn chart() -> Vec<Account> {
    vec![
        Account::new("CASH001", "Cash in hand", AccountType::Asset, Currency::INR),
        Account::new("SALES001", "Garment sales", AccountType::Revenue, Currency::INR),
        Account::new("GST001", "GST payable", AccountType::Liability, Currency::INR),
    ]
}

#[test]
fn posting_a_sale_moves_both_balances_on_their_normal_sides() {
    let mut accounts = chart();
    let batch = Batch::new("Cash sale")
        .debit("CASH001", inr(dec!(1000.00)))
        .credit("SALES001", inr(dec!(1000.00)));

    apply(&batch, &mut accounts);

    assert_eq!(accounts[0].current_balance.amount(), dec!(1000.00));
    assert_eq!(accounts[1].current_balance.amount(), dec!(1000.00));
}

#[test]
fn unbalanced_batch_changes_nothing() {
    let mut accounts = chart();
    let batch = Batch::new("Bad sale")
        .debit("CASH001", inr(dec!(1000.00)))
        .credit("SALES001", inr(dec!(900.00)));

    assert!(matches!(
        batch.validate(),
        Err(LedgerError::UnbalancedBatch { .. })
    ));
    // Nothing applied, balances untouched
    assert!(accounts.iter().all(|a| a.current_balance.is_zero()));
}

#[test]
fn reversal_restores_pre_posting_balances_exactly() {
    let mut accounts = chart();
    let batch = Batch::new("Sale with tax")
        .debit("CASH001", inr(dec!(118.00)))
        .credit("SALES001", inr(dec!(100.00)))
        .credit("GST001", inr(dec!(18.00)));

    apply(&batch, &mut accounts);
    apply(&batch.reversal("bill cancelled"), &mut accounts);

    for account in &accounts {
        assert!(
            account.current_balance.is_zero(),
            "{} should be back to zero, found {}",
            account.code,
            account.current_balance
        );
    }
}

#[test]
fn trial_balance_stays_balanced_through_multi_account_postings() {
    let mut accounts = chart();

    let sale = Batch::new("Sale")
        .debit("CASH001", inr(dec!(236.00)))
        .credit("SALES001", inr(dec!(200.00)))
        .credit("GST001", inr(dec!(36.00)));
    apply(&sale, &mut accounts);

    let refund = Batch::new("Partial refund")
        .debit("SALES001", inr(dec!(50.00)))
        .credit("CASH001", inr(dec!(50.00)));
    apply(&refund, &mut accounts);

    let tb = TrialBalance::from_accounts(&accounts, Currency::INR);
    assert!(tb.is_balanced);
    assert_eq!(tb.total_debits, tb.total_credits);
}

mod proptests {
    use super::*;
    use domain_ledger::EntryDraft;
    use proptest::prelude::*;

    proptest! {
        /// Any batch built as debit/credit pairs of equal amounts validates,
        /// and applying it then its reversal is always a no-op.
        #[test]
        fn reversal_is_always_a_no_op(amounts in proptest::collection::vec(1i64..1_000_000i64, 1..10)) {
            let mut accounts = chart();
            let mut batch = Batch::new("Generated");
            for minor in &amounts {
                let amount = Money::from_minor(*minor, Currency::INR);
                batch = batch
                    .entry(EntryDraft::debit("CASH001", amount))
                    .entry(EntryDraft::credit("SALES001", amount));
            }

            apply(&batch, &mut accounts);
            apply(&batch.reversal("prop"), &mut accounts);

            prop_assert!(accounts.iter().all(|a| a.current_balance.is_zero()));
        }
    }
}
