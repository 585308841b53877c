//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use core_kernel::Money;
use domain_documents::Document;
use domain_ledger::Batch;
use rust_decimal::Decimal;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more
/// than the tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={:?}, expected={:?}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that two Money values are exactly equal
pub fn assert_money_eq(actual: &Money, expected: &Money) {
    assert_money_approx_eq(actual, expected, Decimal::ZERO);
}

/// Asserts that a Money value is positive
pub fn assert_money_positive(money: &Money) {
    assert!(
        money.is_positive(),
        "Expected positive money, got {} {}",
        money.currency().symbol(),
        money.amount()
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(
        money.is_zero(),
        "Expected zero money, got {} {}",
        money.currency().symbol(),
        money.amount()
    );
}

/// Asserts that a batch's debit and credit totals match
pub fn assert_batch_balanced(batch: &Batch) {
    let (debits, credits) = batch.totals();
    assert_eq!(
        debits, credits,
        "Batch is unbalanced: debits={debits}, credits={credits}"
    );
}

/// Asserts that a document's totals are internally consistent
///
/// Checks that `net = taxable + tax + adjustment` and that the line
/// count matches the item count.
pub fn assert_document_totals_consistent(document: &Document) {
    let totals = &document.totals;
    let expected_net = totals.taxable.amount() + totals.tax.amount() + totals.adjustment.amount();

    assert_eq!(
        totals.net.amount(),
        expected_net.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointNearestEven),
        "Net amount does not equal taxable + tax + adjustment"
    );
    assert_eq!(
        totals.item_count as usize,
        document.items.len(),
        "Item count does not match the number of lines"
    );
}

/// Asserts that money values sum to a total
///
/// # Panics
///
/// Panics if the sum doesn't equal the total
pub fn assert_money_sum_equals(parts: &[Money], total: &Money) {
    let sum = parts.iter().fold(Money::zero(total.currency()), |acc, m| {
        acc.checked_add(m).expect("Currency mismatch in sum")
    });

    assert_eq!(
        sum.amount(),
        total.amount(),
        "Sum of parts ({}) doesn't equal total ({})",
        sum.amount(),
        total.amount()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{TestBatchBuilder, TestDocumentBuilder};
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_approx_eq_within_tolerance() {
        let a = Money::new(dec!(100.00), Currency::INR);
        let b = Money::new(dec!(100.004), Currency::INR);
        assert_money_approx_eq(&a, &b, dec!(0.01));
    }

    #[test]
    #[should_panic(expected = "differ by more than tolerance")]
    fn test_money_approx_eq_outside_tolerance() {
        let a = Money::new(dec!(100.00), Currency::INR);
        let b = Money::new(dec!(101.00), Currency::INR);
        assert_money_approx_eq(&a, &b, dec!(0.01));
    }

    #[test]
    fn test_batch_balanced_assertion() {
        let batch = TestBatchBuilder::cash_sale(dec!(500.00)).build();
        assert_batch_balanced(&batch);
    }

    #[test]
    fn test_document_totals_assertion() {
        let document = TestDocumentBuilder::new().build();
        assert_document_totals_consistent(&document);
    }
}
