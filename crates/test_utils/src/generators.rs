//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use core_kernel::{Currency, Money};
use chrono::{Duration, NaiveDate};
use domain_ledger::{LineInput, TaxMode};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating valid Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::INR),
        Just(Currency::PKR),
        Just(Currency::USD),
        Just(Currency::EUR),
        Just(Currency::GBP),
        Just(Currency::AED),
        Just(Currency::BDT),
    ]
}

/// Strategy for generating valid positive amounts in minor units
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000_000i64
}

/// Strategy for generating valid Money values with positive amounts
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    (positive_amount_minor_strategy(), currency_strategy())
        .prop_map(|(amount, currency)| Money::from_minor(amount, currency))
}

/// Strategy for generating positive INR Money values
pub fn inr_money_strategy() -> impl Strategy<Value = Money> {
    positive_amount_minor_strategy().prop_map(|amount| Money::from_minor(amount, Currency::INR))
}

/// Strategy for generating item quantities (1 to 1000, 2 dp)
pub fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (100i64..100_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for generating unit rates (0.01 to 100,000.00)
pub fn rate_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for generating discount percentages (0% to 100%)
pub fn discount_percentage_strategy() -> impl Strategy<Value = Decimal> {
    (0u32..=10000u32).prop_map(|n| Decimal::new(n as i64, 2))
}

/// Strategy for generating GST slab percentages
pub fn tax_percentage_strategy() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(Decimal::ZERO),
        Just(Decimal::from(5)),
        Just(Decimal::from(12)),
        Just(Decimal::from(18)),
        Just(Decimal::from(28)),
    ]
}

/// Strategy for generating tax modes
pub fn tax_mode_strategy() -> impl Strategy<Value = TaxMode> {
    prop_oneof![
        Just(TaxMode::WithoutTax),
        Just(TaxMode::ExcludeTax),
        Just(TaxMode::IncludeTax),
    ]
}

/// Strategy for generating valid calculator line input
///
/// Discounts use the percentage path only, keeping the invariant that
/// the discount never exceeds the gross amount.
pub fn line_input_strategy() -> impl Strategy<Value = LineInput> {
    (
        quantity_strategy(),
        rate_strategy(),
        discount_percentage_strategy(),
        tax_percentage_strategy(),
    )
        .prop_map(|(quantity, rate, discount_percentage, tax_percentage)| LineInput {
            quantity,
            rate,
            discount_percentage,
            discount_amount: None,
            tax_percentage,
        })
}

/// Strategy for generating dates within fiscal year 2024-25
pub fn fiscal_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..365i64).prop_map(|days| {
        NaiveDate::from_ymd_opt(2024, 4, 1).expect("valid date") + Duration::days(days)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use domain_ledger::compute_line;

    proptest! {
        #[test]
        fn test_line_input_strategy_computes(
            mode in tax_mode_strategy(),
            input in line_input_strategy(),
        ) {
            prop_assert!(compute_line(mode, &input, Currency::INR).is_ok());
        }

        #[test]
        fn test_quantity_strategy_positive(quantity in quantity_strategy()) {
            prop_assert!(quantity > Decimal::ZERO);
        }
    }
}
