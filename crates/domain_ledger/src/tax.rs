//! Three-mode tax calculator for bill line items
//!
//! A bill book is configured with one of three tax modes:
//!
//! - `WithoutTax`: no tax arithmetic at all
//! - `ExcludeTax`: item rates are tax-exclusive; tax is added on top
//! - `IncludeTax`: item rates already contain tax; the tax share is
//!   backed out of the rate
//!
//! Discounts are applied before tax (net-of-discount base, then tax), and
//! an absolute discount amount takes precedence over the percentage.
//! Banker's rounding is applied only at the final total; intermediate
//! amounts keep their full internal precision so long bills do not drift.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, Money};

use crate::error::LedgerError;

/// How tax is handled for a bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxMode {
    /// No tax calculations needed
    WithoutTax,
    /// Tax is added on top of item rates
    ExcludeTax,
    /// Tax is included in item rates and must be separated
    IncludeTax,
}

impl TaxMode {
    /// Returns the storage string for this mode
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxMode::WithoutTax => "WITHOUT_TAX",
            TaxMode::ExcludeTax => "EXCLUDE_TAX",
            TaxMode::IncludeTax => "INCLUDE_TAX",
        }
    }

    /// Parses a storage string into a tax mode
    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        match s {
            "WITHOUT_TAX" => Ok(TaxMode::WithoutTax),
            "EXCLUDE_TAX" => Ok(TaxMode::ExcludeTax),
            "INCLUDE_TAX" => Ok(TaxMode::IncludeTax),
            other => Err(LedgerError::validation(format!("Unknown tax mode: {other}"))),
        }
    }
}

/// Raw inputs for one line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineInput {
    /// Quantity (must be positive)
    pub quantity: Decimal,
    /// Unit rate; tax-inclusive or exclusive depending on the mode
    pub rate: Decimal,
    /// Discount as a percentage of the gross line amount
    pub discount_percentage: Decimal,
    /// Absolute discount; takes precedence over the percentage when set
    pub discount_amount: Option<Decimal>,
    /// Tax percentage for this line
    pub tax_percentage: Decimal,
}

impl LineInput {
    /// Creates an input with no discount and no tax
    pub fn new(quantity: Decimal, rate: Decimal) -> Self {
        Self {
            quantity,
            rate,
            discount_percentage: Decimal::ZERO,
            discount_amount: None,
            tax_percentage: Decimal::ZERO,
        }
    }

    /// Sets the discount percentage
    pub fn discount_percent(mut self, pct: Decimal) -> Self {
        self.discount_percentage = pct;
        self
    }

    /// Sets an absolute discount amount
    pub fn discount_absolute(mut self, amount: Decimal) -> Self {
        self.discount_amount = Some(amount);
        self
    }

    /// Sets the tax percentage
    pub fn tax_percent(mut self, pct: Decimal) -> Self {
        self.tax_percentage = pct;
        self
    }

    fn validate(&self) -> Result<(), LedgerError> {
        if self.quantity <= Decimal::ZERO {
            return Err(LedgerError::validation("Quantity must be positive"));
        }
        if self.rate < Decimal::ZERO {
            return Err(LedgerError::validation("Rate must not be negative"));
        }
        if self.discount_percentage < Decimal::ZERO
            || self.discount_percentage > Decimal::ONE_HUNDRED
        {
            return Err(LedgerError::validation(
                "Discount percentage must be between 0 and 100",
            ));
        }
        if let Some(amount) = self.discount_amount {
            if amount < Decimal::ZERO {
                return Err(LedgerError::validation("Discount amount must not be negative"));
            }
        }
        if self.tax_percentage < Decimal::ZERO {
            return Err(LedgerError::validation("Tax percentage must not be negative"));
        }
        Ok(())
    }
}

/// Computed amounts for one line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAmounts {
    /// quantity * rate, before discount
    pub gross: Money,
    /// Total discount applied to the line
    pub discount: Money,
    /// Tax-exclusive base amount after discount
    pub taxable: Money,
    /// Tax amount
    pub tax: Money,
    /// Line total payable
    pub total: Money,
}

/// Aggregated totals for a whole bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillTotals {
    /// Number of lines
    pub item_count: u32,
    /// Sum of quantities across lines
    pub total_quantity: Decimal,
    /// Sum of gross amounts
    pub gross: Money,
    /// Sum of discounts
    pub discount: Money,
    /// Sum of taxable bases
    pub taxable: Money,
    /// Sum of tax amounts
    pub tax: Money,
    /// Manual adjustment applied at the bill level
    pub adjustment: Money,
    /// Final payable amount, banker's-rounded to 2 decimal places
    pub net: Money,
}

impl BillTotals {
    /// Zero totals in the given currency
    pub fn zero(currency: Currency) -> Self {
        let z = Money::zero(currency);
        Self {
            item_count: 0,
            total_quantity: Decimal::ZERO,
            gross: z,
            discount: z,
            taxable: z,
            tax: z,
            adjustment: z,
            net: z,
        }
    }
}

/// Computes all amounts for a single line item
///
/// # Errors
///
/// Returns `Validation` for negative quantity/rate/percentages, a discount
/// larger than the gross amount, or a >100% discount percentage. Nothing
/// is computed for malformed input.
pub fn compute_line(
    mode: TaxMode,
    input: &LineInput,
    currency: Currency,
) -> Result<LineAmounts, LedgerError> {
    input.validate()?;

    let gross = Money::new(input.quantity * input.rate, currency);

    // Absolute discount wins over the percentage when both are supplied
    let discount = match input.discount_amount {
        Some(amount) => Money::new(amount, currency),
        None => Money::new(
            gross.amount() * input.discount_percentage / Decimal::ONE_HUNDRED,
            currency,
        ),
    };

    let net = gross.checked_sub(&discount).map_err(|e| LedgerError::Calculation(e.to_string()))?;
    if net.is_negative() {
        return Err(LedgerError::validation(
            "Discount exceeds the gross line amount",
        ));
    }

    let hundred = Decimal::ONE_HUNDRED;
    let (taxable, tax, total) = match mode {
        TaxMode::IncludeTax if input.tax_percentage > Decimal::ZERO => {
            // Rate already contains tax: back it out of the discounted amount
            let multiplier = Decimal::ONE + input.tax_percentage / hundred;
            let taxable = net
                .divide(multiplier)
                .map_err(|e| LedgerError::Calculation(e.to_string()))?;
            let tax = net - taxable;
            (taxable, tax, net)
        }
        TaxMode::ExcludeTax if input.tax_percentage > Decimal::ZERO => {
            // Tax is added on top of the discounted base
            let tax = Money::new(net.amount() * input.tax_percentage / hundred, currency);
            (net, tax, net + tax)
        }
        _ => (net, Money::zero(currency), net),
    };

    Ok(LineAmounts {
        gross,
        discount,
        taxable,
        tax,
        // Rounding happens once, at the line total
        total: total.round_bankers(2),
    })
}

/// Aggregates line amounts into bill totals
///
/// The final net amount is `taxable + tax + adjustment`, banker's-rounded
/// to 2 decimal places as the single terminal rounding step.
pub fn sum_lines(
    lines: &[(Decimal, LineAmounts)],
    adjustment: Money,
    currency: Currency,
) -> Result<BillTotals, LedgerError> {
    let mut totals = BillTotals::zero(currency);
    totals.adjustment = adjustment;

    for (quantity, amounts) in lines {
        totals.item_count += 1;
        totals.total_quantity += quantity;
        totals.gross = totals
            .gross
            .checked_add(&amounts.gross)
            .map_err(|e| LedgerError::Calculation(e.to_string()))?;
        totals.discount = totals
            .discount
            .checked_add(&amounts.discount)
            .map_err(|e| LedgerError::Calculation(e.to_string()))?;
        totals.taxable = totals
            .taxable
            .checked_add(&amounts.taxable)
            .map_err(|e| LedgerError::Calculation(e.to_string()))?;
        totals.tax = totals
            .tax
            .checked_add(&amounts.tax)
            .map_err(|e| LedgerError::Calculation(e.to_string()))?;
    }

    totals.net = (totals.taxable + totals.tax + adjustment).round_bankers(2);
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(quantity: Decimal, rate: Decimal) -> LineInput {
        LineInput::new(quantity, rate)
    }

    #[test]
    fn test_include_tax_separates_tax_from_rate() {
        let amounts = compute_line(
            TaxMode::IncludeTax,
            &line(dec!(1), dec!(118.00)).tax_percent(dec!(18)),
            Currency::INR,
        )
        .unwrap();

        assert_eq!(amounts.taxable.amount(), dec!(100.00));
        assert_eq!(amounts.tax.amount(), dec!(18.00));
        assert_eq!(amounts.total.amount(), dec!(118.00));
    }

    #[test]
    fn test_exclude_tax_adds_on_top() {
        let amounts = compute_line(
            TaxMode::ExcludeTax,
            &line(dec!(2), dec!(100.00)).tax_percent(dec!(18)),
            Currency::INR,
        )
        .unwrap();

        assert_eq!(amounts.gross.amount(), dec!(200.00));
        assert_eq!(amounts.taxable.amount(), dec!(200.00));
        assert_eq!(amounts.tax.amount(), dec!(36.00));
        assert_eq!(amounts.total.amount(), dec!(236.00));
    }

    #[test]
    fn test_without_tax_has_zero_tax() {
        let amounts = compute_line(
            TaxMode::WithoutTax,
            &line(dec!(3), dec!(50.00)).tax_percent(dec!(18)),
            Currency::INR,
        )
        .unwrap();

        assert_eq!(amounts.tax.amount(), dec!(0));
        assert_eq!(amounts.total.amount(), dec!(150.00));
    }

    #[test]
    fn test_discount_applied_before_tax() {
        // 10% off 200.00 = 180.00 net; 18% tax on the net
        let amounts = compute_line(
            TaxMode::ExcludeTax,
            &line(dec!(2), dec!(100.00))
                .discount_percent(dec!(10))
                .tax_percent(dec!(18)),
            Currency::INR,
        )
        .unwrap();

        assert_eq!(amounts.discount.amount(), dec!(20.00));
        assert_eq!(amounts.taxable.amount(), dec!(180.00));
        assert_eq!(amounts.tax.amount(), dec!(32.40));
        assert_eq!(amounts.total.amount(), dec!(212.40));
    }

    #[test]
    fn test_absolute_discount_takes_precedence() {
        let amounts = compute_line(
            TaxMode::WithoutTax,
            &line(dec!(1), dec!(100.00))
                .discount_percent(dec!(10))
                .discount_absolute(dec!(25.00)),
            Currency::INR,
        )
        .unwrap();

        assert_eq!(amounts.discount.amount(), dec!(25.00));
        assert_eq!(amounts.total.amount(), dec!(75.00));
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let result = compute_line(
            TaxMode::WithoutTax,
            &line(dec!(-1), dec!(100.00)),
            Currency::INR,
        );
        assert!(matches!(result, Err(LedgerError::Validation(_))));
    }

    #[test]
    fn test_discount_exceeding_gross_rejected() {
        let result = compute_line(
            TaxMode::WithoutTax,
            &line(dec!(1), dec!(100.00)).discount_absolute(dec!(150.00)),
            Currency::INR,
        );
        assert!(matches!(result, Err(LedgerError::Validation(_))));
    }

    #[test]
    fn test_bill_totals_sum_and_round_once() {
        let currency = Currency::INR;
        let l1 = compute_line(
            TaxMode::IncludeTax,
            &line(dec!(1), dec!(118.00)).tax_percent(dec!(18)),
            currency,
        )
        .unwrap();
        let l2 = compute_line(
            TaxMode::IncludeTax,
            &line(dec!(2), dec!(59.00)).tax_percent(dec!(18)),
            currency,
        )
        .unwrap();

        let totals = sum_lines(
            &[(dec!(1), l1), (dec!(2), l2)],
            Money::zero(currency),
            currency,
        )
        .unwrap();

        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, dec!(3));
        assert_eq!(totals.taxable.amount(), dec!(200.00));
        assert_eq!(totals.tax.amount(), dec!(36.00));
        assert_eq!(totals.net.amount(), dec!(236.00));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    proptest! {
        /// Backing tax out of a tax-inclusive price and reconstituting
        /// base * (1 + rate) must land within one rounding unit.
        #[test]
        fn include_tax_round_trip(
            price_minor in 1i64..10_000_000i64,
            tax_pct in 1u32..40u32,
        ) {
            let price = Decimal::new(price_minor, 2);
            let pct = Decimal::from(tax_pct);

            let amounts = compute_line(
                TaxMode::IncludeTax,
                &LineInput::new(Decimal::ONE, price).tax_percent(pct),
                Currency::INR,
            ).unwrap();

            let reconstituted =
                amounts.taxable.amount() * (Decimal::ONE + pct / Decimal::ONE_HUNDRED);
            let diff = (reconstituted - price).abs();
            prop_assert!(diff <= Decimal::new(1, 2), "diff {diff} exceeds one cent");

            // Base plus tax share always re-sums to the discounted amount
            let resum = amounts.taxable.amount() + amounts.tax.amount();
            prop_assert!((resum - price).abs() <= Decimal::new(1, 2));
        }

        /// Exclude-tax totals always equal taxable + tax before rounding drift.
        #[test]
        fn exclude_tax_total_is_base_plus_tax(
            rate_minor in 1i64..1_000_000i64,
            qty in 1u32..50u32,
            tax_pct in 0u32..40u32,
        ) {
            let input = LineInput::new(Decimal::from(qty), Decimal::new(rate_minor, 2))
                .tax_percent(Decimal::from(tax_pct));
            let amounts = compute_line(TaxMode::ExcludeTax, &input, Currency::INR).unwrap();

            let expected = (amounts.taxable + amounts.tax).round_bankers(2);
            prop_assert_eq!(amounts.total, expected);
        }
    }
}
