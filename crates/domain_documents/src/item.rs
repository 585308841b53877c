//! Bill line items

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, DocumentItemId};
use domain_ledger::{compute_line, LineAmounts, LineInput, TaxMode};

use crate::error::DocumentError;

/// One line on a sales bill or purchase order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Storage identifier
    pub id: DocumentItemId,
    /// Stock-keeping unit code
    pub sku: String,
    /// Free-text description
    pub description: Option<String>,
    /// Quantity
    pub quantity: Decimal,
    /// Unit rate (tax-inclusive or exclusive per the bill's tax mode)
    pub rate: Decimal,
    /// Discount percentage on the gross line amount
    pub discount_percentage: Decimal,
    /// Absolute discount; takes precedence over the percentage when set
    pub discount_amount: Option<Decimal>,
    /// Tax percentage
    pub tax_percentage: Decimal,
    /// Computed amounts, populated by recomputation
    pub amounts: Option<LineAmounts>,
    /// Set once the stock ledger deduction for this line has succeeded
    pub stock_deducted: bool,
}

impl LineItem {
    /// Creates a line item with no discount and no tax
    pub fn new(sku: impl Into<String>, quantity: Decimal, rate: Decimal) -> Self {
        Self {
            id: DocumentItemId::new_v7(),
            sku: sku.into(),
            description: None,
            quantity,
            rate,
            discount_percentage: Decimal::ZERO,
            discount_amount: None,
            tax_percentage: Decimal::ZERO,
            amounts: None,
            stock_deducted: false,
        }
    }

    /// Sets the description
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
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

    /// Returns the raw calculator input for this line
    pub fn line_input(&self) -> LineInput {
        LineInput {
            quantity: self.quantity,
            rate: self.rate,
            discount_percentage: self.discount_percentage,
            discount_amount: self.discount_amount,
            tax_percentage: self.tax_percentage,
        }
    }

    /// Recomputes this line's amounts under the given tax mode
    pub fn recompute(&mut self, mode: TaxMode, currency: Currency) -> Result<(), DocumentError> {
        let amounts = compute_line(mode, &self.line_input(), currency)?;
        self.amounts = Some(amounts);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_recompute_populates_amounts() {
        let mut item = LineItem::new("TSHIRT-M-BLUE", dec!(2), dec!(59.00)).tax_percent(dec!(18));
        assert!(item.amounts.is_none());

        item.recompute(TaxMode::IncludeTax, Currency::INR).unwrap();

        let amounts = item.amounts.expect("amounts computed");
        assert_eq!(amounts.taxable.amount(), dec!(100.00));
        assert_eq!(amounts.tax.amount(), dec!(18.00));
        assert_eq!(amounts.total.amount(), dec!(118.00));
    }

    #[test]
    fn test_recompute_rejects_bad_input() {
        let mut item = LineItem::new("KURTA-L", dec!(0), dec!(100.00));
        assert!(item.recompute(TaxMode::WithoutTax, Currency::INR).is_err());
    }
}
