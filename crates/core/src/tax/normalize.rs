//! Derivation of missing monetary fields.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// The four monetary fields of a financial document.
///
/// Any subset may be present after extraction; `normalize` fills the
/// gaps that are arithmetically derivable from the fields supplied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    /// Taxable base amount.
    pub base: Option<Decimal>,
    /// Tax amount.
    pub tax_amount: Option<Decimal>,
    /// Tax percentage (e.g., 21 for 21% VAT).
    pub tax_percentage: Option<Decimal>,
    /// Total amount (base + tax).
    pub total: Option<Decimal>,
}

/// Rounds to 2-decimal currency precision with half-up rounding.
fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

impl TaxBreakdown {
    /// Creates a breakdown from the four optional fields.
    #[must_use]
    pub const fn new(
        base: Option<Decimal>,
        tax_amount: Option<Decimal>,
        tax_percentage: Option<Decimal>,
        total: Option<Decimal>,
    ) -> Self {
        Self {
            base,
            tax_amount,
            tax_percentage,
            total,
        }
    }

    /// Fills derivable gaps from the fields present.
    ///
    /// Derivations, applied in order:
    /// - base & percentage, no tax amount: `tax_amount = round(base * pct / 100)`
    /// - base & tax amount, no percentage: `pct = round(tax_amount / base * 100)`
    /// - base & tax amount, no total: `total = base + tax_amount`
    ///
    /// A zero base never participates in a derivation, so no division by
    /// zero can occur. When all four fields are already supplied their
    /// consistency is NOT validated here; that is the caller's concern.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        let base = self.base.filter(|b| !b.is_zero());

        if let (Some(base), Some(pct), None) = (base, self.tax_percentage, self.tax_amount) {
            self.tax_amount = Some(round_currency(base * pct / Decimal::ONE_HUNDRED));
        }

        if let (Some(base), Some(tax), None) = (base, self.tax_amount, self.tax_percentage) {
            self.tax_percentage = Some(round_currency(tax / base * Decimal::ONE_HUNDRED));
        }

        if let (Some(base), Some(tax), None) = (self.base, self.tax_amount, self.total) {
            self.total = Some(base + tax);
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_derives_tax_amount_and_total_from_base_and_percentage() {
        let result =
            TaxBreakdown::new(Some(dec!(100.00)), None, Some(dec!(21)), None).normalize();

        assert_eq!(result.tax_amount, Some(dec!(21.00)));
        assert_eq!(result.total, Some(dec!(121.00)));
        assert_eq!(result.base, Some(dec!(100.00)));
        assert_eq!(result.tax_percentage, Some(dec!(21)));
    }

    #[test]
    fn test_derives_percentage_from_base_and_tax_amount() {
        let result =
            TaxBreakdown::new(Some(dec!(100.00)), Some(dec!(21.00)), None, None).normalize();

        assert_eq!(result.tax_percentage, Some(dec!(21.00)));
        assert_eq!(result.total, Some(dec!(121.00)));
    }

    #[test]
    fn test_half_up_rounding_of_derived_tax_amount() {
        // 33.33 * 10.5% = 3.49965 -> 3.50
        let result =
            TaxBreakdown::new(Some(dec!(33.33)), None, Some(dec!(10.5)), None).normalize();

        assert_eq!(result.tax_amount, Some(dec!(3.50)));
    }

    #[test]
    fn test_supplied_fields_are_never_overwritten() {
        let result = TaxBreakdown::new(
            Some(dec!(100.00)),
            Some(dec!(99.99)),
            Some(dec!(21)),
            Some(dec!(1.00)),
        )
        .normalize();

        // No consistency validation: inconsistent inputs pass through.
        assert_eq!(result.tax_amount, Some(dec!(99.99)));
        assert_eq!(result.total, Some(dec!(1.00)));
    }

    #[test]
    fn test_zero_base_never_divides() {
        let result =
            TaxBreakdown::new(Some(dec!(0.00)), Some(dec!(21.00)), None, None).normalize();

        assert_eq!(result.tax_percentage, None);
        // Total addition is still fine with a zero base.
        assert_eq!(result.total, Some(dec!(21.00)));
    }

    #[test]
    fn test_nothing_derivable_without_base() {
        let result = TaxBreakdown::new(None, Some(dec!(21.00)), Some(dec!(21)), None).normalize();

        assert_eq!(result.total, None);
        assert_eq!(result.base, None);
    }

    #[test]
    fn test_empty_breakdown_stays_empty() {
        let result = TaxBreakdown::default().normalize();
        assert_eq!(result, TaxBreakdown::default());
    }
}
