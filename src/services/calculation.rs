//! Line-item and document arithmetic.
//!
//! One place for the GST maths that every inward/outward flow uses:
//! `base = quantity * rate`, `gst = base * gst% / 100`, `total = base + gst`,
//! each rounded half away from zero to two decimals. Every operation is
//! checked; a figure too large for a `Decimal` is an `InvalidInput` error.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::errors::ServiceError;
use crate::models::LineItem;

fn out_of_range() -> ServiceError {
    ServiceError::InvalidInput("amount is too large to calculate".to_string())
}

fn checked_sum(lhs: Decimal, rhs: Decimal) -> Result<Decimal, ServiceError> {
    lhs.checked_add(rhs).ok_or_else(out_of_range)
}

/// Rounds to two decimal places, half away from zero.
pub fn round_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Renders an amount with exactly two decimals, e.g. `1000.00`.
pub fn format_amount(value: Decimal) -> String {
    let mut rounded = round_amount(value);
    rounded.rescale(2);
    rounded.to_string()
}

/// Permissive numeric coercion: anything that is not a number is zero.
pub fn parse_amount(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .unwrap_or(Decimal::ZERO)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineAmounts {
    pub base_amount: Decimal,
    pub gst_amount: Decimal,
    pub total_amount: Decimal,
}

impl LineAmounts {
    /// Negative inputs are not rejected here; form validation owns that rule.
    pub fn compute(
        quantity: Decimal,
        rate: Decimal,
        gst_percentage: Decimal,
    ) -> Result<Self, ServiceError> {
        let base = quantity.checked_mul(rate).ok_or_else(out_of_range)?;
        let gst = base
            .checked_mul(gst_percentage)
            .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
            .ok_or_else(out_of_range)?;

        let base_amount = round_amount(base);
        let gst_amount = round_amount(gst);
        Ok(Self {
            base_amount,
            gst_amount,
            total_amount: checked_sum(base_amount, gst_amount)?,
        })
    }

    /// Same as [`LineAmounts::compute`] for raw form input.
    pub fn from_input(
        quantity: &str,
        rate: &str,
        gst_percentage: &str,
    ) -> Result<Self, ServiceError> {
        Self::compute(
            parse_amount(quantity),
            parse_amount(rate),
            parse_amount(gst_percentage),
        )
    }

    pub fn has_gst(&self) -> bool {
        !self.gst_amount.is_zero()
    }
}

/// Which line figure a document total is built from.
///
/// Inward entries store a GST-exclusive `amount`; outward entries store a
/// GST-inclusive `total`. Both add the transport rental cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalBasis {
    ExcludingGst,
    IncludingGst,
}

pub fn document_total<'a, I>(
    items: I,
    basis: TotalBasis,
    rental_cost: Decimal,
) -> Result<Decimal, ServiceError>
where
    I: IntoIterator<Item = &'a LineItem>,
{
    let lines = items.into_iter().try_fold(Decimal::ZERO, |sum, item| {
        let amounts = item.amounts()?;
        let figure = match basis {
            TotalBasis::ExcludingGst => amounts.base_amount,
            TotalBasis::IncludingGst => amounts.total_amount,
        };
        checked_sum(sum, figure)
    })?;
    checked_sum(lines, round_amount(rental_cost))
}

/// Totals shown at the foot of an invoice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTotals {
    pub taxable_value: Decimal,
    pub total_gst: Decimal,
    pub rental_cost: Decimal,
    pub grand_total: Decimal,
}

impl DocumentTotals {
    pub fn from_items(items: &[LineItem], rental_cost: Decimal) -> Result<Self, ServiceError> {
        let mut taxable_value = Decimal::ZERO;
        let mut total_gst = Decimal::ZERO;
        for item in items {
            let amounts = item.amounts()?;
            taxable_value = checked_sum(taxable_value, amounts.base_amount)?;
            total_gst = checked_sum(total_gst, amounts.gst_amount)?;
        }
        let rental_cost = round_amount(rental_cost);
        let grand_total = checked_sum(checked_sum(taxable_value, total_gst)?, rental_cost)?;
        Ok(Self {
            taxable_value,
            total_gst,
            rental_cost,
            grand_total,
        })
    }
}

/// Tax summary row for one GST rate. CGST and SGST split the tax evenly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GstRateSummary {
    pub rate: Decimal,
    pub taxable_value: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub total_tax: Decimal,
}

/// Groups lines with a nonzero GST rate, ordered by rate.
pub fn gst_summary(items: &[LineItem]) -> Result<Vec<GstRateSummary>, ServiceError> {
    let mut by_rate: BTreeMap<Decimal, (Decimal, Decimal)> = BTreeMap::new();
    for item in items {
        let rate = item.gst_percentage.normalize();
        if rate.is_zero() {
            continue;
        }
        let amounts = item.amounts()?;
        let entry = by_rate.entry(rate).or_default();
        entry.0 = checked_sum(entry.0, amounts.base_amount)?;
        entry.1 = checked_sum(entry.1, amounts.gst_amount)?;
    }

    Ok(by_rate
        .into_iter()
        .map(|(rate, (taxable_value, total_tax))| {
            let cgst = round_amount(total_tax / Decimal::TWO);
            GstRateSummary {
                rate,
                taxable_value,
                cgst,
                sgst: total_tax - cgst,
                total_tax,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(quantity: Decimal, rate: Decimal, gst: Decimal) -> LineItem {
        LineItem {
            quantity,
            product_rate: rate,
            gst_percentage: gst,
            ..Default::default()
        }
    }

    #[test]
    fn computes_base_gst_and_total() {
        let amounts = LineAmounts::compute(dec!(10), dec!(100), dec!(18)).unwrap();
        assert_eq!(amounts.base_amount, dec!(1000.00));
        assert_eq!(amounts.gst_amount, dec!(180.00));
        assert_eq!(amounts.total_amount, dec!(1180.00));
        assert!(amounts.has_gst());
    }

    #[test]
    fn rounds_half_away_from_zero() {
        // 3 * 0.35 * 5 / 100 = 0.0525
        let amounts = LineAmounts::compute(dec!(3), dec!(0.35), dec!(5)).unwrap();
        assert_eq!(amounts.base_amount, dec!(1.05));
        assert_eq!(amounts.gst_amount, dec!(0.05));
        assert_eq!(amounts.total_amount, dec!(1.10));
    }

    #[test]
    fn junk_input_is_zero() {
        let amounts = LineAmounts::from_input("abc", "100", "").unwrap();
        assert_eq!(amounts, LineAmounts::default());
        assert_eq!(parse_amount(" 12.50 "), dec!(12.50));
        assert_eq!(parse_amount("1e3"), dec!(1000));
    }

    #[test]
    fn negative_values_pass_through() {
        let amounts = LineAmounts::compute(dec!(-2), dec!(50), dec!(0)).unwrap();
        assert_eq!(amounts.total_amount, dec!(-100.00));
    }

    #[test]
    fn totals_follow_basis_and_add_rental() {
        let items = vec![
            line(dec!(10), dec!(100), dec!(18)),
            line(dec!(5), dec!(40), dec!(0)),
        ];
        assert_eq!(
            document_total(&items, TotalBasis::ExcludingGst, Decimal::ZERO).unwrap(),
            dec!(1200.00)
        );
        assert_eq!(
            document_total(&items, TotalBasis::IncludingGst, dec!(250)).unwrap(),
            dec!(1630.00)
        );
    }

    #[test]
    fn document_totals_split_tax_and_rental() {
        let items = vec![line(dec!(2), dec!(50), dec!(5)), line(dec!(1), dec!(200), dec!(12))];
        let totals = DocumentTotals::from_items(&items, dec!(150)).unwrap();
        assert_eq!(totals.taxable_value, dec!(300.00));
        assert_eq!(totals.total_gst, dec!(29.00));
        assert_eq!(totals.rental_cost, dec!(150.00));
        assert_eq!(totals.grand_total, dec!(479.00));
    }

    #[test]
    fn gst_summary_groups_by_rate_and_skips_zero() {
        let items = vec![
            line(dec!(1), dec!(100), dec!(18)),
            line(dec!(1), dec!(50), dec!(0)),
            line(dec!(2), dec!(100), dec!(18.0)),
            line(dec!(1), dec!(33), dec!(5)),
        ];
        let summary = gst_summary(&items).unwrap();
        assert_eq!(summary.len(), 2);

        assert_eq!(summary[0].rate, dec!(5));
        assert_eq!(summary[0].taxable_value, dec!(33.00));
        assert_eq!(summary[0].total_tax, dec!(1.65));
        assert_eq!(summary[0].cgst, dec!(0.83));
        assert_eq!(summary[0].sgst, dec!(0.82));

        assert_eq!(summary[1].rate, dec!(18));
        assert_eq!(summary[1].taxable_value, dec!(300.00));
        assert_eq!(summary[1].total_tax, dec!(54.00));
        assert_eq!(summary[1].cgst + summary[1].sgst, dec!(54.00));
    }

    #[test]
    fn oversized_line_is_an_error() {
        let err = LineAmounts::from_input("1e20", "1e20", "0").unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        assert!(LineAmounts::compute(Decimal::MAX, dec!(1), dec!(18)).is_err());
        assert!(LineAmounts::compute(Decimal::MAX, dec!(1), dec!(0)).is_ok());
    }

    #[test]
    fn oversized_totals_are_errors() {
        let items = vec![
            line(Decimal::MAX, dec!(1), dec!(0)),
            line(dec!(1), dec!(1), dec!(0)),
        ];
        assert!(document_total(&items, TotalBasis::ExcludingGst, Decimal::ZERO).is_err());
        assert!(DocumentTotals::from_items(&items[..1], dec!(10)).is_err());
        assert!(gst_summary(&[line(Decimal::MAX, dec!(1), dec!(18))]).is_err());
    }

    #[test]
    fn format_amount_pads_two_decimals() {
        assert_eq!(format_amount(dec!(1000)), "1000.00");
        assert_eq!(format_amount(dec!(0.005)), "0.01");
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
    }
}
