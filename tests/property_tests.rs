//! Property-based tests for the ledger arithmetic.
//!
//! These use proptest to check the GST and aggregation invariants over a wide
//! range of quantities, rates and line orderings.

mod common;

use dairy_ledger::models::{InwardTransaction, LineItem, OutwardTransaction};
use dairy_ledger::services::calculation::{
    document_total, round_amount, DocumentTotals, LineAmounts, TotalBasis,
};
use dairy_ledger::services::csv_export::escape_field;
use dairy_ledger::services::words::{to_words, NumberingSystem};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// Strategies for generating test data
fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..100_000, 0u32..3).prop_map(|(units, scale)| Decimal::new(units, scale))
}

fn rate_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|paise| Decimal::new(paise, 2))
}

fn gst_strategy() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(dec!(0)),
        Just(dec!(5)),
        Just(dec!(12)),
        Just(dec!(18)),
        Just(dec!(28)),
        (0i64..10_000).prop_map(|bp| Decimal::new(bp, 2)),
    ]
}

fn line_strategy() -> impl Strategy<Value = LineItem> {
    (quantity_strategy(), rate_strategy(), gst_strategy())
        .prop_map(|(q, r, g)| common::line("Item", q, r, g))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn line_amounts_follow_the_formula(
        q in quantity_strategy(),
        r in rate_strategy(),
        g in gst_strategy(),
    ) {
        let amounts = LineAmounts::compute(q, r, g).unwrap();
        prop_assert_eq!(amounts.base_amount, round_amount(q * r));
        prop_assert_eq!(amounts.gst_amount, round_amount(q * r * g / Decimal::ONE_HUNDRED));
        prop_assert_eq!(amounts.total_amount, amounts.base_amount + amounts.gst_amount);
        prop_assert!(amounts.gst_amount.scale() <= 2);
    }

    #[test]
    fn totals_do_not_depend_on_line_order(
        (items, shuffled) in prop::collection::vec(line_strategy(), 0..12)
            .prop_flat_map(|items| (Just(items.clone()), Just(items).prop_shuffle())),
        rental in rate_strategy(),
    ) {
        for basis in [TotalBasis::ExcludingGst, TotalBasis::IncludingGst] {
            prop_assert_eq!(
                document_total(&items, basis, rental).unwrap(),
                document_total(&shuffled, basis, rental).unwrap()
            );
        }
        prop_assert_eq!(
            DocumentTotals::from_items(&items, rental).unwrap(),
            DocumentTotals::from_items(&shuffled, rental).unwrap()
        );
    }

    #[test]
    fn outward_total_is_sum_of_line_totals_plus_rental(
        items in prop::collection::vec(line_strategy(), 1..8),
        rental in rate_strategy(),
    ) {
        let mut entry = OutwardTransaction {
            product_details: items,
            ..common::outward()
        };
        entry.set_rental_cost(rental).unwrap();

        let expected: Decimal = entry
            .product_details
            .iter()
            .map(|item| item.total_amount)
            .sum::<Decimal>()
            + round_amount(rental);
        prop_assert_eq!(entry.total, expected);
    }

    #[test]
    fn inward_amount_never_includes_gst(
        items in prop::collection::vec(line_strategy(), 1..8),
    ) {
        let mut entry = InwardTransaction {
            product_details: items,
            ..common::inward(Decimal::ZERO)
        };
        let amount = entry.recalculate().unwrap();
        let base: Decimal = entry
            .product_details
            .iter()
            .map(|item| item.base_amount().unwrap())
            .sum();
        prop_assert_eq!(amount, base);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn words_are_never_blank(n in 0u64..1_000_000_000_000) {
        for system in [NumberingSystem::Indian, NumberingSystem::International] {
            let words = to_words(n, system);
            prop_assert!(words.ends_with(' '));
            prop_assert!(!words.trim().is_empty());
            prop_assert_eq!(words.contains("Zero"), n == 0);
        }
    }

    #[test]
    fn escaped_fields_never_expose_a_bare_comma(raw in ".*") {
        let escaped = escape_field(&raw, ',');
        if raw.contains(',') || raw.contains('"') {
            prop_assert!(escaped.starts_with('"') && escaped.ends_with('"'));
        } else if !raw.contains('\n') && !raw.contains('\r') {
            prop_assert_eq!(escaped, raw);
        }
    }
}

#[test]
fn reference_inward_entry() {
    let mut entry = common::inward(dec!(18));
    let amount = entry.recalculate().unwrap();

    let item = &entry.product_details[0];
    assert_eq!(item.base_amount().unwrap(), dec!(1000.00));
    assert_eq!(item.gst_amount, dec!(180.00));
    assert_eq!(item.total_amount, dec!(1180.00));
    assert_eq!(amount, dec!(1000.00));
}
