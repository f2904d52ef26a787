//! Rupee amounts in English words.
//!
//! Output keeps the shape invoices already print: every word is followed by a
//! single space (`24000` -> `"Twenty Four Thousand "`) and the currency words
//! are added by [`amount_in_words`], not by the converters.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

const ONES: [&str; 20] = [
    "",
    "One ",
    "Two ",
    "Three ",
    "Four ",
    "Five ",
    "Six ",
    "Seven ",
    "Eight ",
    "Nine ",
    "Ten ",
    "Eleven ",
    "Twelve ",
    "Thirteen ",
    "Fourteen ",
    "Fifteen ",
    "Sixteen ",
    "Seventeen ",
    "Eighteen ",
    "Nineteen ",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const INTERNATIONAL_SCALES: [(u64, &str); 6] = [
    (1_000_000_000_000_000_000, "Quintillion "),
    (1_000_000_000_000_000, "Quadrillion "),
    (1_000_000_000_000, "Trillion "),
    (1_000_000_000, "Billion "),
    (1_000_000, "Million "),
    (1_000, "Thousand "),
];

/// Digit grouping used when spelling out an amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberingSystem {
    /// Crore, lakh, thousand, hundred.
    #[default]
    Indian,
    /// Thousand, million, billion and up.
    International,
}

fn below_hundred(n: u64) -> String {
    debug_assert!(n < 100);
    if n < 20 {
        ONES[n as usize].to_string()
    } else {
        format!("{} {}", TENS[(n / 10) as usize], ONES[(n % 10) as usize])
    }
}

fn below_thousand(n: u64) -> String {
    debug_assert!(n < 1000);
    let mut words = String::new();
    if n >= 100 {
        words.push_str(ONES[(n / 100) as usize]);
        words.push_str("Hundred ");
    }
    words.push_str(&below_hundred(n % 100));
    words
}

/// Appends the final 0..=999 group, with "and" before the last two digits
/// when anything precedes them.
fn push_tail(words: &mut String, tail: u64) {
    let hundreds = tail / 100;
    let rest = tail % 100;
    if hundreds > 0 {
        words.push_str(ONES[hundreds as usize]);
        words.push_str("Hundred ");
    }
    if rest > 0 {
        if !words.is_empty() {
            words.push_str("and ");
        }
        words.push_str(&below_hundred(rest));
    }
}

fn indian(n: u64) -> String {
    let crore = n / 10_000_000;
    let lakh = (n / 100_000) % 100;
    let thousand = (n / 1_000) % 100;

    let mut words = String::new();
    if crore > 0 {
        if crore < 100 {
            words.push_str(&below_hundred(crore));
        } else {
            words.push_str(&indian(crore));
        }
        words.push_str("Crore ");
    }
    if lakh > 0 {
        words.push_str(&below_hundred(lakh));
        words.push_str("Lakh ");
    }
    if thousand > 0 {
        words.push_str(&below_hundred(thousand));
        words.push_str("Thousand ");
    }
    push_tail(&mut words, n % 1_000);
    words
}

fn international(n: u64) -> String {
    let mut words = String::new();
    for (scale, label) in INTERNATIONAL_SCALES {
        let group = (n / scale) % 1_000;
        if group > 0 {
            words.push_str(&below_thousand(group));
            words.push_str(label);
        }
    }
    push_tail(&mut words, n % 1_000);
    words
}

pub fn to_words(n: u64, system: NumberingSystem) -> String {
    if n == 0 {
        return "Zero ".to_string();
    }
    match system {
        NumberingSystem::Indian => indian(n),
        NumberingSystem::International => international(n),
    }
}

/// Indian-grouped words for `n`, trailing space included.
pub fn convert_to_words(n: u64) -> String {
    to_words(n, NumberingSystem::Indian)
}

/// `Rupees <words> Only` for the integer part of `amount`; paise are dropped.
pub fn amount_in_words(amount: Decimal, system: NumberingSystem) -> String {
    let whole = amount.trunc();
    let words = match whole.abs().to_u64() {
        Some(rupees) => to_words(rupees, system),
        None => format!("{} ", whole.abs()),
    };
    let sign = if whole.is_sign_negative() && !whole.is_zero() {
        "Minus "
    } else {
        ""
    };
    format!("Rupees {sign}{}Only", words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(0, "Zero ")]
    #[case(7, "Seven ")]
    #[case(19, "Nineteen ")]
    #[case(20, "Twenty ")]
    #[case(45, "Forty Five ")]
    #[case(100, "One Hundred ")]
    #[case(1180, "One Thousand One Hundred and Eighty ")]
    #[case(24000, "Twenty Four Thousand ")]
    #[case(99999, "Ninety Nine Thousand Nine Hundred and Ninety Nine ")]
    #[case(150000, "One Lakh Fifty Thousand ")]
    #[case(12345678, "One Crore Twenty Three Lakh Forty Five Thousand Six Hundred and Seventy Eight ")]
    #[case(1_500_000_000, "One Hundred and Fifty Crore ")]
    fn indian_words(#[case] n: u64, #[case] expected: &str) {
        assert_eq!(convert_to_words(n), expected);
    }

    #[rstest]
    #[case(24000, "Twenty Four Thousand ")]
    #[case(150000, "One Hundred Fifty Thousand ")]
    #[case(2_000_005, "Two Million and Five ")]
    #[case(1_234_567_890, "One Billion Two Hundred Thirty Four Million Five Hundred Sixty Seven Thousand Eight Hundred and Ninety ")]
    fn international_words(#[case] n: u64, #[case] expected: &str) {
        assert_eq!(to_words(n, NumberingSystem::International), expected);
    }

    #[test]
    fn conversion_is_stable_for_same_input() {
        assert_eq!(convert_to_words(24000), convert_to_words(24000));
    }

    #[test]
    fn amount_in_words_drops_paise() {
        assert_eq!(
            amount_in_words(dec!(1180.75), NumberingSystem::Indian),
            "Rupees One Thousand One Hundred and Eighty Only"
        );
        assert_eq!(
            amount_in_words(Decimal::ZERO, NumberingSystem::Indian),
            "Rupees Zero Only"
        );
        assert_eq!(
            amount_in_words(dec!(-20), NumberingSystem::Indian),
            "Rupees Minus Twenty Only"
        );
    }
}
