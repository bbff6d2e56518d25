//! Money helpers.
//!
//! The shop trades in a single currency (USD), so prices are plain
//! [`Decimal`] values in dollars rather than a currency-tagged type.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round an amount to cents, midpoint away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount as US dollars with thousands separators, e.g. `$1,299.99`.
#[must_use]
pub fn format_usd(amount: Decimal) -> String {
    let rounded = round_money(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let fixed = format!("{:.2}", rounded.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((&fixed, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{cents}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(Decimal::new(12345, 3)), Decimal::new(1235, 2));
        assert_eq!(round_money(Decimal::new(-12345, 3)), Decimal::new(-1235, 2));
        assert_eq!(round_money(Decimal::new(5, 0)), Decimal::new(5, 0));
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(Decimal::new(129_999, 2)), "$1,299.99");
        assert_eq!(format_usd(Decimal::new(44_999, 2)), "$449.99");
        assert_eq!(format_usd(Decimal::new(1_000_000, 0)), "$1,000,000.00");
        assert_eq!(format_usd(Decimal::ZERO), "$0.00");
        assert_eq!(format_usd(Decimal::new(-2500, 2)), "-$25.00");
    }
}
