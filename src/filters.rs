use std::{fmt::Display, str::FromStr};

use askama::{Error, Result};
use rust_decimal::Decimal;

// Formats an amount as dollars with thousands separators, e.g. `|money` -> "$1,250.00".
// Values that are not numbers fail the render.
pub fn money<T: Display>(value: T) -> Result<String> {
    let amount = Decimal::from_str(&value.to_string())
        .map_err(|e| Error::Custom(Box::new(e)))?
        .round_dp(2);
    let digits = format!("{:.2}", amount.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < Decimal::ZERO { "-" } else { "" };
    Ok(format!("{}${}.{}", sign, grouped, cents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn formats_dollars() {
        assert_eq!(money(dec!(0)).unwrap(), "$0.00");
        assert_eq!(money(dec!(45.5)).unwrap(), "$45.50");
        assert_eq!(money(dec!(1250)).unwrap(), "$1,250.00");
        assert_eq!(money(dec!(1234567.891)).unwrap(), "$1,234,567.89");
        assert_eq!(money(dec!(-310)).unwrap(), "-$310.00");
    }

    #[test]
    fn non_numeric_is_an_error() {
        assert!(money("n/a").is_err());
        assert!(money("").is_err());
        assert_eq!(money("1250.5").unwrap(), "$1,250.50");
    }
}
