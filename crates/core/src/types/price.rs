//! Currency codes and price display formatting.
//!
//! Amounts use decimal arithmetic so that `price * quantity` sums are exact.
//! The cart store never formats money itself: display code passes a
//! formatter such as [`format_value`] (or any `Fn(Decimal) -> String`).

use core::fmt;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown currency code.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported currency code: {0}")]
pub struct CurrencyCodeError(String);

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    BRL,
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Currency symbol used as the display prefix.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::BRL => "R$",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::CAD => "CA$",
            Self::AUD => "A$",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::BRL => "BRL",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }

    /// Decimal separator conventionally used with this currency.
    #[must_use]
    pub const fn decimal_separator(self) -> char {
        match self {
            Self::BRL | Self::EUR => ',',
            Self::USD | Self::GBP | Self::CAD | Self::AUD => '.',
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = CurrencyCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BRL" => Ok(Self::BRL),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            _ => Err(CurrencyCodeError(s.to_owned())),
        }
    }
}

/// Format a monetary amount for display.
///
/// Rounds half away from zero to two decimal places and prefixes the
/// currency symbol, e.g. `R$ 10,00` or `$ 20.00`. No thousands grouping.
#[must_use]
pub fn format_value(amount: Decimal, currency: CurrencyCode) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let digits = format!("{rounded:.2}");
    let digits = match currency.decimal_separator() {
        '.' => digits,
        sep => digits.replace('.', &sep.to_string()),
    };
    format!("{} {digits}", currency.symbol())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value_zero() {
        assert_eq!(format_value(Decimal::ZERO, CurrencyCode::BRL), "R$ 0,00");
        assert_eq!(format_value(Decimal::ZERO, CurrencyCode::USD), "$ 0.00");
    }

    #[test]
    fn test_format_value_pads_and_rounds() {
        assert_eq!(format_value(Decimal::from(10), CurrencyCode::USD), "$ 10.00");
        // 19.995 rounds away from zero
        assert_eq!(
            format_value(Decimal::new(19_995, 3), CurrencyCode::USD),
            "$ 20.00"
        );
        assert_eq!(
            format_value(Decimal::new(1_990, 2), CurrencyCode::BRL),
            "R$ 19,90"
        );
    }

    #[test]
    fn test_currency_code_from_str() {
        assert_eq!("brl".parse::<CurrencyCode>().unwrap(), CurrencyCode::BRL);
        assert_eq!(" USD ".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }
}
