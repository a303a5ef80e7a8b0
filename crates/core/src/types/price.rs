//! Type-safe price representation using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// This price multiplied by a line quantity, saturating at the
    /// representable range.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self::new(
            self.amount.saturating_mul(Decimal::from(quantity)),
            self.currency_code,
        )
    }

    /// Sum of two amounts in this price's currency, saturating at the
    /// representable range.
    #[must_use]
    pub fn plus(self, other: Decimal) -> Self {
        Self::new(self.amount.saturating_add(other), self.currency_code)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount.round_dp(2)
        )
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }

    /// Parse an ISO 4217 code, case-insensitively.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "USD" => Some(Self::USD),
            "EUR" => Some(Self::EUR),
            "GBP" => Some(Self::GBP),
            "CAD" => Some(Self::CAD),
            "AUD" => Some(Self::AUD),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_cents() {
        let price = Price::new(Decimal::new(10, 0), CurrencyCode::USD);
        assert_eq!(price.display(), "$10.00");

        let price = Price::new(Decimal::new(450, 2), CurrencyCode::EUR);
        assert_eq!(price.display(), "€4.50");
    }

    #[test]
    fn test_times() {
        let price = Price::new(Decimal::new(1999, 2), CurrencyCode::USD);
        assert_eq!(price.times(3).amount, Decimal::new(5997, 2));
        assert_eq!(price.times(0), Price::zero(CurrencyCode::USD));
    }

    #[test]
    fn test_times_saturates() {
        let price = Price::new(Decimal::MAX, CurrencyCode::USD);
        assert_eq!(price.times(2).amount, Decimal::MAX);
        assert_eq!(price.plus(Decimal::ONE).amount, Decimal::MAX);

        let debt = Price::new(Decimal::MIN, CurrencyCode::USD);
        assert_eq!(debt.times(3).amount, Decimal::MIN);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(CurrencyCode::from_code("eur"), Some(CurrencyCode::EUR));
        assert_eq!(CurrencyCode::from_code(" GBP "), Some(CurrencyCode::GBP));
        assert_eq!(CurrencyCode::from_code("JPY"), None);
        assert_eq!(CurrencyCode::AUD.code(), "AUD");
    }
}
