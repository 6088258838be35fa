//! Thin decimal wrappers so prices and volumes aren't accidentally swapped.

use std::fmt;
use std::ops::{Add, Sub};

use rust_decimal::Decimal;

/// A price in `[0, 1]` dollars-per-share (a prediction-market contract pays
/// at most $1). Not clamped at construction — callers that need the
/// invariant enforced call [`Price::is_valid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(Decimal);

impl Price {
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Prices outside `[0, 1]` indicate a corrupt feed, not a business state.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.0 >= Decimal::ZERO && self.0 <= Decimal::ONE
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Price {
    type Output = Decimal;
    fn add(self, rhs: Self) -> Decimal {
        self.0 + rhs.0
    }
}

impl Sub for Price {
    type Output = Decimal;
    fn sub(self, rhs: Self) -> Decimal {
        self.0 - rhs.0
    }
}

impl From<Decimal> for Price {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

/// A USD notional amount (liquidity, volume, target notional).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Usd(Decimal);

impl Usd {
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Usd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

impl From<Decimal> for Usd {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn price_in_unit_interval_is_valid() {
        assert!(Price::new(dec!(0.42)).is_valid());
        assert!(Price::new(dec!(0)).is_valid());
        assert!(Price::new(dec!(1)).is_valid());
    }

    #[test]
    fn price_outside_unit_interval_is_invalid() {
        assert!(!Price::new(dec!(-0.01)).is_valid());
        assert!(!Price::new(dec!(1.01)).is_valid());
    }

    #[test]
    fn price_addition_yields_decimal() {
        let total = Price::new(dec!(0.4)) + Price::new(dec!(0.5));
        assert_eq!(total, dec!(0.9));
    }
}
