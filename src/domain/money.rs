use crate::error::LedgerError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Decimal places of the smallest currency unit.
pub const CURRENCY_SCALE: u32 = 2;

/// An exact monetary value.
///
/// This is a wrapper around `rust_decimal::Decimal` so that loan arithmetic never
/// goes through binary floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(pub Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Multiplies by a week count, failing on decimal overflow.
    pub fn checked_times(self, count: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(count)).map(Self)
    }

    /// Splits this amount into `parts` equal shares, truncated toward zero to the
    /// smallest currency unit.
    pub fn share_of(self, parts: u32) -> Option<Self> {
        let share = self.0.checked_div(Decimal::from(parts))?;
        Some(Self(share.round_dp_with_strategy(
            CURRENCY_SCALE,
            RoundingStrategy::ToZero,
        )))
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

/// A flat interest rate expressed as a fraction (`0.10` is 10%).
///
/// Negative rates are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterestRate(Decimal);

impl InterestRate {
    pub fn new(value: Decimal) -> Result<Self, LedgerError> {
        if value >= Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(LedgerError::InvalidTerms(
                "Interest rate must not be negative".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// `principal × (1 + rate)`, or `None` if the result leaves the decimal range.
    pub fn apply_to(&self, principal: Money) -> Option<Money> {
        let factor = Decimal::ONE.checked_add(self.0)?;
        principal.0.checked_mul(factor).map(Money)
    }
}

impl TryFrom<Decimal> for InterestRate {
    type Error = LedgerError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_arithmetic() {
        let m1 = Money::new(dec!(10.0));
        let m2 = Money::new(dec!(5.0));
        assert_eq!(m1 + m2, Money::new(dec!(15.0)));
        assert_eq!(m1 - m2, Money::new(dec!(5.0)));

        let mut m3 = m1;
        m3 -= m2;
        m3 += Money::new(dec!(0.25));
        assert_eq!(m3, Money::new(dec!(5.25)));
    }

    #[test]
    fn test_share_of_truncates_to_cents() {
        assert_eq!(Money::new(dec!(100)).share_of(3), Some(Money::new(dec!(33.33))));
        assert_eq!(Money::new(dec!(2)).share_of(3), Some(Money::new(dec!(0.66))));
        assert_eq!(
            Money::new(dec!(5500000)).share_of(50),
            Some(Money::new(dec!(110000)))
        );
    }

    #[test]
    fn test_checked_times() {
        assert_eq!(
            Money::new(dec!(33.33)).checked_times(2),
            Some(Money::new(dec!(66.66)))
        );
        assert_eq!(Money::new(Decimal::MAX).checked_times(2), None);
    }

    #[test]
    fn test_money_display_is_normalized() {
        assert_eq!(Money::new(dec!(5390000.00)).to_string(), "5390000");
        assert_eq!(Money::new(dec!(0.50)).to_string(), "0.5");
    }

    #[test]
    fn test_interest_rate_validation() {
        assert!(InterestRate::new(dec!(0.10)).is_ok());
        assert!(InterestRate::new(dec!(0)).is_ok());
        assert!(matches!(
            InterestRate::new(dec!(-0.01)),
            Err(LedgerError::InvalidTerms(_))
        ));
    }

    #[test]
    fn test_interest_rate_apply() {
        let rate = InterestRate::new(dec!(0.10)).unwrap();
        assert_eq!(
            rate.apply_to(Money::new(dec!(5000000))),
            Some(Money::new(dec!(5500000)))
        );
        assert_eq!(rate.apply_to(Money::new(Decimal::MAX)), None);
    }
}
