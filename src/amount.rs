use std::fmt;

use thiserror::Error;

/// Error raised when a decimal value cannot be represented as an [`Amount`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AmountError {
    #[error("amount must be a finite number, got {0}")]
    NotFinite(f64),
    #[error("amount {0} is out of range")]
    OutOfRange(f64),
}

/// Money in minor units (cents), stored as a scaled integer so prices compare exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(i64);

impl Amount {
    const SCALE: i64 = 100;

    pub const ZERO: Amount = Amount(0);

    /// Parse a decimal value such as `1.25`, rounding to the nearest cent.
    ///
    /// NaN, infinities and values beyond the `i64` cent range are rejected
    /// rather than saturated by the cast.
    pub fn from_float(value: f64) -> Result<Self, AmountError> {
        if !value.is_finite() {
            return Err(AmountError::NotFinite(value));
        }
        let scaled = (value * Self::SCALE as f64).round();
        // i64::MIN and i64::MAX + 1 are both exact powers of two as f64
        if scaled < i64::MIN as f64 || scaled >= i64::MAX as f64 {
            return Err(AmountError::OutOfRange(value));
        }
        Ok(Amount(scaled as i64))
    }

    /// Whole currency units, e.g. `from_units(20)` is `20.00`.
    pub fn from_units(units: i64) -> Self {
        Amount(units * Self::SCALE)
    }

    pub fn from_cents(cents: i64) -> Self {
        Amount(cents)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        let whole = abs / Self::SCALE;
        let frac = abs % Self::SCALE;
        write!(f, "{sign}{whole}.{frac:02}")
    }
}

impl std::ops::Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl std::ops::AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_units_scales_to_cents() {
        assert_eq!(Amount::from_units(20), Amount::from_cents(2_000));
        assert_eq!(Amount::from_units(0), Amount::ZERO);
    }

    #[test]
    fn from_float_converts_correctly() {
        assert_eq!(Amount::from_float(20.0), Ok(Amount::from_units(20)));
        assert_eq!(Amount::from_float(1.5), Ok(Amount::from_cents(150)));
        assert_eq!(Amount::from_float(0.01), Ok(Amount::from_cents(1)));
    }

    #[test]
    fn from_float_rounds_to_nearest_cent() {
        assert_eq!(Amount::from_float(1.234), Ok(Amount::from_cents(123)));
        assert_eq!(Amount::from_float(1.236), Ok(Amount::from_cents(124)));
        // 0.1 + 0.2 style noise must not leak into the comparison
        assert_eq!(Amount::from_float(0.1 + 0.2), Ok(Amount::from_cents(30)));
    }

    #[test]
    fn from_float_handles_negative() {
        assert_eq!(Amount::from_float(-2.5), Ok(Amount::from_cents(-250)));
        assert!(Amount::from_float(-2.5).unwrap().is_negative());
        assert!(!Amount::ZERO.is_negative());
    }

    #[test]
    fn from_float_rejects_non_finite() {
        assert!(matches!(
            Amount::from_float(f64::NAN),
            Err(AmountError::NotFinite(_))
        ));
        assert_eq!(
            Amount::from_float(f64::INFINITY),
            Err(AmountError::NotFinite(f64::INFINITY))
        );
        assert_eq!(
            Amount::from_float(f64::NEG_INFINITY),
            Err(AmountError::NotFinite(f64::NEG_INFINITY))
        );
    }

    #[test]
    fn from_float_rejects_out_of_range() {
        assert_eq!(Amount::from_float(1e17), Err(AmountError::OutOfRange(1e17)));
        assert_eq!(
            Amount::from_float(-1e17),
            Err(AmountError::OutOfRange(-1e17))
        );
        // largest prices still fit
        assert!(Amount::from_float(5e16).is_ok());
    }

    #[test]
    fn checked_add_and_sub_detect_overflow() {
        let max = Amount::from_cents(i64::MAX);
        assert_eq!(max.checked_add(Amount::from_cents(1)), None);
        assert_eq!(
            Amount::from_cents(i64::MIN).checked_sub(Amount::from_cents(1)),
            None
        );
        assert_eq!(
            Amount::from_units(20).checked_add(Amount::from_units(30)),
            Some(Amount::from_units(50))
        );
        assert_eq!(
            Amount::from_units(50).checked_sub(Amount::from_units(20)),
            Some(Amount::from_units(30))
        );
    }

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(Amount::from_units(20).to_string(), "20.00");
        assert_eq!(Amount::from_cents(150).to_string(), "1.50");
        assert_eq!(Amount::from_cents(5).to_string(), "0.05");
        assert_eq!(Amount::ZERO.to_string(), "0.00");
    }

    #[test]
    fn display_formats_negative() {
        assert_eq!(Amount::from_cents(-250).to_string(), "-2.50");
        assert_eq!(Amount::from_cents(-1).to_string(), "-0.01");
    }

    #[test]
    fn arithmetic() {
        let mut total = Amount::from_units(20) + Amount::from_units(30);
        assert_eq!(total, Amount::from_units(50));

        total -= Amount::from_units(20);
        assert_eq!(total, Amount::from_units(30));

        total += Amount::from_cents(5);
        assert_eq!(total - Amount::from_units(30), Amount::from_cents(5));
    }

    #[test]
    fn ordering() {
        assert!(Amount::from_cents(-1) < Amount::ZERO);
        assert!(Amount::from_units(15) < Amount::from_units(20));
    }
}
