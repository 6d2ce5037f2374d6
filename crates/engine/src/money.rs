use std::{fmt, str::FromStr};

use sea_orm::prelude::Decimal;

use crate::EngineError;

/// Money amount represented as **integer cents**.
///
/// Every monetary value in the engine (expense amounts, totals) is carried as
/// `Money`. Clients speak decimal numbers (`12.34`) and storage keeps a
/// `NUMERIC(10, 2)`; both conversions happen at the edges.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
///
/// assert_eq!("10.5".parse::<Money>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Largest amount a `NUMERIC(10, 2)` column holds: `99999999.99`.
    pub const MAX: Money = Money(9_999_999_999);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Converts a decimal amount (`12.34`) into cents.
    ///
    /// The number is read through its shortest round-trip decimal text, so
    /// `0.1` is exactly ten cents and `99999999.99` is not mistaken for a
    /// value with a third decimal. Sign is preserved; positivity is checked by
    /// the caller.
    pub fn from_major(value: f64) -> Result<Self, EngineError> {
        if !value.is_finite() {
            return Err(EngineError::InvalidInput("amount must be a finite number".to_string()));
        }
        value.to_string().parse()
    }

    /// Returns the amount as a decimal number (`1234` cents -> `12.34`).
    #[must_use]
    pub fn to_major(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the amount as a two-scale decimal for storage.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses `12`, `12.3` or `12.34`, optionally prefixed with `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidInput(format!("invalid amount '{s}'"));
        let too_large =
            || EngineError::InvalidInput(format!("amount must be at most {}", Self::MAX));

        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (units, fraction) = digits.split_once('.').unwrap_or((digits, ""));

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if units.is_empty() || !all_digits(units) || !all_digits(fraction) {
            return Err(invalid());
        }
        if fraction.len() > 2 {
            return Err(EngineError::InvalidInput(
                "amount must have at most 2 decimal places".to_string(),
            ));
        }

        let cents: i64 = format!("{fraction:0<2}").parse().map_err(|_| invalid())?;
        let total = units
            .parse::<i64>()
            .ok()
            .and_then(|u| u.checked_mul(100))
            .and_then(|u| u.checked_add(cents))
            .filter(|total| *total <= Self::MAX.0)
            .ok_or_else(too_large)?;

        Ok(Money(if negative { -total } else { total }))
    }
}
