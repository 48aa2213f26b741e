//! `Period` — a time span expressed in a [`TimeUnit`].
//!
//! Periods parse from and print as market tenor strings (`"3M"`, `"5Y"`,
//! `"2W"`, `"1D"`), which is how instrument tables and configuration files
//! name them.

use std::str::FromStr;

use crate::frequency::Frequency;
use crate::time_unit::TimeUnit;
use ql_core::errors::{Error, Result};

/// A time span made up of an integer length and a [`TimeUnit`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    /// Number of units.
    pub length: i32,
    /// The unit of time.
    pub unit: TimeUnit,
}

impl Period {
    /// Create a new period.
    pub fn new(length: i32, unit: TimeUnit) -> Self {
        Self { length, unit }
    }

    /// `n` calendar months.
    pub fn months(n: i32) -> Self {
        Self::new(n, TimeUnit::Months)
    }

    /// `n` calendar years.
    pub fn years(n: i32) -> Self {
        Self::new(n, TimeUnit::Years)
    }

    /// The coupon period of a [`Frequency`].
    ///
    /// # Errors
    /// [`Frequency::Once`] has no finite coupon period.
    pub fn from_frequency(freq: Frequency) -> Result<Self> {
        match freq {
            Frequency::Once => Err(Error::InvalidArgument(format!(
                "cannot convert {freq} frequency to a period"
            ))),
            Frequency::Annual => Ok(Period::years(1)),
            Frequency::Semiannual => Ok(Period::months(6)),
            Frequency::Quarterly => Ok(Period::months(3)),
            Frequency::Monthly => Ok(Period::months(1)),
        }
    }

    /// Length in months for month/year periods, `None` otherwise.
    pub fn in_months(self) -> Option<i32> {
        match self.unit {
            TimeUnit::Months => Some(self.length),
            TimeUnit::Years => Some(self.length * 12),
            TimeUnit::Days | TimeUnit::Weeks => None,
        }
    }
}

impl std::ops::Neg for Period {
    type Output = Self;
    fn neg(self) -> Self {
        Period::new(-self.length, self.unit)
    }
}

impl std::ops::Mul<i32> for Period {
    type Output = Self;
    fn mul(self, rhs: i32) -> Self {
        Period::new(self.length * rhs, self.unit)
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let bad = || Error::InvalidArgument(format!("invalid tenor '{s}'"));
        let unit = match s.chars().last().map(|c| c.to_ascii_uppercase()) {
            Some('D') => TimeUnit::Days,
            Some('W') => TimeUnit::Weeks,
            Some('M') => TimeUnit::Months,
            Some('Y') => TimeUnit::Years,
            _ => return Err(bad()),
        };
        let length: i32 = s[..s.len() - 1].parse().map_err(|_| bad())?;
        Ok(Period::new(length, unit))
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.length, self.unit.code())
    }
}

impl std::fmt::Debug for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Period({self})")
    }
}
