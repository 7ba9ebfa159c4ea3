//! Day count conventions.
//!
//! Simulation dates are converted to year fractions with
//! [`DayCountConvention::Actual365Fixed`]; collateral accrual uses the
//! convention of the credit support annex, `Actual360` unless stated otherwise.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use super::error::DateError;

/// Day count convention for year fraction calculation.
///
/// # Examples
///
/// ```
/// use xva_core::types::time::DayCountConvention;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
///
/// let yf = DayCountConvention::Actual365Fixed.year_fraction(start, end);
/// assert!((yf - 182.0 / 365.0).abs() < 1e-12);
///
/// // Reversed dates give a negative fraction
/// let back = DayCountConvention::Actual365Fixed.year_fraction(end, start);
/// assert!((back + yf).abs() < 1e-12);
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DayCountConvention {
    /// Actual/365 Fixed: actual_days / 365.0
    Actual365Fixed,

    /// Actual/360: actual_days / 360.0
    ///
    /// Used for overnight collateral accrual.
    #[default]
    Actual360,
}

impl DayCountConvention {
    /// Returns the standard convention name.
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Actual365Fixed => "A365F",
            DayCountConvention::Actual360 => "A360",
        }
    }

    /// Signed year fraction between two dates.
    ///
    /// # Arguments
    /// * `start` - Start date
    /// * `end` - End date
    ///
    /// # Returns
    /// Year fraction as f64, negative when `end < start`.
    pub fn year_fraction(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        let days = (end - start).num_days() as f64;
        match self {
            DayCountConvention::Actual365Fixed => days / 365.0,
            DayCountConvention::Actual360 => days / 360.0,
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DayCountConvention {
    type Err = DateError;

    /// Parses common spellings, ignoring case, `/` and whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/')
            .collect::<String>()
            .to_uppercase();
        match normalised.as_str() {
            "A365F" | "A365" | "ACT365" | "ACT365F" | "ACT365FIXED" | "ACTUAL365FIXED" => {
                Ok(DayCountConvention::Actual365Fixed)
            }
            "A360" | "ACT360" | "ACTUAL360" => Ok(DayCountConvention::Actual360),
            _ => Err(DateError::UnknownDayCount(s.to_string())),
        }
    }
}
