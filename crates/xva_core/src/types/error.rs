//! Error types for currency and date parsing.

use thiserror::Error;

/// Errors raised while parsing currency codes.
///
/// # Examples
/// ```
/// use xva_core::types::CurrencyError;
///
/// let err = CurrencyError::UnknownCurrency("XYZ".to_string());
/// assert_eq!(format!("{}", err), "Unknown currency code: XYZ");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    /// Code is not one of the supported ISO 4217 currencies.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Errors raised while parsing date conventions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Day count name is not recognised.
    #[error("Unknown day count convention: {0}")]
    UnknownDayCount(String),
}
