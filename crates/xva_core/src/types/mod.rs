//! Core currency, time, and error types.
//!
//! # Re-exports
//!
//! - [`Currency`] from `currency`
//! - [`DayCountConvention`] from `time`
//! - [`CurrencyError`], [`DateError`] from `error`

pub mod currency;
pub mod error;
pub mod time;

pub use currency::Currency;
pub use error::{CurrencyError, DateError};
pub use time::DayCountConvention;
