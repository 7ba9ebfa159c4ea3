//! Errors raised by curves and market lookups.

use thiserror::Error;

/// Failure of a curve evaluation, curve construction or market lookup.
///
/// ```
/// use xva_core::market_data::MarketDataError;
///
/// let err = MarketDataError::NegativeTime { t: -0.5 };
/// assert_eq!(err.to_string(), "curve queried at negative time -0.5");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// A curve was evaluated before the as-of date.
    #[error("curve queried at negative time {t}")]
    NegativeTime {
        /// Year fraction that was requested
        t: f64,
    },

    /// A pillar curve was evaluated past its last pillar with extrapolation off.
    #[error("time {t} lies beyond the last pillar {last}")]
    Extrapolation {
        /// Year fraction that was requested
        t: f64,
        /// Last pillar of the curve
        last: f64,
    },

    /// Pillars handed to a curve constructor are unusable.
    #[error("invalid curve pillars: {0}")]
    Pillars(String),

    /// A quote is outside its admissible range.
    #[error("invalid {what}: {value}")]
    InvalidValue {
        /// Quote kind, e.g. "recovery rate"
        what: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Neither the requested configuration nor `"default"` holds the object.
    #[error("No {kind} found for '{name}' under configuration '{configuration}' or 'default'")]
    NotFound {
        /// Object kind, e.g. "discount curve"
        kind: &'static str,
        /// Lookup key
        name: String,
        /// Requested market configuration
        configuration: String,
    },
}
