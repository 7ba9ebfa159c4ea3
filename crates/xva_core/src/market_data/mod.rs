//! Market data structures consumed by the exposure post-processor.
//!
//! # Components
//!
//! - [`curves`]: Yield and credit curve traits with flat and pillar-based implementations
//! - [`market`]: The [`Market`] lookup contract and the in-memory [`MarketImpl`]
//! - [`error`]: Market data error types ([`MarketDataError`])

pub mod curves;
pub mod error;
pub mod market;

pub use curves::{
    CreditCurve, CurveInterpolation, FlatCurve, FlatHazardRateCurve, HazardRateCurve,
    InterpolatedCurve, YieldCurve,
};
pub use error::MarketDataError;
pub use market::{Market, MarketImpl, DEFAULT_CONFIGURATION};
