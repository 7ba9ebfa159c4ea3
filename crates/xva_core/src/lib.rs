//! # xva_core: Market Foundation for Exposure Post-Processing
//!
//! ## Layer 1 (Foundation) Role
//!
//! xva_core is the bottom layer of the exposure workspace, providing:
//! - Currency codes and day count conventions (`types`)
//! - Yield and credit curve abstractions (`market_data::curves`)
//! - The [`Market`](market_data::Market) lookup contract consumed by the
//!   post-processor, with an in-memory implementation that resolves objects
//!   per market configuration and falls back to the `"default"` configuration
//! - Error types: `MarketDataError`, `CurrencyError`, `DateError`
//!
//! ## Usage Examples
//!
//! ```rust
//! use chrono::NaiveDate;
//! use xva_core::market_data::curves::{CreditCurve, FlatCurve, FlatHazardRateCurve, YieldCurve};
//! use xva_core::market_data::{Market, MarketImpl};
//! use xva_core::types::{Currency, DayCountConvention};
//!
//! let as_of = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let market = MarketImpl::new(as_of)
//!     .with_discount_curve("default", Currency::EUR, FlatCurve::new(0.02))
//!     .with_default_curve("default", "CPTY_A", FlatHazardRateCurve::new(0.01))
//!     .with_recovery_rate("default", "CPTY_A", 0.4);
//!
//! // Lookups under an unknown configuration fall back to "default"
//! let curve = market.discount_curve(Currency::EUR, "collateral_inccy").unwrap();
//! let t = DayCountConvention::Actual365Fixed
//!     .year_fraction(as_of, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
//! // 2024 is a leap year: t = 366 / 365
//! assert!((t - 366.0 / 365.0).abs() < 1e-15);
//! assert!((curve.discount_factor(t).unwrap() - (-0.02 * t).exp()).abs() < 1e-12);
//!
//! let surv = market.default_curve("CPTY_A", "default").unwrap();
//! assert!(surv.survival_probability(1.0).unwrap() < 1.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod market_data;
pub mod types;
