//! Discount and default curves.
//!
//! Yield curves implement [`YieldCurve`], default curves [`CreditCurve`].
//! All curves are generic over `num_traits::Float` and take year fractions
//! from the market as-of date.

mod credit;
mod flat;
mod interpolated;
mod traits;

pub use credit::{CreditCurve, FlatHazardRateCurve, HazardRateCurve};
pub use flat::FlatCurve;
pub use interpolated::{CurveInterpolation, InterpolatedCurve};
pub use traits::YieldCurve;
