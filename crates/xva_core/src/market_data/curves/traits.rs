use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Discounting curve on a year-fraction axis measured from the as-of date.
///
/// Only [`discount_factor`](YieldCurve::discount_factor) is required. The
/// funding adjustments work with [`growth_factor`](YieldCurve::growth_factor),
/// the gross accrual of one unit held over a period.
///
/// ```
/// use xva_core::market_data::curves::{FlatCurve, YieldCurve};
///
/// let ois = FlatCurve::new(0.02_f64);
/// let g = ois.growth_factor(0.5, 1.0).unwrap();
/// assert!((g - 0.01_f64.exp()).abs() < 1e-14);
/// ```
pub trait YieldCurve<T: Float> {
    /// `P(0, t)`. Fails with [`MarketDataError::NegativeTime`] for `t < 0`.
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError>;

    /// `P(0, t1) / P(0, t2)`.
    fn growth_factor(&self, t1: T, t2: T) -> Result<T, MarketDataError> {
        let start = self.discount_factor(t1)?;
        let end = self.discount_factor(t2)?;
        Ok(start / end)
    }
}

/// Rejects times before the as-of date.
pub(super) fn non_negative<T: Float>(t: T) -> Result<T, MarketDataError> {
    if t < T::zero() {
        Err(MarketDataError::NegativeTime {
            t: t.to_f64().unwrap_or(f64::NAN),
        })
    } else {
        Ok(t)
    }
}

/// Checks that pillar tenors are positive and strictly increasing and that
/// there is one quote per tenor.
pub(super) fn check_pillars<T: Float>(
    tenors: &[T],
    quotes: &[T],
    min_len: usize,
) -> Result<(), MarketDataError> {
    if tenors.len() < min_len {
        return Err(MarketDataError::Pillars(format!(
            "{} tenors given, at least {min_len} required",
            tenors.len()
        )));
    }
    if tenors.len() != quotes.len() {
        return Err(MarketDataError::Pillars(format!(
            "{} tenors but {} quotes",
            tenors.len(),
            quotes.len()
        )));
    }
    let mut prev = T::zero();
    for &t in tenors {
        if t <= prev {
            return Err(MarketDataError::Pillars(format!(
                "tenor {} is not after {}",
                t.to_f64().unwrap_or(f64::NAN),
                prev.to_f64().unwrap_or(f64::NAN)
            )));
        }
        prev = t;
    }
    Ok(())
}
