use super::traits::{check_pillars, non_negative};
use super::YieldCurve;
use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// How zero rates are filled in between pillars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveInterpolation {
    /// Zero rates linear in time.
    Linear,
    /// `ln P(t)` linear in time, i.e. flat forwards between pillars.
    LogLinear,
}

/// Yield curve through `(tenor, zero rate)` pillars.
///
/// The first zero rate applies before the first pillar. Past the last pillar
/// the last zero rate applies when extrapolation is on; otherwise evaluation
/// fails with [`MarketDataError::Extrapolation`].
///
/// ```
/// use xva_core::market_data::curves::{CurveInterpolation, InterpolatedCurve, YieldCurve};
///
/// let curve = InterpolatedCurve::new(
///     &[0.5, 1.0, 2.0],
///     &[0.02, 0.025, 0.03],
///     CurveInterpolation::LogLinear,
///     true,
/// ).unwrap();
/// assert!((curve.discount_factor(1.0).unwrap() - (-0.025_f64).exp()).abs() < 1e-14);
/// ```
#[derive(Debug, Clone)]
pub struct InterpolatedCurve<T: Float> {
    tenors: Vec<T>,
    zero_rates: Vec<T>,
    method: CurveInterpolation,
    extrapolate: bool,
}

impl<T: Float> InterpolatedCurve<T> {
    /// Builds the curve. Needs at least two strictly increasing positive
    /// tenors with one continuously compounded zero rate each.
    pub fn new(
        tenors: &[T],
        zero_rates: &[T],
        method: CurveInterpolation,
        extrapolate: bool,
    ) -> Result<Self, MarketDataError> {
        check_pillars(tenors, zero_rates, 2)?;
        Ok(Self {
            tenors: tenors.to_vec(),
            zero_rates: zero_rates.to_vec(),
            method,
            extrapolate,
        })
    }

    /// Interpolation method.
    pub fn method(&self) -> CurveInterpolation {
        self.method
    }

    /// Last pillar tenor.
    pub fn last_tenor(&self) -> T {
        self.tenors[self.tenors.len() - 1]
    }

    /// Continuously compounded zero rate at `t > 0`.
    pub fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        let t = non_negative(t)?;
        let n = self.tenors.len();
        if t <= self.tenors[0] {
            return Ok(self.zero_rates[0]);
        }
        if t > self.last_tenor() {
            return if self.extrapolate {
                Ok(self.zero_rates[n - 1])
            } else {
                Err(MarketDataError::Extrapolation {
                    t: t.to_f64().unwrap_or(f64::NAN),
                    last: self.last_tenor().to_f64().unwrap_or(f64::NAN),
                })
            };
        }

        // first pillar at or after t; t > tenors[0] so hi >= 1
        let hi = self.tenors.partition_point(|&x| x < t);
        let (t0, t1) = (self.tenors[hi - 1], self.tenors[hi]);
        let (r0, r1) = (self.zero_rates[hi - 1], self.zero_rates[hi]);
        let w = (t - t0) / (t1 - t0);
        Ok(match self.method {
            CurveInterpolation::Linear => r0 + w * (r1 - r0),
            CurveInterpolation::LogLinear => (r0 * t0 * (T::one() - w) + r1 * t1 * w) / t,
        })
    }
}

impl<T: Float> YieldCurve<T> for InterpolatedCurve<T> {
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        if non_negative(t)? == T::zero() {
            return Ok(T::one());
        }
        Ok((-self.zero_rate(t)? * t).exp())
    }
}
