use super::traits::{check_pillars, non_negative};
use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Default curve of a name, queried for survival probabilities.
///
/// `S(0) = 1` and `S` never increases.
///
/// ```
/// use xva_core::market_data::curves::{CreditCurve, HazardRateCurve};
///
/// let curve = HazardRateCurve::new(&[1.0_f64, 2.0, 5.0], &[0.01, 0.012, 0.015]).unwrap();
/// let s = curve.survival_probability(1.0).unwrap();
/// assert!((s - (-0.01_f64).exp()).abs() < 1e-14);
/// ```
pub trait CreditCurve<T: Float> {
    /// `S(t) = P(τ > t)`. Fails with [`MarketDataError::NegativeTime`] for `t < 0`.
    fn survival_probability(&self, t: T) -> Result<T, MarketDataError>;
}

/// Piecewise-flat hazard rates: `λ_i` on `(t_{i-1}, t_i]` with `t_{-1} = 0`,
/// the last rate continuing past the last pillar.
#[derive(Debug, Clone)]
pub struct HazardRateCurve<T: Float> {
    tenors: Vec<T>,
    hazard_rates: Vec<T>,
}

impl<T: Float> HazardRateCurve<T> {
    /// Builds the curve from strictly increasing positive tenors and one
    /// non-negative hazard rate per tenor.
    pub fn new(tenors: &[T], hazard_rates: &[T]) -> Result<Self, MarketDataError> {
        check_pillars(tenors, hazard_rates, 1)?;
        if let Some(&h) = hazard_rates.iter().find(|&&h| h < T::zero()) {
            return Err(MarketDataError::InvalidValue {
                what: "hazard rate",
                value: h.to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok(Self {
            tenors: tenors.to_vec(),
            hazard_rates: hazard_rates.to_vec(),
        })
    }

    /// `∫₀ᵗ λ(s) ds`.
    fn cumulative_hazard(&self, t: T) -> T {
        let mut acc = T::zero();
        let mut start = T::zero();
        for (&end, &h) in self.tenors.iter().zip(&self.hazard_rates) {
            if t <= end {
                return acc + h * (t - start);
            }
            acc = acc + h * (end - start);
            start = end;
        }
        acc + self.hazard_rates[self.hazard_rates.len() - 1] * (t - start)
    }
}

impl<T: Float> CreditCurve<T> for HazardRateCurve<T> {
    fn survival_probability(&self, t: T) -> Result<T, MarketDataError> {
        let t = non_negative(t)?;
        Ok((-self.cumulative_hazard(t)).exp())
    }
}

/// Single hazard rate, `S(t) = e^{-λ t}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatHazardRateCurve<T: Float> {
    hazard_rate: T,
}

impl<T: Float> FlatHazardRateCurve<T> {
    /// Curve with intensity `hazard_rate`.
    pub fn new(hazard_rate: T) -> Self {
        Self { hazard_rate }
    }

    /// Hazard rate.
    pub fn rate(&self) -> T {
        self.hazard_rate
    }
}

impl<T: Float> CreditCurve<T> for FlatHazardRateCurve<T> {
    fn survival_probability(&self, t: T) -> Result<T, MarketDataError> {
        Ok((-self.hazard_rate * non_negative(t)?).exp())
    }
}
