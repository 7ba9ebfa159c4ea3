use super::traits::non_negative;
use super::YieldCurve;
use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Curve with a single continuously compounded rate, `P(t) = e^{-r t}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatCurve<T: Float> {
    rate: T,
}

impl<T: Float> FlatCurve<T> {
    /// Curve at `rate`. Negative rates are allowed.
    pub fn new(rate: T) -> Self {
        Self { rate }
    }

    /// Continuously compounded rate.
    pub fn rate(&self) -> T {
        self.rate
    }
}

impl<T: Float> YieldCurve<T> for FlatCurve<T> {
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        Ok((-self.rate * non_negative(t)?).exp())
    }

    fn growth_factor(&self, t1: T, t2: T) -> Result<T, MarketDataError> {
        non_negative(t1)?;
        non_negative(t2)?;
        Ok((self.rate * (t2 - t1)).exp())
    }
}
