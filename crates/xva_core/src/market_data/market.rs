//! Market lookup contract and in-memory implementation.
//!
//! Objects are registered per market configuration. A lookup under a
//! configuration that lacks the object falls back to
//! [`DEFAULT_CONFIGURATION`]; only when both miss is
//! [`MarketDataError::NotFound`] returned.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

use super::curves::{CreditCurve, YieldCurve};
use super::error::MarketDataError;
use crate::types::Currency;

/// Name of the fallback market configuration.
pub const DEFAULT_CONFIGURATION: &str = "default";

type SharedYieldCurve = Arc<dyn YieldCurve<f64> + Send + Sync>;
type SharedCreditCurve = Arc<dyn CreditCurve<f64> + Send + Sync>;

/// Read-only market snapshot used by the exposure post-processor.
///
/// Curve times are year fractions from [`Market::as_of`].
pub trait Market: Send + Sync {
    /// Valuation date of the market.
    fn as_of(&self) -> NaiveDate;

    /// Discount (OIS) curve of a currency.
    fn discount_curve(
        &self,
        ccy: Currency,
        configuration: &str,
    ) -> Result<&dyn YieldCurve<f64>, MarketDataError>;

    /// Named yield curve, e.g. a funding borrowing or lending curve.
    fn yield_curve(
        &self,
        name: &str,
        configuration: &str,
    ) -> Result<&dyn YieldCurve<f64>, MarketDataError>;

    /// Default (survival) curve of a named credit entity.
    fn default_curve(
        &self,
        name: &str,
        configuration: &str,
    ) -> Result<&dyn CreditCurve<f64>, MarketDataError>;

    /// Recovery rate of a named credit entity.
    fn recovery_rate(&self, name: &str, configuration: &str) -> Result<f64, MarketDataError>;
}

/// Two-level store: configuration -> key -> object.
#[derive(Clone)]
struct ConfiguredStore<V> {
    kind: &'static str,
    entries: HashMap<String, HashMap<String, V>>,
}

impl<V> ConfiguredStore<V> {
    fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: HashMap::new(),
        }
    }

    fn insert(&mut self, configuration: &str, key: &str, value: V) {
        self.entries
            .entry(configuration.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    fn get(&self, key: &str, configuration: &str) -> Result<&V, MarketDataError> {
        self.entries
            .get(configuration)
            .and_then(|objects| objects.get(key))
            .or_else(|| {
                self.entries
                    .get(DEFAULT_CONFIGURATION)
                    .and_then(|objects| objects.get(key))
            })
            .ok_or_else(|| MarketDataError::NotFound {
                kind: self.kind,
                name: key.to_string(),
                configuration: configuration.to_string(),
            })
    }
}

/// In-memory [`Market`] populated with builder-style `with_*` methods.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use xva_core::market_data::curves::FlatCurve;
/// use xva_core::market_data::{Market, MarketImpl};
///
/// let market = MarketImpl::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
///     .with_yield_curve("default", "BANK_EUR_BORROW", FlatCurve::new(0.03))
///     .with_yield_curve("xva", "BANK_EUR_BORROW", FlatCurve::new(0.04));
///
/// assert!(market.yield_curve("BANK_EUR_BORROW", "xva").is_ok());
/// assert!(market.yield_curve("BANK_EUR_LEND", "xva").is_err());
/// ```
#[derive(Clone)]
pub struct MarketImpl {
    as_of: NaiveDate,
    discount_curves: ConfiguredStore<SharedYieldCurve>,
    yield_curves: ConfiguredStore<SharedYieldCurve>,
    default_curves: ConfiguredStore<SharedCreditCurve>,
    recovery_rates: ConfiguredStore<f64>,
}

impl MarketImpl {
    /// Create an empty market as of the given date.
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            discount_curves: ConfiguredStore::new("discount curve"),
            yield_curves: ConfiguredStore::new("yield curve"),
            default_curves: ConfiguredStore::new("default curve"),
            recovery_rates: ConfiguredStore::new("recovery rate"),
        }
    }

    /// Register a discount curve for a currency.
    pub fn with_discount_curve<C>(mut self, configuration: &str, ccy: Currency, curve: C) -> Self
    where
        C: YieldCurve<f64> + Send + Sync + 'static,
    {
        self.discount_curves
            .insert(configuration, ccy.code(), Arc::new(curve));
        self
    }

    /// Register a named yield curve.
    pub fn with_yield_curve<C>(mut self, configuration: &str, name: &str, curve: C) -> Self
    where
        C: YieldCurve<f64> + Send + Sync + 'static,
    {
        self.yield_curves.insert(configuration, name, Arc::new(curve));
        self
    }

    /// Register a default curve for a credit entity.
    pub fn with_default_curve<C>(mut self, configuration: &str, name: &str, curve: C) -> Self
    where
        C: CreditCurve<f64> + Send + Sync + 'static,
    {
        self.default_curves
            .insert(configuration, name, Arc::new(curve));
        self
    }

    /// Register a recovery rate for a credit entity.
    pub fn with_recovery_rate(mut self, configuration: &str, name: &str, recovery: f64) -> Self {
        self.recovery_rates.insert(configuration, name, recovery);
        self
    }
}

impl Market for MarketImpl {
    fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    fn discount_curve(
        &self,
        ccy: Currency,
        configuration: &str,
    ) -> Result<&dyn YieldCurve<f64>, MarketDataError> {
        let curve = self.discount_curves.get(ccy.code(), configuration)?;
        Ok(curve.as_ref())
    }

    fn yield_curve(
        &self,
        name: &str,
        configuration: &str,
    ) -> Result<&dyn YieldCurve<f64>, MarketDataError> {
        let curve = self.yield_curves.get(name, configuration)?;
        Ok(curve.as_ref())
    }

    fn default_curve(
        &self,
        name: &str,
        configuration: &str,
    ) -> Result<&dyn CreditCurve<f64>, MarketDataError> {
        let curve = self.default_curves.get(name, configuration)?;
        Ok(curve.as_ref())
    }

    fn recovery_rate(&self, name: &str, configuration: &str) -> Result<f64, MarketDataError> {
        let recovery = *self.recovery_rates.get(name, configuration)?;
        if !(0.0..=1.0).contains(&recovery) {
            return Err(MarketDataError::InvalidValue {
                what: "recovery rate",
                value: recovery,
            });
        }
        Ok(recovery)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::curves::{FlatCurve, FlatHazardRateCurve};
    use approx::assert_relative_eq;

    fn market() -> MarketImpl {
        MarketImpl::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .with_discount_curve("default", Currency::EUR, FlatCurve::new(0.02))
            .with_discount_curve("collateral", Currency::EUR, FlatCurve::new(0.01))
            .with_default_curve("default", "CPTY_A", FlatHazardRateCurve::new(0.03))
            .with_recovery_rate("default", "CPTY_A", 0.4)
    }

    #[test]
    fn test_specific_configuration_preferred() {
        let m = market();
        let df = m.discount_curve(Currency::EUR, "collateral").unwrap();
        assert_relative_eq!(df.discount_factor(1.0).unwrap(), (-0.01_f64).exp());
    }

    #[test]
    fn test_fallback_to_default_configuration() {
        let m = market();
        let df = m.discount_curve(Currency::EUR, "pricing").unwrap();
        assert_relative_eq!(df.discount_factor(1.0).unwrap(), (-0.02_f64).exp());
        assert_relative_eq!(m.recovery_rate("CPTY_A", "pricing").unwrap(), 0.4);
    }

    #[test]
    fn test_missing_object_names_configuration() {
        let m = market();
        match m.discount_curve(Currency::USD, "pricing") {
            Err(MarketDataError::NotFound {
                kind,
                name,
                configuration,
            }) => {
                assert_eq!(kind, "discount curve");
                assert_eq!(name, "USD");
                assert_eq!(configuration, "pricing");
            }
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_invalid_recovery_rejected() {
        let m = market().with_recovery_rate("default", "CPTY_B", 1.5);
        assert!(matches!(
            m.recovery_rate("CPTY_B", "default"),
            Err(MarketDataError::InvalidValue { .. })
        ));
    }
}
