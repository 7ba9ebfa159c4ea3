//! XVA calculations (CVA, DVA, FVA, COLVA, MVA).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  XvaCalculator                      │
//! ├─────────────────────────────────────────────────────┤
//! │  Shared (built once from the market):               │
//! │    - own CreditProfile (DVA name, or risk free)     │
//! │    - borrowing / lending spread accruals            │
//! │  Per netting set:                                   │
//! │    - counterparty CreditProfile                     │
//! │    - ExposureProfile, expected DIM,                 │
//! │      COLVA / floor increments                       │
//! ├─────────────────────────────────────────────────────┤
//! │  Outputs: NettingSetXva, TradeXva                   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! All profiles are deflated, so the sums below carry no extra discounting.

mod cva;
mod dva;
mod fva;
mod result;

pub use cva::compute_cva;
pub use dva::compute_dva;
pub use fva::{compute_fba, compute_fca, compute_mva, funding_spread_accruals};
pub use result::{NettingSetXva, PortfolioXva, TradeXva};

use xva_core::market_data::curves::CreditCurve;
use xva_core::market_data::{Market, MarketDataError};

use crate::config::{Analytic, PostProcessConfig};
use crate::exposure::ExposureProfile;
use crate::portfolio::{NettingSet, TradeId};

/// Survival probabilities on the profile grid plus loss given default.
#[derive(Clone, Debug, PartialEq)]
pub struct CreditProfile {
    survival: Vec<f64>,
    lgd: f64,
}

impl CreditProfile {
    /// Creates a profile from survival probabilities and LGD.
    pub fn new(survival: Vec<f64>, lgd: f64) -> Self {
        Self { survival, lgd }
    }

    /// No default risk: survival 1 everywhere, zero LGD.
    pub fn risk_free(n_points: usize) -> Self {
        Self::new(vec![1.0; n_points], 0.0)
    }

    /// Samples a credit curve on the profile times.
    pub fn from_curve(
        curve: &dyn CreditCurve<f64>,
        recovery_rate: f64,
        times: &[f64],
    ) -> Result<Self, MarketDataError> {
        let survival = times
            .iter()
            .map(|&t| curve.survival_probability(t))
            .collect::<Result<Vec<f64>, _>>()?;
        Ok(Self::new(survival, 1.0 - recovery_rate))
    }

    /// Looks up a named entity in the market and samples its curve.
    pub fn from_market(
        market: &dyn Market,
        name: &str,
        configuration: &str,
        times: &[f64],
    ) -> Result<Self, MarketDataError> {
        let curve = market.default_curve(name, configuration)?;
        let recovery = market.recovery_rate(name, configuration)?;
        Self::from_curve(curve, recovery, times)
    }

    /// Survival probability per profile date.
    #[inline]
    pub fn survival(&self) -> &[f64] {
        &self.survival
    }

    /// Loss given default.
    #[inline]
    pub fn lgd(&self) -> f64 {
        self.lgd
    }
}

/// Which adjustments are computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct XvaSwitches {
    /// CVA
    pub cva: bool,
    /// DVA
    pub dva: bool,
    /// FCA and FBA
    pub fva: bool,
    /// MVA
    pub mva: bool,
    /// COLVA
    pub colva: bool,
    /// Collateral floor
    pub collateral_floor: bool,
}

impl XvaSwitches {
    /// Reads the switches from the analytics map.
    pub fn from_config(config: &PostProcessConfig) -> Self {
        Self {
            cva: config.is_enabled(Analytic::Cva),
            dva: config.is_enabled(Analytic::Dva),
            fva: config.is_enabled(Analytic::Fva),
            mva: config.is_enabled(Analytic::Mva),
            colva: config.is_enabled(Analytic::Colva),
            collateral_floor: config.is_enabled(Analytic::CollateralFloor),
        }
    }

    /// True if counterparty survival enters any enabled adjustment.
    #[inline]
    pub fn needs_counterparty_credit(&self) -> bool {
        self.cva || self.fva || self.mva
    }
}

/// Computes XVA for netting sets and trades on a fixed profile grid.
#[derive(Clone, Debug)]
pub struct XvaCalculator {
    switches: XvaSwitches,
    times: Vec<f64>,
    own: CreditProfile,
    borrowing: Vec<f64>,
    lending: Vec<f64>,
}

impl XvaCalculator {
    /// Builds the shared inputs from the market.
    ///
    /// Own credit is only looked up when a DVA name is configured; funding
    /// curves only when FVA or MVA is enabled and a curve name is given.
    pub fn new(
        market: &dyn Market,
        config: &PostProcessConfig,
        times: &[f64],
    ) -> Result<Self, MarketDataError> {
        let switches = XvaSwitches::from_config(config);
        let configuration = config.market_configuration.as_str();
        let n = times.len();

        let own = match config.dva_name() {
            Some(name) if switches.dva || switches.fva || switches.mva => {
                CreditProfile::from_market(market, name, configuration, times)?
            }
            _ => CreditProfile::risk_free(n),
        };

        let spread_accruals =
            |curve_name: Option<&str>, enabled: bool| -> Result<Vec<f64>, MarketDataError> {
                match curve_name {
                    Some(name) if enabled => {
                        let ois = market.discount_curve(config.base_currency, configuration)?;
                        let funding = market.yield_curve(name, configuration)?;
                        funding_spread_accruals(funding, ois, times)
                    }
                    _ => Ok(vec![0.0; n]),
                }
            };
        let borrowing = spread_accruals(config.borrowing_curve(), switches.fva || switches.mva)?;
        let lending = spread_accruals(config.lending_curve(), switches.fva)?;

        Ok(Self {
            switches,
            times: times.to_vec(),
            own,
            borrowing,
            lending,
        })
    }

    /// Enabled adjustments.
    #[inline]
    pub fn switches(&self) -> XvaSwitches {
        self.switches
    }

    /// Own credit profile.
    #[inline]
    pub fn own_credit(&self) -> &CreditProfile {
        &self.own
    }

    /// Counterparty credit for a netting set, or risk free when no enabled
    /// adjustment needs it.
    pub fn counterparty_credit(
        &self,
        market: &dyn Market,
        netting_set: &NettingSet,
        configuration: &str,
    ) -> Result<CreditProfile, MarketDataError> {
        if self.switches.needs_counterparty_credit() {
            CreditProfile::from_market(
                market,
                netting_set.counterparty_id().as_str(),
                configuration,
                &self.times,
            )
        } else {
            Ok(CreditProfile::risk_free(self.own.survival().len()))
        }
    }

    /// CVA and DVA of an exposure profile, zero where disabled.
    pub fn credit_adjustments(
        &self,
        epe: &[f64],
        ene: &[f64],
        counterparty: &CreditProfile,
    ) -> (f64, f64) {
        let cva = if self.switches.cva {
            compute_cva(epe, counterparty)
        } else {
            0.0
        };
        let dva = if self.switches.dva {
            compute_dva(ene, &self.own)
        } else {
            0.0
        };
        (cva, dva)
    }

    fn funding_adjustments(
        &self,
        profile: &ExposureProfile,
        counterparty: &CreditProfile,
    ) -> (f64, f64) {
        if !self.switches.fva {
            return (0.0, 0.0);
        }
        (
            compute_fca(profile.epe(), counterparty, &self.own, &self.borrowing),
            compute_fba(profile.ene(), counterparty, &self.own, &self.lending),
        )
    }

    /// Stand-alone XVA of a trade.
    pub fn trade_xva(
        &self,
        trade_id: &TradeId,
        profile: &ExposureProfile,
        counterparty: &CreditProfile,
    ) -> TradeXva {
        let (cva, dva) = self.credit_adjustments(profile.epe(), profile.ene(), counterparty);
        let (fca, fba) = self.funding_adjustments(profile, counterparty);
        TradeXva {
            trade_id: trade_id.clone(),
            cva,
            dva,
            fca,
            fba,
        }
    }

    /// XVA of a netting set.
    ///
    /// `expected_dim` is required for MVA; the increments are the
    /// per-date COLVA and collateral floor contributions of the
    /// collateral walk (absent for uncollateralised netting sets).
    pub fn netting_set_xva(
        &self,
        netting_set: &NettingSet,
        profile: &ExposureProfile,
        counterparty: &CreditProfile,
        expected_dim: Option<&[f64]>,
        colva_increments: Option<&[f64]>,
        floor_increments: Option<&[f64]>,
    ) -> NettingSetXva {
        let (cva, dva) = self.credit_adjustments(profile.epe(), profile.ene(), counterparty);
        let (fca, fba) = self.funding_adjustments(profile, counterparty);
        let mva = match expected_dim {
            Some(edim) if self.switches.mva => {
                compute_mva(edim, counterparty, &self.own, &self.borrowing)
            }
            _ => 0.0,
        };
        let colva = match colva_increments {
            Some(inc) if self.switches.colva => inc.iter().sum(),
            _ => 0.0,
        };
        let collateral_floor = match floor_increments {
            Some(inc) if self.switches.collateral_floor => inc.iter().sum(),
            _ => 0.0,
        };

        NettingSetXva {
            netting_set_id: netting_set.id().clone(),
            counterparty_id: netting_set.counterparty_id().clone(),
            cva,
            dva,
            fca,
            fba,
            colva,
            collateral_floor,
            mva,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use xva_core::market_data::curves::{FlatCurve, FlatHazardRateCurve};
    use xva_core::market_data::MarketImpl;
    use xva_core::types::Currency;

    use crate::portfolio::{CounterpartyId, NettingSetId};

    fn market() -> MarketImpl {
        MarketImpl::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .with_discount_curve("default", Currency::USD, FlatCurve::new(0.02))
            .with_yield_curve("default", "BORROW", FlatCurve::new(0.03))
            .with_default_curve("default", "CP", FlatHazardRateCurve::new(0.02))
            .with_recovery_rate("default", "CP", 0.4)
            .with_default_curve("default", "BANK", FlatHazardRateCurve::new(0.01))
            .with_recovery_rate("default", "BANK", 0.4)
    }

    fn profile(epe: Vec<f64>, ene: Vec<f64>) -> ExposureProfile {
        ExposureProfile {
            epe,
            ene,
            ..ExposureProfile::default()
        }
    }

    #[test]
    fn test_disabled_adjustments_are_zero() {
        let config = PostProcessConfig::new(Currency::USD);
        let times = [0.0, 1.0, 2.0];
        let calc = XvaCalculator::new(&market(), &config, &times).unwrap();
        let ns = NettingSet::new(NettingSetId::new("NS"), CounterpartyId::new("UNKNOWN"));
        // no enabled analytic needs the counterparty curve
        let cp = calc.counterparty_credit(&market(), &ns, "default").unwrap();
        let p = profile(vec![0.0, 5.0, 5.0], vec![0.0; 3]);
        let x = calc.netting_set_xva(&ns, &p, &cp, None, None, None);
        assert_eq!(x.cva, 0.0);
        assert_eq!(x.fca, 0.0);
    }

    #[test]
    fn test_netting_set_xva() {
        let mut config = PostProcessConfig::new(Currency::USD)
            .with_analytic(Analytic::Cva, true)
            .with_analytic(Analytic::Dva, true)
            .with_analytic(Analytic::Fva, true)
            .with_analytic(Analytic::Colva, true);
        config.dva_name = Some("BANK".to_string());
        config.fva_borrowing_curve = Some("BORROW".to_string());

        let times = [0.0, 1.0, 2.0];
        let m = market();
        let calc = XvaCalculator::new(&m, &config, &times).unwrap();
        let ns = NettingSet::new(NettingSetId::new("NS"), CounterpartyId::new("CP"));
        let cp = calc.counterparty_credit(&m, &ns, "default").unwrap();

        let p = profile(vec![0.0, 10.0, 10.0], vec![0.0, 4.0, 4.0]);
        let x = calc.netting_set_xva(&ns, &p, &cp, None, Some(&[0.0, -0.1, -0.2][..]), None);

        assert_relative_eq!(x.cva, 0.6 * 10.0 * (1.0 - (-0.04_f64).exp()), epsilon = 1e-12);
        assert_relative_eq!(x.dva, 0.6 * 4.0 * (1.0 - (-0.02_f64).exp()), epsilon = 1e-12);
        let spread = (0.03_f64).exp() - (0.02_f64).exp();
        let expected_fca = (-0.02_f64).exp() * (-0.01_f64).exp() * 10.0 * spread;
        assert_relative_eq!(x.fca, expected_fca, epsilon = 1e-12);
        // no lending curve configured
        assert_eq!(x.fba, 0.0);
        assert_relative_eq!(x.colva, -0.3, epsilon = 1e-15);
        assert_eq!(x.mva, 0.0);
    }

    #[test]
    fn test_own_credit_only_with_dva_name() {
        let times = [0.0, 1.0, 2.0];
        let m = market();

        // DVA on but no name: risk free
        let config = PostProcessConfig::new(Currency::USD).with_analytic(Analytic::Dva, true);
        let calc = XvaCalculator::new(&m, &config, &times).unwrap();
        assert_eq!(calc.own_credit(), &CreditProfile::risk_free(3));

        let mut config = config;
        config.dva_name = Some("BANK".to_string());
        let calc = XvaCalculator::new(&m, &config, &times).unwrap();
        let own = calc.own_credit();
        assert_relative_eq!(own.lgd(), 0.6, epsilon = 1e-15);
        assert_relative_eq!(own.survival()[2], (-0.02_f64).exp(), epsilon = 1e-12);

        // name set but nothing needs own credit
        let mut config = PostProcessConfig::new(Currency::USD).with_analytic(Analytic::Cva, true);
        config.dva_name = Some("BANK".to_string());
        let calc = XvaCalculator::new(&m, &config, &times).unwrap();
        assert_eq!(calc.own_credit().lgd(), 0.0);
    }

    #[test]
    fn test_missing_counterparty_curve_is_an_error() {
        let config = PostProcessConfig::new(Currency::USD).with_analytic(Analytic::Cva, true);
        let m = market();
        let calc = XvaCalculator::new(&m, &config, &[0.0, 1.0]).unwrap();
        let ns = NettingSet::new(NettingSetId::new("NS"), CounterpartyId::new("NOBODY"));
        assert!(matches!(
            calc.counterparty_credit(&m, &ns, "default"),
            Err(MarketDataError::NotFound { .. })
        ));
    }
}
