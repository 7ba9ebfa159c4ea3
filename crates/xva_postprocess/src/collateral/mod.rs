//! Collateral path engine.
//!
//! Walks every sample path of a collateralised netting set through the
//! profile dates, issuing margin calls against the CSA terms and tracking
//! the collateral balance. The outputs are the collateralised (netted and
//! deflated) values and the per-date COLVA, collateral floor and expected
//! collateral increments.
//!
//! # Margin call mechanics
//!
//! At profile date `k` with previous balance `b`:
//!
//! ```text
//! CSA(v)  = max(v - threshold_receive, 0)   if v >= 0
//!         = min(v + threshold_pay, 0)       otherwise
//!           minus the independent amount held
//! m_lag   = CSA(v[lag(k)]) - b
//! m_now   = CSA(v[k])      - b
//! ```
//!
//! The calculation type selects the call (`m_lag`, `m_now`, their minimum
//! or their maximum); it settles when it clears the minimum transfer amount
//! of its direction, in which case the balance moves to the target exactly.

mod account;

pub use account::CollateralAccount;

use tracing::debug;
use xva_core::types::Currency;

use crate::config::CollateralCalculationType;
use crate::grid::DateGrid;
use crate::portfolio::CollateralAgreement;
use crate::scenario::{AggregationDataType, AggregationScenarioData, ScenarioError};

/// Credit support amount implied by a value under the CSA terms.
///
/// # Examples
///
/// ```
/// use xva_core::types::Currency;
/// use xva_postprocess::collateral::credit_support_amount;
/// use xva_postprocess::portfolio::CollateralAgreement;
///
/// let csa = CollateralAgreement::new(Currency::USD).with_thresholds(5.0, 10.0);
/// assert_eq!(credit_support_amount(&csa, 25.0), 15.0);
/// assert_eq!(credit_support_amount(&csa, 8.0), 0.0);
/// assert_eq!(credit_support_amount(&csa, -25.0), -20.0);
/// ```
#[inline]
pub fn credit_support_amount(csa: &CollateralAgreement, value: f64) -> f64 {
    let amount = if value >= 0.0 {
        (value - csa.threshold_receive()).max(0.0)
    } else {
        (value + csa.threshold_pay()).min(0.0)
    };
    amount - csa.independent_amount_held()
}

/// Output of the collateral walk for one netting set.
#[derive(Clone, Debug)]
pub struct CollateralPaths {
    accounts: Vec<CollateralAccount>,
    collateralised: Vec<f64>,
    colva_increments: Vec<f64>,
    floor_increments: Vec<f64>,
    expected_collateral: Vec<f64>,
}

impl CollateralPaths {
    /// One account per sample.
    #[inline]
    pub fn accounts(&self) -> &[CollateralAccount] {
        &self.accounts
    }

    /// Collateralised deflated values, `[date][sample]` over simulation dates.
    #[inline]
    pub fn collateralised_values(&self) -> &[f64] {
        &self.collateralised
    }

    /// COLVA increment per profile date.
    #[inline]
    pub fn colva_increments(&self) -> &[f64] {
        &self.colva_increments
    }

    /// Collateral floor increment per profile date.
    #[inline]
    pub fn floor_increments(&self) -> &[f64] {
        &self.floor_increments
    }

    /// Expected deflated collateral balance in base currency per profile date.
    #[inline]
    pub fn expected_collateral(&self) -> &[f64] {
        &self.expected_collateral
    }

    pub(crate) fn into_collateralised_values(self) -> Vec<f64> {
        self.collateralised
    }
}

/// Runs collateral walks against shared scenario data.
pub struct CollateralEngine<'a> {
    grid: &'a DateGrid,
    data: &'a AggregationScenarioData,
    base_currency: Currency,
    calculation_type: CollateralCalculationType,
    collateral_spread: f64,
    with_floor: bool,
}

impl<'a> CollateralEngine<'a> {
    /// Creates an engine for a profile grid and its scenario data.
    pub fn new(
        grid: &'a DateGrid,
        data: &'a AggregationScenarioData,
        base_currency: Currency,
        calculation_type: CollateralCalculationType,
    ) -> Self {
        Self {
            grid,
            data,
            base_currency,
            calculation_type,
            collateral_spread: 0.0,
            with_floor: false,
        }
    }

    /// Sets the spread paid on collateral balances.
    pub fn with_collateral_spread(mut self, spread: f64) -> Self {
        self.collateral_spread = spread;
        self
    }

    /// Enables collateral floor increments (requires index fixings).
    pub fn with_floor(mut self, enabled: bool) -> Self {
        self.with_floor = enabled;
        self
    }

    fn select_call(&self, m_lag: f64, m_now: f64) -> f64 {
        match self.calculation_type {
            CollateralCalculationType::Symmetric => m_lag,
            CollateralCalculationType::NoLag => m_now,
            CollateralCalculationType::AsymmetricCva => m_lag.min(m_now),
            CollateralCalculationType::AsymmetricDva => m_lag.max(m_now),
        }
    }

    fn settles(csa: &CollateralAgreement, call: f64) -> bool {
        (call > 0.0 && call >= csa.mta_receive()) || (call < 0.0 && -call >= csa.mta_pay())
    }

    /// Walks every sample of a netting set.
    ///
    /// `values` holds undeflated base-currency netting-set values laid out
    /// `[date][sample]` over the simulation dates; `t0` is today's value.
    ///
    /// # Errors
    ///
    /// Fails when a numeraire, FX spot or collateral index fixing needed by
    /// the walk is missing from the scenario data.
    pub fn run(
        &self,
        csa: &CollateralAgreement,
        t0: f64,
        values: &[f64],
        n_samples: usize,
    ) -> Result<CollateralPaths, ScenarioError> {
        let n_points = self.grid.len();
        let n_dates = n_points - 1;
        debug_assert_eq!(values.len(), n_dates * n_samples);

        let fx_name = (csa.currency() != self.base_currency)
            .then(|| csa.currency().fx_pair(self.base_currency));
        let floor_index = if self.with_floor {
            csa.collateral_index()
        } else {
            None
        };
        let lags: Vec<usize> = (0..n_points)
            .map(|k| self.grid.lag_index(k, csa.mpor_days()))
            .collect();
        let dcf: Vec<f64> = (0..n_points)
            .map(|k| {
                if k == 0 {
                    0.0
                } else {
                    let dates = self.grid.dates();
                    csa.day_count().year_fraction(dates[k - 1], dates[k])
                }
            })
            .collect();

        let value_at = |k: usize, s: usize| -> f64 {
            if k == 0 {
                t0
            } else {
                values[(k - 1) * n_samples + s]
            }
        };

        let weight = 1.0 / n_samples as f64;
        let mut accounts = Vec::with_capacity(n_samples);
        let mut collateralised = vec![0.0; values.len()];
        let mut colva = vec![0.0; n_points];
        let mut floor = vec![0.0; n_points];
        let mut expected = vec![0.0; n_points];

        for s in 0..n_samples {
            let mut account = CollateralAccount::new(n_points);
            for k in 1..n_points {
                let j = k - 1;
                let fx = match &fx_name {
                    Some(pair) => self.data.get(j, s, AggregationDataType::FxSpot, pair)?,
                    None => 1.0,
                };
                let numeraire = self.data.numeraire(j, s)?;
                let previous = account.balance(k - 1);

                let m_lag = credit_support_amount(csa, value_at(lags[k], s) / fx) - previous;
                let m_now = credit_support_amount(csa, value_at(k, s) / fx) - previous;
                let call = self.select_call(m_lag, m_now);
                if Self::settles(csa, call) {
                    account.settle(k, call, previous + call);
                } else {
                    account.carry(k);
                }
                let balance = account.balance(k);

                collateralised[j * n_samples + s] = (value_at(k, s) - balance * fx) / numeraire;
                colva[k] -= previous * self.collateral_spread * dcf[k] * fx / numeraire * weight;
                if let Some(index) = floor_index {
                    // The first period starts today with nothing posted.
                    if k >= 2 {
                        let fixing =
                            self.data.get(j - 1, s, AggregationDataType::IndexFixing, index)?;
                        let floor_rate = (-(fixing - self.collateral_spread)).max(0.0);
                        floor[k] -= previous * floor_rate * dcf[k] * fx / numeraire * weight;
                    }
                }
                expected[k] += balance * fx / numeraire * weight;
            }
            accounts.push(account);
        }

        debug!(
            currency = %csa.currency(),
            mpor_days = csa.mpor_days(),
            samples = n_samples,
            "Collateral walk complete"
        );

        Ok(CollateralPaths {
            accounts,
            collateralised,
            colva_increments: colva,
            floor_increments: floor,
            expected_collateral: expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    /// Weekly grid with 4 simulation dates and unit numeraire.
    fn setup(n_samples: usize) -> (DateGrid, AggregationScenarioData) {
        let sims: Vec<NaiveDate> = (1..=4).map(|w| as_of() + Duration::days(7 * w)).collect();
        let grid = DateGrid::new(as_of(), &sims);
        let mut data = AggregationScenarioData::new(4, n_samples);
        for j in 0..4 {
            for s in 0..n_samples {
                data.set(j, s, 1.0, AggregationDataType::Numeraire, "").unwrap();
            }
        }
        (grid, data)
    }

    #[test]
    fn test_perfect_csa_removes_exposure() {
        let (grid, data) = setup(2);
        let csa = CollateralAgreement::new(Currency::USD);
        let engine = CollateralEngine::new(
            &grid,
            &data,
            Currency::USD,
            CollateralCalculationType::NoLag,
        );
        let values = [10.0, -5.0, 20.0, -8.0, 15.0, 3.0, 0.0, 7.0];
        let paths = engine.run(&csa, 0.0, &values, 2).unwrap();
        assert!(paths.collateralised_values().iter().all(|v| v.abs() < 1e-12));
        assert_eq!(paths.accounts()[0].balances(), &[0.0, 10.0, 20.0, 15.0, 0.0]);
    }

    #[test]
    fn test_symmetric_lag_uses_mpor_value() {
        let (grid, data) = setup(1);
        let csa = CollateralAgreement::new(Currency::USD).with_mpor_days(7);
        let engine = CollateralEngine::new(
            &grid,
            &data,
            Currency::USD,
            CollateralCalculationType::Symmetric,
        );
        let values = [10.0, 20.0, 30.0, 40.0];
        let paths = engine.run(&csa, 0.0, &values, 1).unwrap();
        // Balance trails the value by one week.
        assert_eq!(paths.accounts()[0].balances(), &[0.0, 0.0, 10.0, 20.0, 30.0]);
        assert_eq!(paths.collateralised_values(), &[10.0, 10.0, 10.0, 10.0]);
    }

    #[test]
    fn test_asymmetric_types() {
        let (grid, data) = setup(1);
        let csa = CollateralAgreement::new(Currency::USD).with_mpor_days(7);
        let values = [10.0, -20.0, 0.0, 0.0];

        let cva = CollateralEngine::new(
            &grid,
            &data,
            Currency::USD,
            CollateralCalculationType::AsymmetricCva,
        )
        .run(&csa, 0.0, &values, 1)
        .unwrap();
        // Receiving is delayed, posting is immediate.
        assert_eq!(cva.accounts()[0].balances()[1], 0.0);
        assert_eq!(cva.accounts()[0].balances()[2], -20.0);

        let dva = CollateralEngine::new(
            &grid,
            &data,
            Currency::USD,
            CollateralCalculationType::AsymmetricDva,
        )
        .run(&csa, 0.0, &values, 1)
        .unwrap();
        assert_eq!(dva.accounts()[0].balances()[1], 10.0);
        assert_eq!(dva.accounts()[0].balances()[2], 10.0);
    }

    #[test]
    fn test_threshold_mta_and_independent_amount() {
        let (grid, data) = setup(1);
        let csa = CollateralAgreement::new(Currency::USD)
            .with_thresholds(0.0, 5.0)
            .with_minimum_transfer_amounts(0.0, 3.0)
            .with_independent_amount(1.0);
        let engine = CollateralEngine::new(
            &grid,
            &data,
            Currency::USD,
            CollateralCalculationType::NoLag,
        );
        // CSA amounts: 0-1=-1, 12-5-1=6, 14-5-1=8, 13-5-1=7
        let values = [0.0, 12.0, 14.0, 13.0];
        let paths = engine.run(&csa, 0.0, &values, 1).unwrap();
        let account = &paths.accounts()[0];
        assert_eq!(account.balances(), &[0.0, -1.0, 6.0, 6.0, 6.0]);
        assert_eq!(account.margin_calls(), &[0.0, -1.0, 7.0, 0.0, 0.0]);
    }

    #[test]
    fn test_fx_conversion_and_missing_rate() {
        let (grid, mut data) = setup(1);
        let csa = CollateralAgreement::new(Currency::EUR);
        let engine = CollateralEngine::new(
            &grid,
            &data,
            Currency::USD,
            CollateralCalculationType::NoLag,
        );
        assert!(matches!(
            engine.run(&csa, 0.0, &[1.0; 4], 1),
            Err(ScenarioError::MissingData { data_type: AggregationDataType::FxSpot, .. })
        ));

        for j in 0..4 {
            data.set(j, 0, 1.25, AggregationDataType::FxSpot, "EURUSD").unwrap();
        }
        let engine = CollateralEngine::new(
            &grid,
            &data,
            Currency::USD,
            CollateralCalculationType::NoLag,
        );
        let paths = engine.run(&csa, 0.0, &[10.0; 4], 1).unwrap();
        assert_relative_eq!(paths.accounts()[0].balance(1), 8.0, epsilon = 1e-12);
        assert_relative_eq!(paths.expected_collateral()[1], 10.0, epsilon = 1e-12);
        assert!(paths.collateralised_values().iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn test_colva_and_floor_increments() {
        let (grid, mut data) = setup(1);
        for j in 0..4 {
            data.set(j, 0, -0.01, AggregationDataType::IndexFixing, "USD-SOFR").unwrap();
        }
        let csa = CollateralAgreement::new(Currency::USD).with_collateral_index("USD-SOFR");
        let engine = CollateralEngine::new(
            &grid,
            &data,
            Currency::USD,
            CollateralCalculationType::NoLag,
        )
        .with_collateral_spread(0.001)
        .with_floor(true);
        let paths = engine.run(&csa, 0.0, &[100.0; 4], 1).unwrap();

        let dcf = 7.0 / 360.0;
        assert_eq!(paths.colva_increments()[0], 0.0);
        assert_eq!(paths.colva_increments()[1], 0.0);
        assert_relative_eq!(paths.colva_increments()[2], -100.0 * 0.001 * dcf, epsilon = 1e-14);
        assert_relative_eq!(paths.floor_increments()[3], -100.0 * 0.011 * dcf, epsilon = 1e-14);
    }

    #[test]
    fn test_floor_requires_fixings() {
        let (grid, data) = setup(1);
        let csa = CollateralAgreement::new(Currency::USD).with_collateral_index("USD-SOFR");
        let engine = CollateralEngine::new(
            &grid,
            &data,
            Currency::USD,
            CollateralCalculationType::NoLag,
        )
        .with_floor(true);
        assert!(engine.run(&csa, 0.0, &[1.0; 4], 1).is_err());
    }
}
