//! Dynamic initial margin estimation.
//!
//! For every profile date `k` and sample `s` the netting-set value change
//! over the margin horizon is
//!
//! ```text
//! ΔNPV(k, s) = V(h(k), s) - V(k, s)
//! ```
//!
//! where `h(k)` is the grid date nearest to `date_k + horizon` (strictly
//! after `k`). DIM is the fitted conditional mean of ΔNPV plus the
//! `dim_quantile` of the regression residuals, floored at zero and scaled.
//! The zero-order estimate replaces the regression by the unconditional
//! quantile of ΔNPV.

mod regression;

pub use regression::{fit, RegressionFailure, SINGULAR_VALUE_TOLERANCE};

use tracing::debug;

use crate::config::PostProcessConfig;
use crate::grid::DateGrid;
use crate::scenario::{AggregationDataType, AggregationScenarioData, ScenarioError};
use crate::stats;

/// DIM estimator settings.
#[derive(Clone, Debug, PartialEq)]
pub struct DimSettings {
    /// Quantile of the residual (or ΔNPV) distribution
    pub quantile: f64,
    /// Margin horizon in calendar days
    pub horizon_days: u32,
    /// Polynomial order; 0 means zero-order estimation
    pub regression_order: usize,
    /// Additional named regressors
    pub regressors: Vec<String>,
    /// Number of samples evaluated with the local regression
    pub local_evaluations: usize,
    /// Local regression window in standard deviations
    pub local_bandwidth: f64,
    /// Multiplier applied to all estimates
    pub scaling: f64,
}

impl Default for DimSettings {
    fn default() -> Self {
        Self {
            quantile: 0.99,
            horizon_days: 14,
            regression_order: 0,
            regressors: Vec::new(),
            local_evaluations: 0,
            local_bandwidth: 0.25,
            scaling: 1.0,
        }
    }
}

impl From<&PostProcessConfig> for DimSettings {
    fn from(config: &PostProcessConfig) -> Self {
        Self {
            quantile: config.dim_quantile,
            horizon_days: config.dim_horizon_calendar_days,
            regression_order: config.dim_regression_order,
            regressors: config.dim_regressors.clone(),
            local_evaluations: config.dim_local_regression_evaluations,
            local_bandwidth: config.dim_local_regression_bandwidth,
            scaling: config.dim_scaling,
        }
    }
}

/// DIM estimates for one netting set.
#[derive(Clone, Debug, Default)]
pub struct DimResult {
    pub(crate) today: f64,
    pub(crate) values: Vec<f64>,
    pub(crate) expected: Vec<f64>,
    pub(crate) zero_order: Vec<f64>,
    pub(crate) unconditional: Vec<f64>,
    pub(crate) local: Vec<f64>,
    pub(crate) local_evaluations: usize,
}

impl DimResult {
    /// DIM today.
    #[inline]
    pub fn today(&self) -> f64 {
        self.today
    }

    /// DIM per simulation date and sample, `[date][sample]`, undeflated.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Expected deflated DIM per profile date.
    #[inline]
    pub fn expected(&self) -> &[f64] {
        &self.expected
    }

    /// Expected deflated zero-order DIM per profile date.
    #[inline]
    pub fn zero_order(&self) -> &[f64] {
        &self.zero_order
    }

    /// Zero-order DIM per profile date, undeflated.
    #[inline]
    pub fn unconditional(&self) -> &[f64] {
        &self.unconditional
    }

    /// Local regression DIM of the first evaluated samples at profile date `k`.
    #[inline]
    pub fn local(&self, k: usize) -> &[f64] {
        let n = self.local_evaluations;
        &self.local[k * n..(k + 1) * n]
    }

    /// Number of samples evaluated with the local regression.
    #[inline]
    pub fn local_evaluations(&self) -> usize {
        self.local_evaluations
    }
}

/// Sample values at profile date `k`: today's values or one simulation-date row.
fn profile_slice<'v>(today: &'v [f64], values: &'v [f64], k: usize, n_samples: usize) -> &'v [f64] {
    if k == 0 {
        today
    } else {
        &values[(k - 1) * n_samples..k * n_samples]
    }
}

/// DIM estimator over a shared grid and scenario data.
pub struct DimCalculator<'a> {
    grid: &'a DateGrid,
    data: &'a AggregationScenarioData,
    settings: &'a DimSettings,
}

impl<'a> DimCalculator<'a> {
    /// Creates an estimator.
    pub fn new(
        grid: &'a DateGrid,
        data: &'a AggregationScenarioData,
        settings: &'a DimSettings,
    ) -> Self {
        Self {
            grid,
            data,
            settings,
        }
    }

    #[inline]
    fn margin(&self, raw: f64) -> f64 {
        self.settings.scaling * raw.max(0.0)
    }

    /// Unconditional DIM of a set of value changes.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use xva_postprocess::dim::{DimCalculator, DimSettings};
    /// use xva_postprocess::grid::DateGrid;
    /// use xva_postprocess::scenario::AggregationScenarioData;
    ///
    /// let grid = DateGrid::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), &[]);
    /// let data = AggregationScenarioData::new(0, 5);
    /// let settings = DimSettings { quantile: 0.75, scaling: 2.0, ..DimSettings::default() };
    /// let dim = DimCalculator::new(&grid, &data, &settings);
    ///
    /// // 0.75-quantile of [-1, 2, 3, 5, 7] is 5
    /// assert_eq!(dim.zero_order_dim(&[3.0, -1.0, 7.0, 2.0, 5.0]), 10.0);
    /// ```
    pub fn zero_order_dim(&self, delta: &[f64]) -> f64 {
        self.margin(stats::quantile(delta, self.settings.quantile))
    }

    /// Data type under which a named regressor is recorded.
    ///
    /// Index fixings take precedence over FX spots.
    pub fn regressor_type(&self, name: &str) -> Option<AggregationDataType> {
        [AggregationDataType::IndexFixing, AggregationDataType::FxSpot]
            .into_iter()
            .find(|&t| self.data.has(t, name))
    }

    fn regression_variables(
        &self,
        npv: &[f64],
        date: usize,
    ) -> Result<Vec<Vec<f64>>, ScenarioError> {
        let n_samples = npv.len();
        let mut variables = Vec::with_capacity(1 + self.settings.regressors.len());
        variables.push(npv.to_vec());
        for name in &self.settings.regressors {
            let data_type = self
                .regressor_type(name)
                .unwrap_or(AggregationDataType::IndexFixing);
            let values = (0..n_samples)
                .map(|s| self.data.get(date, s, data_type, name))
                .collect::<Result<Vec<f64>, _>>()?;
            variables.push(values);
        }
        Ok(variables)
    }

    /// Local regression DIM around sample `s`: the quantile of ΔNPV over
    /// samples whose value lies within `bandwidth · σ` of sample `s`.
    fn local_dim(&self, npv: &[f64], delta: &[f64], s: usize, sigma: f64, fallback: f64) -> f64 {
        let width = self.settings.local_bandwidth * sigma;
        let window: Vec<f64> = npv
            .iter()
            .zip(delta)
            .filter(|(v, _)| (*v - npv[s]).abs() <= width)
            .map(|(_, d)| *d)
            .collect();
        if window.len() < 2 {
            fallback
        } else {
            self.margin(stats::quantile(&window, self.settings.quantile))
        }
    }

    /// Estimates DIM for one netting set.
    ///
    /// `values` holds the uncollateralised undeflated netting-set values,
    /// `[date][sample]` over simulation dates; `t0` is today's value.
    ///
    /// # Errors
    ///
    /// Fails when a numeraire or regressor observation is missing.
    pub fn compute(
        &self,
        t0: f64,
        values: &[f64],
        n_samples: usize,
    ) -> Result<DimResult, ScenarioError> {
        let n_points = self.grid.len();
        let n_local = self.settings.local_evaluations.min(n_samples);
        let today_npv = vec![t0; n_samples];
        let npv_at = |k: usize| profile_slice(&today_npv, values, k, n_samples);

        let mut result = DimResult {
            values: vec![0.0; values.len()],
            expected: vec![0.0; n_points],
            zero_order: vec![0.0; n_points],
            unconditional: vec![0.0; n_points],
            local: vec![0.0; n_points * n_local],
            local_evaluations: n_local,
            ..DimResult::default()
        };

        for k in 0..n_points {
            let Some(h) = self.grid.horizon_index(k, self.settings.horizon_days) else {
                continue;
            };
            let npv = npv_at(k);
            let delta: Vec<f64> = npv_at(h).iter().zip(npv).map(|(f, v)| f - v).collect();
            let zero_order = self.zero_order_dim(&delta);
            result.unconditional[k] = zero_order;

            let dim: Vec<f64> = if k == 0 || self.settings.regression_order == 0 {
                vec![zero_order; n_samples]
            } else {
                let variables = self.regression_variables(npv, k - 1)?;
                let refs: Vec<&[f64]> = variables.iter().map(Vec::as_slice).collect();
                match regression::fit(&delta, &refs, self.settings.regression_order) {
                    Ok(fitted) => {
                        let residuals: Vec<f64> =
                            delta.iter().zip(&fitted).map(|(d, f)| d - f).collect();
                        let tail = stats::quantile(&residuals, self.settings.quantile);
                        fitted.iter().map(|f| self.margin(f + tail)).collect()
                    }
                    Err(reason) => {
                        debug!(date = k, ?reason, "DIM regression fell back to zero order");
                        vec![zero_order; n_samples]
                    }
                }
            };

            if n_local > 0 {
                let sigma = stats::std_dev(npv);
                for s in 0..n_local {
                    result.local[k * n_local + s] = if k == 0 {
                        zero_order
                    } else {
                        self.local_dim(npv, &delta, s, sigma, zero_order)
                    };
                }
            }

            if k == 0 {
                result.today = zero_order;
                result.expected[0] = zero_order;
                result.zero_order[0] = zero_order;
                continue;
            }

            let j = k - 1;
            let weight = 1.0 / n_samples as f64;
            for (s, &d) in dim.iter().enumerate() {
                let numeraire = self.data.numeraire(j, s)?;
                result.values[j * n_samples + s] = d;
                result.expected[k] += d / numeraire * weight;
                result.zero_order[k] += zero_order / numeraire * weight;
            }
        }

        Ok(result)
    }
}
