//! Exposure aggregation.
//!
//! Turns a `[date][sample]` block of deflated values plus today's value into
//! an [`ExposureProfile`]:
//!
//! - Expected Positive / Negative Exposure (EPE, ENE)
//! - Basel Expected Exposure EE_B = EPE / P(t)
//! - Effective EE (running maximum of EE_B)
//! - Basel EPE and effective EPE over the regulatory window
//! - Potential Future Exposure (PFE)

mod profile;

pub use profile::ExposureProfile;

use crate::grid::DateGrid;
use crate::stats;

/// Exposure calculation utilities.
///
/// Entry 0 of every profile is today and is computed from the undeflated
/// T0 value; entries `1..` come from the simulation-date blocks.
pub struct ExposureCalculator;

impl ExposureCalculator {
    /// Expected positive exposure per profile date.
    ///
    /// # Examples
    ///
    /// ```
    /// use xva_postprocess::exposure::ExposureCalculator;
    ///
    /// // two dates, two samples: [date][sample]
    /// let values = [10.0, -4.0, -2.0, 6.0];
    /// let epe = ExposureCalculator::expected_positive_exposure(3.0, &values, 2);
    /// assert_eq!(epe, vec![3.0, 5.0, 3.0]);
    /// ```
    pub fn expected_positive_exposure(t0: f64, values: &[f64], n_samples: usize) -> Vec<f64> {
        std::iter::once(t0.max(0.0))
            .chain(
                values
                    .chunks(n_samples)
                    .map(|date| date.iter().map(|v| v.max(0.0)).sum::<f64>() / n_samples as f64),
            )
            .collect()
    }

    /// Expected negative exposure per profile date, reported as a positive amount.
    pub fn expected_negative_exposure(t0: f64, values: &[f64], n_samples: usize) -> Vec<f64> {
        std::iter::once((-t0).max(0.0))
            .chain(
                values
                    .chunks(n_samples)
                    .map(|date| date.iter().map(|v| (-v).max(0.0)).sum::<f64>() / n_samples as f64),
            )
            .collect()
    }

    /// PFE per profile date: the nearest-rank `quantile` of the sample
    /// values, floored at zero.
    pub fn potential_future_exposure(
        t0: f64,
        values: &[f64],
        n_samples: usize,
        quantile: f64,
    ) -> Vec<f64> {
        std::iter::once(t0.max(0.0))
            .chain(
                values
                    .chunks(n_samples)
                    .map(|date| stats::quantile(date, quantile).max(0.0)),
            )
            .collect()
    }

    /// Basel EE: EPE restated at time-t value, `EPE(t) / P(t)`.
    pub fn basel_expected_exposure(epe: &[f64], discount_factors: &[f64]) -> Vec<f64> {
        epe.iter()
            .zip(discount_factors)
            .map(|(e, p)| e / p)
            .collect()
    }

    /// Running maximum of an exposure profile.
    ///
    /// # Examples
    ///
    /// ```
    /// use xva_postprocess::exposure::ExposureCalculator;
    ///
    /// let eee = ExposureCalculator::effective_exposure(&[1.0, 3.0, 2.0, 4.0]);
    /// assert_eq!(eee, vec![1.0, 3.0, 3.0, 4.0]);
    /// ```
    pub fn effective_exposure(ee: &[f64]) -> Vec<f64> {
        let mut running_max = f64::NEG_INFINITY;
        ee.iter()
            .map(|&v| {
                running_max = running_max.max(v);
                running_max
            })
            .collect()
    }

    /// Time-weighted average of `profile` over entries `1..=window_end`.
    ///
    /// Weights are the Act/365F fractions between consecutive profile
    /// dates. A window without simulation dates yields entry 0.
    pub fn time_weighted_average(profile: &[f64], times: &[f64], window_end: usize) -> f64 {
        if window_end == 0 {
            return profile.first().copied().unwrap_or(0.0);
        }
        let (sum, total) = (1..=window_end).fold((0.0, 0.0), |(sum, total), k| {
            let dt = times[k] - times[k - 1];
            (sum + profile[k] * dt, total + dt)
        });
        if total > 0.0 {
            sum / total
        } else {
            profile[window_end]
        }
    }

    /// Computes every exposure metric for one trade or netting set.
    ///
    /// # Arguments
    ///
    /// * `t0` - Today's value (undeflated)
    /// * `values` - Deflated values `[date][sample]`
    /// * `n_samples` - Samples per date
    /// * `grid` - Profile grid
    /// * `discount_factors` - Base-currency discount factor per profile date
    /// * `window_end` - Last profile index of the regulatory window
    /// * `quantile` - PFE quantile
    pub fn profile(
        t0: f64,
        values: &[f64],
        n_samples: usize,
        grid: &DateGrid,
        discount_factors: &[f64],
        window_end: usize,
        quantile: f64,
    ) -> ExposureProfile {
        let epe = Self::expected_positive_exposure(t0, values, n_samples);
        let ene = Self::expected_negative_exposure(t0, values, n_samples);
        let pfe = Self::potential_future_exposure(t0, values, n_samples, quantile);
        let ee_b = Self::basel_expected_exposure(&epe, discount_factors);
        let eee_b = Self::effective_exposure(&ee_b);
        let epe_b = Self::time_weighted_average(&ee_b, grid.times(), window_end);
        let eepe_b = Self::time_weighted_average(&eee_b, grid.times(), window_end);

        ExposureProfile {
            epe,
            ene,
            ee_b,
            eee_b,
            pfe,
            epe_b,
            eepe_b,
        }
    }
}
