//! Polynomial least-squares regression of NPV changes.
//!
//! Every regression variable is standardised and enters the design matrix
//! through its powers `1..=order`, next to a constant column. There are no
//! cross terms. The system is solved by SVD.

use nalgebra::{DMatrix, DVector};

use crate::stats;

/// Smallest accepted ratio of smallest to largest singular value.
pub const SINGULAR_VALUE_TOLERANCE: f64 = 1e-10;

/// Why a regression could not be fitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegressionFailure {
    /// Not more samples than design-matrix columns.
    TooFewSamples,
    /// A regression variable is constant across samples.
    ZeroVariance,
    /// The design matrix is numerically rank deficient.
    RankDeficient,
}

/// Fitted conditional mean of `y` at every sample.
///
/// `variables` holds one slice per regression variable, each with one
/// entry per sample.
pub fn fit(
    y: &[f64],
    variables: &[&[f64]],
    order: usize,
) -> Result<Vec<f64>, RegressionFailure> {
    let n = y.len();
    let n_cols = 1 + order * variables.len();
    if n <= n_cols {
        return Err(RegressionFailure::TooFewSamples);
    }

    let mut standardised = Vec::with_capacity(variables.len());
    for values in variables {
        let mean = stats::mean(values);
        let sd = stats::std_dev(values);
        if sd <= f64::EPSILON * mean.abs().max(1.0) {
            return Err(RegressionFailure::ZeroVariance);
        }
        standardised.push(values.iter().map(|v| (v - mean) / sd).collect::<Vec<f64>>());
    }

    let x = DMatrix::from_fn(n, n_cols, |row, col| {
        if col == 0 {
            return 1.0;
        }
        let variable = (col - 1) / order;
        let power = (col - 1) % order + 1;
        standardised[variable][row].powi(power as i32)
    });
    let rhs = DVector::from_column_slice(y);

    let svd = x.clone().svd(true, true);
    let sigma_max = svd.singular_values.max();
    let sigma_min = svd.singular_values.min();
    if !sigma_max.is_finite()
        || sigma_max <= 0.0
        || sigma_min / sigma_max < SINGULAR_VALUE_TOLERANCE
    {
        return Err(RegressionFailure::RankDeficient);
    }
    let coefficients = svd
        .solve(&rhs, sigma_max * f64::EPSILON)
        .map_err(|_| RegressionFailure::RankDeficient)?;

    Ok((&x * coefficients).iter().copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_recovers_quadratic() {
        let x: Vec<f64> = (0..20).map(|i| i as f64 * 0.5 - 3.0).collect();
        let y: Vec<f64> = x.iter().map(|v| 1.0 + 2.0 * v - 0.5 * v * v).collect();
        let fitted = fit(&y, &[&x], 2).unwrap();
        for (f, t) in fitted.iter().zip(&y) {
            assert_relative_eq!(*f, *t, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_linear_fit_of_noisy_data_is_least_squares() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [1.0, 3.0, 2.0, 4.0];
        let fitted = fit(&y, &[&x], 1).unwrap();
        // OLS: slope 0.8, intercept 0.5
        assert_relative_eq!(fitted[0], 1.3, epsilon = 1e-12);
        assert_relative_eq!(fitted[3], 3.7, epsilon = 1e-12);
    }

    #[test]
    fn test_failures() {
        let x = [1.0, 2.0, 3.0];
        assert_eq!(
            fit(&[1.0, 2.0, 3.0], &[&x], 2),
            Err(RegressionFailure::TooFewSamples)
        );
        let flat = [2.0; 6];
        assert_eq!(
            fit(&[1.0; 6], &[&flat], 1),
            Err(RegressionFailure::ZeroVariance)
        );
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let b = [2.0, 4.0, 6.0, 8.0, 10.0, 12.0];
        assert_eq!(
            fit(&[0.0, 1.0, 0.0, 1.0, 0.0, 1.0], &[&a, &b], 1),
            Err(RegressionFailure::RankDeficient)
        );
    }
}
