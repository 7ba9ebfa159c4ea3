//! Credit Valuation Adjustment (CVA).
//!
//! # Formula
//!
//! ```text
//! CVA = LGD_c × Σ_k EPE(t_k) × (S_c(t_{k-1}) - S_c(t_k))
//! ```
//!
//! EPE is deflated, so no further discounting applies. The exposure is taken
//! at the end of each default interval.

use super::CreditProfile;

/// Computes CVA from a deflated EPE profile and counterparty credit.
///
/// # Examples
///
/// ```
/// use xva_postprocess::xva::{compute_cva, CreditProfile};
///
/// let epe = vec![0.0, 100.0, 100.0];
/// let counterparty = CreditProfile::new(vec![1.0, 0.99, 0.97], 0.6);
///
/// let cva = compute_cva(&epe, &counterparty);
/// assert!((cva - 0.6 * (100.0 * 0.01 + 100.0 * 0.02)).abs() < 1e-12);
/// ```
pub fn compute_cva(epe: &[f64], counterparty: &CreditProfile) -> f64 {
    default_weighted_sum(epe, counterparty)
}

/// `LGD × Σ_k exposure_k × (S_{k-1} - S_k)`.
pub(crate) fn default_weighted_sum(exposure: &[f64], credit: &CreditProfile) -> f64 {
    let survival = credit.survival();
    let sum: f64 = (1..exposure.len().min(survival.len()))
        .map(|k| exposure[k] * (survival[k - 1] - survival[k]))
        .sum();
    credit.lgd() * sum
}
