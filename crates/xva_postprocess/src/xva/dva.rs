//! Debit Valuation Adjustment (DVA).
//!
//! ```text
//! DVA = LGD_b × Σ_k ENE(t_k) × (S_b(t_{k-1}) - S_b(t_k))
//! ```

use super::cva::default_weighted_sum;
use super::CreditProfile;

/// Computes DVA from a deflated ENE profile and own credit.
///
/// # Examples
///
/// ```
/// use xva_postprocess::xva::{compute_dva, CreditProfile};
///
/// let ene = vec![0.0, 50.0];
/// let own = CreditProfile::new(vec![1.0, 0.98], 0.5);
/// assert!((compute_dva(&ene, &own) - 0.5).abs() < 1e-12);
/// ```
pub fn compute_dva(ene: &[f64], own: &CreditProfile) -> f64 {
    default_weighted_sum(ene, own)
}
