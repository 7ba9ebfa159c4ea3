//! Funding Valuation Adjustment (FVA = FCA - FBA) and Margin Valuation
//! Adjustment (MVA).
//!
//! Funding terms accrue over each interval `[t_{k-1}, t_k]` on the exposure
//! at its start, conditional on joint survival:
//!
//! ```text
//! FCA = Σ_k S_c(t_{k-1}) S_b(t_{k-1}) EPE(t_{k-1}) δ_borrow(k)
//! FBA = Σ_k S_c(t_{k-1}) S_b(t_{k-1}) ENE(t_{k-1}) δ_lend(k)
//! MVA = Σ_k S_c(t_{k-1}) S_b(t_{k-1}) EDIM(t_{k-1}) δ_borrow(k)
//! δ_x(k) = P_x(t_{k-1}) / P_x(t_k) - P_ois(t_{k-1}) / P_ois(t_k)
//! ```

use xva_core::market_data::curves::YieldCurve;
use xva_core::market_data::MarketDataError;

use super::CreditProfile;

/// Funding spread accrual `δ(k)` per profile date (entry 0 is zero).
pub fn funding_spread_accruals(
    funding: &dyn YieldCurve<f64>,
    ois: &dyn YieldCurve<f64>,
    times: &[f64],
) -> Result<Vec<f64>, MarketDataError> {
    let mut accruals = vec![0.0; times.len()];
    for k in 1..times.len() {
        accruals[k] = funding.growth_factor(times[k - 1], times[k])?
            - ois.growth_factor(times[k - 1], times[k])?;
    }
    Ok(accruals)
}

fn funding_sum(
    exposure: &[f64],
    counterparty: &CreditProfile,
    own: &CreditProfile,
    accruals: &[f64],
) -> f64 {
    let sc = counterparty.survival();
    let sb = own.survival();
    (1..accruals.len())
        .map(|k| sc[k - 1] * sb[k - 1] * exposure[k - 1] * accruals[k])
        .sum()
}

/// Funding Cost Adjustment on the EPE profile.
///
/// # Examples
///
/// ```
/// use xva_postprocess::xva::{compute_fca, CreditProfile};
///
/// let epe = vec![100.0, 100.0, 0.0];
/// let accruals = vec![0.0, 0.001, 0.001];
/// let fca = compute_fca(&epe, &CreditProfile::risk_free(3), &CreditProfile::risk_free(3), &accruals);
/// assert!((fca - 0.2).abs() < 1e-12);
/// ```
pub fn compute_fca(
    epe: &[f64],
    counterparty: &CreditProfile,
    own: &CreditProfile,
    borrowing_accruals: &[f64],
) -> f64 {
    funding_sum(epe, counterparty, own, borrowing_accruals)
}

/// Funding Benefit Adjustment on the ENE profile.
pub fn compute_fba(
    ene: &[f64],
    counterparty: &CreditProfile,
    own: &CreditProfile,
    lending_accruals: &[f64],
) -> f64 {
    funding_sum(ene, counterparty, own, lending_accruals)
}

/// Margin Valuation Adjustment: cost of funding the expected initial margin.
pub fn compute_mva(
    expected_dim: &[f64],
    counterparty: &CreditProfile,
    own: &CreditProfile,
    borrowing_accruals: &[f64],
) -> f64 {
    funding_sum(expected_dim, counterparty, own, borrowing_accruals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use xva_core::market_data::curves::FlatCurve;

    #[test]
    fn test_spread_accruals_of_flat_curves() {
        let funding = FlatCurve::new(0.03);
        let ois = FlatCurve::new(0.02);
        let times = [0.0, 0.5, 1.0];
        let acc = funding_spread_accruals(&funding, &ois, &times).unwrap();
        assert_eq!(acc[0], 0.0);
        assert_relative_eq!(acc[1], (0.015_f64).exp() - (0.01_f64).exp(), epsilon = 1e-14);
        assert_relative_eq!(acc[2], acc[1], epsilon = 1e-14);
    }

    #[test]
    fn test_same_curve_gives_no_funding_cost() {
        let ois = FlatCurve::new(0.02);
        let acc = funding_spread_accruals(&ois, &ois, &[0.0, 1.0, 2.0]).unwrap();
        let fca = compute_fca(
            &[10.0, 10.0, 10.0],
            &CreditProfile::risk_free(3),
            &CreditProfile::risk_free(3),
            &acc,
        );
        assert_relative_eq!(fca, 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_survival_weights_start_of_period() {
        let sc = CreditProfile::new(vec![1.0, 0.5, 0.25], 0.6);
        let sb = CreditProfile::new(vec![1.0, 0.8, 0.6], 0.6);
        let fba = compute_fba(&[2.0, 4.0, 8.0], &sc, &sb, &[0.0, 0.1, 0.1]);
        // 1*1*2*0.1 + 0.5*0.8*4*0.1
        assert_relative_eq!(fba, 0.2 + 0.16, epsilon = 1e-14);
        let mva = compute_mva(&[2.0, 4.0, 8.0], &sc, &sb, &[0.0, 0.1, 0.1]);
        assert_relative_eq!(mva, fba, epsilon = 1e-14);
    }
}
