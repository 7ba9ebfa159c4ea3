//! Allocation of netting-set exposure and XVA to trades.
//!
//! # Methods
//!
//! - `None`: nothing is allocated (all zeros)
//! - `Marginal` (Pykhtin & Rosen 2010): per date and sample, trade `i`
//!   receives `v_i / V · max(±V_c, 0)` of the collateralised netting-set
//!   exposure, `V` being the uncollateralised netting-set value; CVA/DVA
//!   are recomputed from the allocated profiles
//! - `RelativeFairValueGross`: weights `|t0_i| / Σ |t0_j|`
//! - `RelativeFairValueNet`: weights `t0_i / Σ t0_j`
//! - `RelativeXVA`: stand-alone CVA weights for EPE and CVA, stand-alone
//!   DVA weights for ENE and DVA
//!
//! Relative weights fall back to equal shares when the denominator is within
//! the allocation tolerance of zero; marginal shares fall back to equal
//! shares for samples where `|V|` is below the marginal allocation limit.
//! Except for `None`, allocated values add up to the netting-set values.

use crate::config::AllocationMethod;
use crate::exposure::ExposureProfile;
use crate::portfolio::TradeId;
use crate::xva::{NettingSetXva, TradeXva};

/// Exposure and XVA allocated to one trade.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AllocatedXva {
    /// Trade identifier.
    pub trade_id: TradeId,
    /// Allocated EPE profile.
    pub epe: Vec<f64>,
    /// Allocated ENE profile.
    pub ene: Vec<f64>,
    /// Allocated CVA.
    pub cva: f64,
    /// Allocated DVA.
    pub dva: f64,
}

/// Netting-set data needed to allocate to its trades.
///
/// Value blocks are laid out `[date][sample]` over simulation dates.
pub struct AllocationInput<'a> {
    /// Trades of the netting set.
    pub trade_ids: &'a [TradeId],
    /// Today's trade values.
    pub trade_t0: &'a [f64],
    /// Undeflated trade values, zero after maturity.
    pub trade_values: &'a [&'a [f64]],
    /// Stand-alone trade XVA, same order as `trade_ids`.
    pub trade_xva: &'a [TradeXva],
    /// Uncollateralised netting-set value today.
    pub gross_t0: f64,
    /// Uncollateralised undeflated netting-set values.
    pub gross_values: &'a [f64],
    /// Collateralised deflated netting-set values.
    pub netted_values: &'a [f64],
    /// Samples per date.
    pub n_samples: usize,
    /// Netting-set exposure profile.
    pub profile: &'a ExposureProfile,
    /// Netting-set XVA.
    pub xva: &'a NettingSetXva,
}

/// Allocates netting-set results to trades.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AllocationEngine {
    method: AllocationMethod,
    marginal_limit: f64,
    tolerance: f64,
}

impl AllocationEngine {
    /// Creates an engine.
    pub fn new(method: AllocationMethod, marginal_limit: f64, tolerance: f64) -> Self {
        Self {
            method,
            marginal_limit,
            tolerance,
        }
    }

    /// Configured method.
    #[inline]
    pub fn method(&self) -> AllocationMethod {
        self.method
    }

    /// Normalised weights, or equal weights when `|Σ|` is within tolerance.
    ///
    /// # Examples
    ///
    /// ```
    /// use xva_postprocess::allocation::AllocationEngine;
    /// use xva_postprocess::config::AllocationMethod;
    ///
    /// let engine = AllocationEngine::new(AllocationMethod::RelativeFairValueNet, 0.0, 1e-12);
    /// assert_eq!(engine.relative_weights(&[3.0, 1.0]), vec![0.75, 0.25]);
    /// assert_eq!(engine.relative_weights(&[2.0, -2.0]), vec![0.5, 0.5]);
    /// ```
    pub fn relative_weights(&self, values: &[f64]) -> Vec<f64> {
        let n = values.len();
        let total: f64 = values.iter().sum();
        if total.abs() <= self.tolerance {
            return vec![1.0 / n as f64; n];
        }
        values.iter().map(|v| v / total).collect()
    }

    fn scaled(
        trade_id: &TradeId,
        profile: &ExposureProfile,
        xva: &NettingSetXva,
        epe_weight: f64,
        ene_weight: f64,
    ) -> AllocatedXva {
        AllocatedXva {
            trade_id: trade_id.clone(),
            epe: profile.epe().iter().map(|e| e * epe_weight).collect(),
            ene: profile.ene().iter().map(|e| e * ene_weight).collect(),
            cva: xva.cva * epe_weight,
            dva: xva.dva * ene_weight,
        }
    }

    /// Marginal profiles `(EPE_i, ENE_i)` per trade.
    pub fn marginal_profiles(&self, input: &AllocationInput<'_>) -> Vec<(Vec<f64>, Vec<f64>)> {
        let n_trades = input.trade_ids.len();
        let n_samples = input.n_samples;
        let n_points = input.gross_values.len() / n_samples + 1;
        let equal = 1.0 / n_trades as f64;
        let weight = 1.0 / n_samples as f64;
        let mut profiles = vec![(vec![0.0; n_points], vec![0.0; n_points]); n_trades];

        let share = |v_i: f64, total: f64| -> f64 {
            if total == 0.0 || total.abs() < self.marginal_limit {
                equal
            } else {
                v_i / total
            }
        };

        let gross_today = input.gross_t0;
        for (i, (epe, ene)) in profiles.iter_mut().enumerate() {
            let s_i = share(input.trade_t0[i], gross_today);
            epe[0] = s_i * gross_today.max(0.0);
            ene[0] = s_i * (-gross_today).max(0.0);
        }

        for (offset, (&total, &netted)) in input
            .gross_values
            .iter()
            .zip(input.netted_values)
            .enumerate()
        {
            let k = offset / n_samples + 1;
            let positive = netted.max(0.0) * weight;
            let negative = (-netted).max(0.0) * weight;
            for (i, (epe, ene)) in profiles.iter_mut().enumerate() {
                let s_i = share(input.trade_values[i][offset], total);
                epe[k] += s_i * positive;
                ene[k] += s_i * negative;
            }
        }
        profiles
    }

    /// Allocates one netting set.
    ///
    /// `credit` maps allocated `(EPE, ENE)` profiles to `(CVA, DVA)` and is
    /// only used by the marginal method.
    pub fn allocate(
        &self,
        input: &AllocationInput<'_>,
        credit: &dyn Fn(&[f64], &[f64]) -> (f64, f64),
    ) -> Vec<AllocatedXva> {
        let ids = input.trade_ids;
        match self.method {
            AllocationMethod::None => ids
                .iter()
                .map(|id| AllocatedXva {
                    trade_id: id.clone(),
                    epe: vec![0.0; input.profile.epe().len()],
                    ene: vec![0.0; input.profile.ene().len()],
                    cva: 0.0,
                    dva: 0.0,
                })
                .collect(),
            AllocationMethod::Marginal => self
                .marginal_profiles(input)
                .into_iter()
                .zip(ids)
                .map(|((epe, ene), id)| {
                    let (cva, dva) = credit(&epe, &ene);
                    AllocatedXva {
                        trade_id: id.clone(),
                        epe,
                        ene,
                        cva,
                        dva,
                    }
                })
                .collect(),
            AllocationMethod::RelativeFairValueGross | AllocationMethod::RelativeFairValueNet => {
                let basis: Vec<f64> = if self.method == AllocationMethod::RelativeFairValueGross {
                    input.trade_t0.iter().map(|v| v.abs()).collect()
                } else {
                    input.trade_t0.to_vec()
                };
                let w = self.relative_weights(&basis);
                ids.iter()
                    .zip(&w)
                    .map(|(id, &w)| Self::scaled(id, input.profile, input.xva, w, w))
                    .collect()
            }
            AllocationMethod::RelativeXva => {
                let cva: Vec<f64> = input.trade_xva.iter().map(|x| x.cva).collect();
                let dva: Vec<f64> = input.trade_xva.iter().map(|x| x.dva).collect();
                let wc = self.relative_weights(&cva);
                let wd = self.relative_weights(&dva);
                ids.iter()
                    .zip(wc.iter().zip(&wd))
                    .map(|(id, (&c, &d))| Self::scaled(id, input.profile, input.xva, c, d))
                    .collect()
            }
        }
    }
}
