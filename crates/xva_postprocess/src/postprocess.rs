//! Exposure post-processing orchestrator.
//!
//! [`PostProcess::new`] runs every stage once, in order:
//!
//! ```text
//! trade values ─► collateral walk ─► netted cube ─► exposure ─► DIM ─► XVA ─► allocation
//! ```
//!
//! Netting sets (and trades, for trade-level work) are processed in
//! parallel; each task reads the finalised inputs of earlier stages and
//! returns an owned result. The finished object is immutable.

use std::collections::HashMap;

use chrono::{Months, NaiveDate};
use rayon::prelude::*;
use tracing::{debug, info, warn};
use xva_core::market_data::Market;

use crate::allocation::{AllocatedXva, AllocationEngine, AllocationInput};
use crate::collateral::CollateralEngine;
use crate::config::{Analytic, PostProcessConfig};
use crate::cube::NpvCube;
use crate::dim::{DimCalculator, DimResult, DimSettings};
use crate::error::{PostProcessError, Result};
use crate::exposure::{ExposureCalculator, ExposureProfile};
use crate::grid::DateGrid;
use crate::portfolio::{NettingSetId, Portfolio, TradeId};
use crate::scenario::{AggregationDataType, AggregationScenarioData};
use crate::xva::{CreditProfile, NettingSetXva, PortfolioXva, TradeXva, XvaCalculator};

/// Collateral outputs of one netting set, per profile date.
///
/// All zero for netting sets without a CSA.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollateralSummary {
    expected_collateral: Vec<f64>,
    colva_increments: Vec<f64>,
    floor_increments: Vec<f64>,
}

impl CollateralSummary {
    fn zero(n_points: usize) -> Self {
        Self {
            expected_collateral: vec![0.0; n_points],
            colva_increments: vec![0.0; n_points],
            floor_increments: vec![0.0; n_points],
        }
    }

    /// Expected deflated collateral balance in base currency.
    #[inline]
    pub fn expected_collateral(&self) -> &[f64] {
        &self.expected_collateral
    }

    /// COLVA increments.
    #[inline]
    pub fn colva_increments(&self) -> &[f64] {
        &self.colva_increments
    }

    /// Collateral floor increments.
    #[inline]
    pub fn floor_increments(&self) -> &[f64] {
        &self.floor_increments
    }
}

/// Undeflated trade values, zero after the effective maturity.
struct TradeValues {
    t0: f64,
    values: Vec<f64>,
}

/// Netting-set values: gross (uncollateralised, undeflated) and netted
/// (collateralised, deflated).
struct NettingValues {
    t0: f64,
    gross: Vec<f64>,
    netted: Vec<f64>,
    collateral: CollateralSummary,
}

/// Post-processed exposures, DIM, XVA and allocations of a portfolio.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use xva_core::market_data::curves::FlatCurve;
/// use xva_core::market_data::MarketImpl;
/// use xva_core::types::Currency;
/// use xva_postprocess::cube::NpvCube;
/// use xva_postprocess::portfolio::{CounterpartyId, NettingSet, NettingSetId, PortfolioBuilder, Trade, TradeId};
/// use xva_postprocess::scenario::{AggregationDataType, AggregationScenarioData};
/// use xva_postprocess::{PostProcess, PostProcessConfig};
///
/// let as_of = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let dates = vec![NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()];
/// let portfolio = PortfolioBuilder::new()
///     .add_netting_set(NettingSet::new(NettingSetId::new("NS"), CounterpartyId::new("CP")))
///     .add_trade(Trade::new(TradeId::new("T"), NettingSetId::new("NS"), dates[0]))
///     .build()
///     .unwrap();
///
/// let mut cube = NpvCube::new(as_of, dates, vec![TradeId::new("T")], 2).unwrap();
/// cube.set(0, 0, 0, 10.0);
/// cube.set(0, 0, 1, -6.0);
///
/// let mut data = AggregationScenarioData::new(1, 2);
/// data.set(0, 0, 1.0, AggregationDataType::Numeraire, "").unwrap();
/// data.set(0, 1, 1.0, AggregationDataType::Numeraire, "").unwrap();
///
/// let market = MarketImpl::new(as_of)
///     .with_discount_curve("default", Currency::USD, FlatCurve::new(0.0));
///
/// let pp = PostProcess::new(&portfolio, &market, &cube, &data, PostProcessConfig::new(Currency::USD)).unwrap();
/// let epe = pp.netting_set_exposure(&NettingSetId::new("NS")).unwrap().epe();
/// assert_eq!(epe, &[0.0, 5.0]);
/// assert!(pp.trade_exposure(&TradeId::new("unknown")).is_err());
/// ```
pub struct PostProcess {
    config: PostProcessConfig,
    grid: DateGrid,
    trade_ids: Vec<TradeId>,
    netting_set_ids: Vec<NettingSetId>,
    gross_cube: NpvCube<NettingSetId>,
    netted_cube: NpvCube<NettingSetId>,
    dim_cube: Option<NpvCube<NettingSetId>>,
    trade_exposure: HashMap<TradeId, ExposureProfile>,
    netting_set_exposure: HashMap<NettingSetId, ExposureProfile>,
    collateral: HashMap<NettingSetId, CollateralSummary>,
    dim: HashMap<NettingSetId, DimResult>,
    trade_xva: HashMap<TradeId, TradeXva>,
    netting_set_xva: HashMap<NettingSetId, NettingSetXva>,
    allocated: HashMap<TradeId, AllocatedXva>,
}

impl PostProcess {
    /// Runs the full post-processing pipeline.
    ///
    /// # Arguments
    ///
    /// * `portfolio` - Validated trades and netting sets
    /// * `market` - Discount, funding and credit curves
    /// * `cube` - Undeflated base-currency trade values
    /// * `scenario_data` - Numeraires, FX spots and index fixings per date and sample
    /// * `config` - Post-processing configuration
    ///
    /// # Errors
    ///
    /// Aborts on invalid configuration, inconsistent inputs, missing market
    /// objects or missing scenario data.
    pub fn new(
        portfolio: &Portfolio,
        market: &dyn Market,
        cube: &NpvCube<TradeId>,
        scenario_data: &AggregationScenarioData,
        config: PostProcessConfig,
    ) -> Result<Self> {
        config.validate()?;
        Self::check_inputs(portfolio, market, cube, scenario_data, &config)?;

        let as_of = cube.as_of();
        let grid = DateGrid::new(as_of, cube.dates());
        let n_dates = cube.n_dates();
        let n_samples = cube.n_samples();
        let exercise_next_break = config.is_enabled(Analytic::ExerciseNextBreak);
        let configuration = config.market_configuration.as_str();

        info!(
            trades = portfolio.trade_count(),
            netting_sets = portfolio.netting_set_count(),
            dates = n_dates,
            samples = n_samples,
            "Starting exposure post-processing"
        );

        let numeraires = (0..n_dates)
            .flat_map(|j| (0..n_samples).map(move |s| (j, s)))
            .map(|(j, s)| scenario_data.numeraire(j, s))
            .collect::<std::result::Result<Vec<f64>, _>>()?;
        let discount_factors = {
            let curve = market.discount_curve(config.base_currency, configuration)?;
            grid.times()
                .iter()
                .map(|&t| curve.discount_factor(t))
                .collect::<std::result::Result<Vec<f64>, _>>()?
        };

        let trade_position: HashMap<&TradeId, usize> = portfolio
            .trades()
            .iter()
            .enumerate()
            .map(|(p, t)| (t.id(), p))
            .collect();
        let position = |id: &TradeId| -> Result<usize> {
            trade_position
                .get(id)
                .copied()
                .ok_or_else(|| PostProcessError::TradeNotFound(id.to_string()))
        };

        let trade_values = portfolio
            .trades()
            .par_iter()
            .map(|trade| -> Result<TradeValues> {
                let i = cube.require_index(trade.id())?;
                let maturity = trade.effective_maturity(as_of, exercise_next_break);
                let mut values = Vec::with_capacity(n_dates * n_samples);
                for (j, &date) in cube.dates().iter().enumerate() {
                    if date > maturity {
                        values.resize(values.len() + n_samples, 0.0);
                    } else {
                        values.extend_from_slice(cube.samples(i, j));
                    }
                }
                Ok(TradeValues {
                    t0: cube.t0(i),
                    values,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!("Computing collateral paths and netted values");
        let collateral_engine = CollateralEngine::new(
            &grid,
            scenario_data,
            config.base_currency,
            config.calculation_type,
        )
        .with_collateral_spread(config.collateral_spread)
        .with_floor(config.is_enabled(Analytic::CollateralFloor));

        let netting_values = portfolio
            .netting_sets()
            .par_iter()
            .map(|ns| -> Result<NettingValues> {
                let mut gross = vec![0.0; n_dates * n_samples];
                let mut t0 = 0.0;
                for id in ns.trade_ids() {
                    let trade = &trade_values[position(id)?];
                    t0 += trade.t0;
                    for (g, v) in gross.iter_mut().zip(&trade.values) {
                        *g += v;
                    }
                }
                match ns.collateral() {
                    Some(csa) => {
                        let paths = collateral_engine.run(csa, t0, &gross, n_samples)?;
                        debug!(netting_set = %ns.id(), "Collateralised netting set");
                        let collateral = CollateralSummary {
                            expected_collateral: paths.expected_collateral().to_vec(),
                            colva_increments: paths.colva_increments().to_vec(),
                            floor_increments: paths.floor_increments().to_vec(),
                        };
                        Ok(NettingValues {
                            t0,
                            gross,
                            netted: paths.into_collateralised_values(),
                            collateral,
                        })
                    }
                    None => {
                        let netted = gross.iter().zip(&numeraires).map(|(v, n)| v / n).collect();
                        Ok(NettingValues {
                            t0,
                            gross,
                            netted,
                            collateral: CollateralSummary::zero(grid.len()),
                        })
                    }
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let netting_set_ids: Vec<NettingSetId> =
            portfolio.netting_sets().iter().map(|ns| ns.id().clone()).collect();
        let mut gross_cube = cube.with_same_grid(netting_set_ids.clone())?;
        let mut netted_cube = cube.with_same_grid(netting_set_ids.clone())?;
        for (n, nv) in netting_values.iter().enumerate() {
            gross_cube.write_block(n, nv.t0, &nv.gross);
            netted_cube.write_block(n, nv.t0, &nv.netted);
        }

        info!("Aggregating exposure profiles");
        let regulatory_limit = as_of
            .checked_add_months(Months::new(12))
            .unwrap_or(NaiveDate::MAX);
        let last_date = grid.dates()[grid.len() - 1];

        let trade_profiles: Vec<ExposureProfile> = portfolio
            .trades()
            .par_iter()
            .zip(trade_values.par_iter())
            .map(|(trade, tv)| {
                let deflated: Vec<f64> =
                    tv.values.iter().zip(&numeraires).map(|(v, n)| v / n).collect();
                let maturity = trade.effective_maturity(as_of, exercise_next_break);
                ExposureCalculator::profile(
                    tv.t0,
                    &deflated,
                    n_samples,
                    &grid,
                    &discount_factors,
                    grid.window_end(regulatory_limit.min(maturity)),
                    config.quantile,
                )
            })
            .collect();

        let netting_profiles: Vec<ExposureProfile> = portfolio
            .netting_sets()
            .par_iter()
            .zip(netting_values.par_iter())
            .map(|(ns, nv)| {
                let maturity = portfolio
                    .netting_set_maturity(ns.id(), as_of, exercise_next_break)
                    .unwrap_or(last_date);
                ExposureCalculator::profile(
                    nv.t0,
                    &nv.netted,
                    n_samples,
                    &grid,
                    &discount_factors,
                    grid.window_end(regulatory_limit.min(maturity)),
                    config.quantile,
                )
            })
            .collect();

        let dim_results: Option<Vec<DimResult>> = if config.is_enabled(Analytic::Dim) {
            info!(
                order = config.dim_regression_order,
                horizon_days = config.dim_horizon_calendar_days,
                "Estimating dynamic initial margin"
            );
            let settings = DimSettings::from(&config);
            let calculator = DimCalculator::new(&grid, scenario_data, &settings);
            let results = netting_values
                .par_iter()
                .map(|nv| {
                    calculator
                        .compute(nv.t0, &nv.gross, n_samples)
                        .map_err(PostProcessError::from)
                })
                .collect::<Result<Vec<_>>>()?;
            Some(results)
        } else {
            None
        };

        let dim_cube = match &dim_results {
            Some(results) => {
                let mut dim_cube = cube.with_same_grid(netting_set_ids.clone())?;
                for (n, result) in results.iter().enumerate() {
                    dim_cube.write_block(n, result.today(), result.values());
                }
                Some(dim_cube)
            }
            None => None,
        };

        info!("Computing valuation adjustments");
        let xva_calculator = XvaCalculator::new(market, &config, grid.times())?;
        let xva_outputs = portfolio
            .netting_sets()
            .par_iter()
            .enumerate()
            .map(|(n, ns)| -> Result<(CreditProfile, NettingSetXva, Vec<TradeXva>)> {
                let counterparty = xva_calculator.counterparty_credit(market, ns, configuration)?;
                let collateral = &netting_values[n].collateral;
                let expected_dim = dim_results.as_ref().map(|d| d[n].expected());
                let ns_xva = xva_calculator.netting_set_xva(
                    ns,
                    &netting_profiles[n],
                    &counterparty,
                    expected_dim,
                    Some(collateral.colva_increments()),
                    Some(collateral.floor_increments()),
                );
                let trade_xvas = ns
                    .trade_ids()
                    .iter()
                    .map(|id| -> Result<TradeXva> {
                        let p = position(id)?;
                        Ok(xva_calculator.trade_xva(id, &trade_profiles[p], &counterparty))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok((counterparty, ns_xva, trade_xvas))
            })
            .collect::<Result<Vec<_>>>()?;

        let allocation = AllocationEngine::new(
            config.allocation_method,
            config.marginal_allocation_limit,
            config.allocation_tolerance,
        );
        info!(method = %allocation.method(), "Allocating to trades");
        let allocated = portfolio
            .netting_sets()
            .par_iter()
            .enumerate()
            .map(|(n, ns)| -> Result<Vec<AllocatedXva>> {
                let positions = ns
                    .trade_ids()
                    .iter()
                    .map(position)
                    .collect::<Result<Vec<usize>>>()?;
                let trade_t0: Vec<f64> = positions.iter().map(|&p| trade_values[p].t0).collect();
                let values: Vec<&[f64]> = positions
                    .iter()
                    .map(|&p| trade_values[p].values.as_slice())
                    .collect();
                let (counterparty, ns_xva, trade_xvas) = &xva_outputs[n];
                let input = AllocationInput {
                    trade_ids: ns.trade_ids(),
                    trade_t0: &trade_t0,
                    trade_values: &values,
                    trade_xva: trade_xvas,
                    gross_t0: netting_values[n].t0,
                    gross_values: &netting_values[n].gross,
                    netted_values: &netting_values[n].netted,
                    n_samples,
                    profile: &netting_profiles[n],
                    xva: ns_xva,
                };
                let credit = |epe: &[f64], ene: &[f64]| {
                    xva_calculator.credit_adjustments(epe, ene, counterparty)
                };
                Ok(allocation.allocate(&input, &credit))
            })
            .collect::<Result<Vec<_>>>()?;

        let trade_ids: Vec<TradeId> = portfolio.trades().iter().map(|t| t.id().clone()).collect();
        let trade_exposure = trade_ids.iter().cloned().zip(trade_profiles).collect();
        let netting_set_exposure = netting_set_ids.iter().cloned().zip(netting_profiles).collect();
        let collateral = netting_set_ids
            .iter()
            .cloned()
            .zip(netting_values.into_iter().map(|nv| nv.collateral))
            .collect();
        let dim = match dim_results {
            Some(results) => netting_set_ids.iter().cloned().zip(results).collect(),
            None => HashMap::new(),
        };
        let mut trade_xva = HashMap::with_capacity(trade_ids.len());
        let mut netting_set_xva = HashMap::with_capacity(netting_set_ids.len());
        for (_, ns_xva, trade_xvas) in xva_outputs {
            for x in trade_xvas {
                trade_xva.insert(x.trade_id.clone(), x);
            }
            netting_set_xva.insert(ns_xva.netting_set_id.clone(), ns_xva);
        }
        let allocated = allocated
            .into_iter()
            .flatten()
            .map(|a| (a.trade_id.clone(), a))
            .collect();

        let result = Self {
            config,
            grid,
            trade_ids,
            netting_set_ids,
            gross_cube,
            netted_cube,
            dim_cube,
            trade_exposure,
            netting_set_exposure,
            collateral,
            dim,
            trade_xva,
            netting_set_xva,
            allocated,
        };
        let total = result.portfolio_xva();
        info!(
            cva = total.cva,
            dva = total.dva,
            fva = total.fva(),
            mva = total.mva,
            "Exposure post-processing complete"
        );
        Ok(result)
    }

    fn check_inputs(
        portfolio: &Portfolio,
        market: &dyn Market,
        cube: &NpvCube<TradeId>,
        scenario_data: &AggregationScenarioData,
        config: &PostProcessConfig,
    ) -> Result<()> {
        if market.as_of() != cube.as_of() {
            return Err(PostProcessError::DataInconsistency(format!(
                "market as-of date {} differs from cube as-of date {}",
                market.as_of(),
                cube.as_of()
            )));
        }
        if scenario_data.n_dates() != cube.n_dates()
            || scenario_data.n_samples() != cube.n_samples()
        {
            return Err(PostProcessError::DataInconsistency(format!(
                "scenario data has {} dates x {} samples, cube has {} x {}",
                scenario_data.n_dates(),
                scenario_data.n_samples(),
                cube.n_dates(),
                cube.n_samples()
            )));
        }
        if let Some(missing) = portfolio
            .trades()
            .iter()
            .find(|t| cube.index_of(t.id()).is_none())
        {
            return Err(PostProcessError::DataInconsistency(format!(
                "trade {} is missing from the NPV cube",
                missing.id()
            )));
        }
        let unused = cube
            .ids()
            .iter()
            .filter(|id| portfolio.trade(id).is_none())
            .count();
        if unused > 0 {
            warn!(count = unused, "NPV cube holds trades outside the portfolio; ignoring them");
        }

        if config.is_enabled(Analytic::Dim) && config.dim_regression_order > 0 {
            for name in &config.dim_regressors {
                let known = [AggregationDataType::IndexFixing, AggregationDataType::FxSpot]
                    .into_iter()
                    .any(|t| scenario_data.has(t, name));
                if !known {
                    return Err(PostProcessError::Configuration(format!(
                        "DIM regressor '{name}' has no index fixing or FX spot data"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Configuration the results were computed with.
    #[inline]
    pub fn config(&self) -> &PostProcessConfig {
        &self.config
    }

    /// Profile date grid (today followed by the simulation dates).
    #[inline]
    pub fn grid(&self) -> &DateGrid {
        &self.grid
    }

    /// Trades in portfolio order.
    #[inline]
    pub fn trade_ids(&self) -> &[TradeId] {
        &self.trade_ids
    }

    /// Netting sets in portfolio order.
    #[inline]
    pub fn netting_set_ids(&self) -> &[NettingSetId] {
        &self.netting_set_ids
    }

    /// Uncollateralised, undeflated netting-set values.
    #[inline]
    pub fn gross_cube(&self) -> &NpvCube<NettingSetId> {
        &self.gross_cube
    }

    /// Collateralised, deflated netting-set values.
    #[inline]
    pub fn netted_cube(&self) -> &NpvCube<NettingSetId> {
        &self.netted_cube
    }

    /// DIM per netting set, date and sample; `None` when DIM is disabled.
    #[inline]
    pub fn dim_cube(&self) -> Option<&NpvCube<NettingSetId>> {
        self.dim_cube.as_ref()
    }

    fn trade_entry<'a, V>(map: &'a HashMap<TradeId, V>, id: &TradeId) -> Result<&'a V> {
        map.get(id)
            .ok_or_else(|| PostProcessError::TradeNotFound(id.to_string()))
    }

    fn netting_set_entry<'a, V>(
        map: &'a HashMap<NettingSetId, V>,
        id: &NettingSetId,
    ) -> Result<&'a V> {
        map.get(id)
            .ok_or_else(|| PostProcessError::NettingSetNotFound(id.to_string()))
    }

    /// Stand-alone exposure profile of a trade.
    pub fn trade_exposure(&self, id: &TradeId) -> Result<&ExposureProfile> {
        Self::trade_entry(&self.trade_exposure, id)
    }

    /// Exposure profile of a netting set after netting and collateral.
    pub fn netting_set_exposure(&self, id: &NettingSetId) -> Result<&ExposureProfile> {
        Self::netting_set_entry(&self.netting_set_exposure, id)
    }

    /// Stand-alone trade EPE.
    pub fn trade_epe(&self, id: &TradeId) -> Result<&[f64]> {
        Ok(self.trade_exposure(id)?.epe())
    }

    /// Stand-alone trade ENE.
    pub fn trade_ene(&self, id: &TradeId) -> Result<&[f64]> {
        Ok(self.trade_exposure(id)?.ene())
    }

    /// Netting-set EPE.
    pub fn netting_set_epe(&self, id: &NettingSetId) -> Result<&[f64]> {
        Ok(self.netting_set_exposure(id)?.epe())
    }

    /// Netting-set ENE.
    pub fn netting_set_ene(&self, id: &NettingSetId) -> Result<&[f64]> {
        Ok(self.netting_set_exposure(id)?.ene())
    }

    /// Netting-set PFE.
    pub fn netting_set_pfe(&self, id: &NettingSetId) -> Result<&[f64]> {
        Ok(self.netting_set_exposure(id)?.pfe())
    }

    /// Collateral outputs of a netting set.
    pub fn collateral(&self, id: &NettingSetId) -> Result<&CollateralSummary> {
        Self::netting_set_entry(&self.collateral, id)
    }

    /// Expected collateral balance of a netting set.
    pub fn expected_collateral(&self, id: &NettingSetId) -> Result<&[f64]> {
        Ok(self.collateral(id)?.expected_collateral())
    }

    /// DIM estimates of a netting set.
    ///
    /// # Errors
    ///
    /// `Configuration` when DIM is disabled, `NettingSetNotFound` for
    /// unknown ids.
    pub fn dim(&self, id: &NettingSetId) -> Result<&DimResult> {
        if self.dim_cube.is_none() {
            return Err(PostProcessError::Configuration(
                "dim analytic is disabled".to_string(),
            ));
        }
        Self::netting_set_entry(&self.dim, id)
    }

    /// Expected DIM profile of a netting set.
    pub fn expected_dim(&self, id: &NettingSetId) -> Result<&[f64]> {
        Ok(self.dim(id)?.expected())
    }

    /// Zero-order expected DIM profile of a netting set.
    pub fn zero_order_dim(&self, id: &NettingSetId) -> Result<&[f64]> {
        Ok(self.dim(id)?.zero_order())
    }

    /// Stand-alone XVA of a trade.
    pub fn trade_xva(&self, id: &TradeId) -> Result<&TradeXva> {
        Self::trade_entry(&self.trade_xva, id)
    }

    /// XVA of a netting set.
    pub fn netting_set_xva(&self, id: &NettingSetId) -> Result<&NettingSetXva> {
        Self::netting_set_entry(&self.netting_set_xva, id)
    }

    /// Netting-set CVA.
    pub fn netting_set_cva(&self, id: &NettingSetId) -> Result<f64> {
        Ok(self.netting_set_xva(id)?.cva)
    }

    /// Netting-set DVA.
    pub fn netting_set_dva(&self, id: &NettingSetId) -> Result<f64> {
        Ok(self.netting_set_xva(id)?.dva)
    }

    /// Netting-set MVA.
    pub fn netting_set_mva(&self, id: &NettingSetId) -> Result<f64> {
        Ok(self.netting_set_xva(id)?.mva)
    }

    /// Exposure and XVA allocated to a trade.
    pub fn allocated(&self, id: &TradeId) -> Result<&AllocatedXva> {
        Self::trade_entry(&self.allocated, id)
    }

    /// Allocated trade CVA.
    pub fn allocated_trade_cva(&self, id: &TradeId) -> Result<f64> {
        Ok(self.allocated(id)?.cva)
    }

    /// Allocated trade DVA.
    pub fn allocated_trade_dva(&self, id: &TradeId) -> Result<f64> {
        Ok(self.allocated(id)?.dva)
    }

    /// Portfolio totals over all netting sets.
    pub fn portfolio_xva(&self) -> PortfolioXva {
        PortfolioXva::from_netting_sets(
            self.netting_set_ids
                .iter()
                .filter_map(|id| self.netting_set_xva.get(id)),
        )
    }
}
