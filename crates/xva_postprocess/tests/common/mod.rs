//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use chrono::{Months, NaiveDate};
use xva_core::market_data::curves::{FlatCurve, FlatHazardRateCurve};
use xva_core::market_data::MarketImpl;
use xva_core::types::Currency;
use xva_postprocess::cube::NpvCube;
use xva_postprocess::portfolio::TradeId;
use xva_postprocess::scenario::{AggregationDataType, AggregationScenarioData};

pub const OIS_RATE: f64 = 0.02;
pub const CPTY_HAZARD: f64 = 0.02;
pub const OWN_HAZARD: f64 = 0.01;
pub const RECOVERY: f64 = 0.4;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn as_of() -> NaiveDate {
    date(2024, 1, 1)
}

/// 2024-04-01, 2024-07-01, ... (`n` quarterly dates)
pub fn quarterly_dates(n: usize) -> Vec<NaiveDate> {
    (1..=n as u32)
        .map(|q| as_of().checked_add_months(Months::new(3 * q)).unwrap())
        .collect()
}

pub fn market() -> MarketImpl {
    MarketImpl::new(as_of())
        .with_discount_curve("default", Currency::USD, FlatCurve::new(OIS_RATE))
        .with_discount_curve("default", Currency::EUR, FlatCurve::new(0.01))
        .with_yield_curve("default", "USD-BORROW", FlatCurve::new(0.025))
        .with_yield_curve("default", "USD-LEND", FlatCurve::new(0.022))
        .with_default_curve("default", "CPTY_A", FlatHazardRateCurve::new(CPTY_HAZARD))
        .with_recovery_rate("default", "CPTY_A", RECOVERY)
        .with_default_curve("default", "BANK", FlatHazardRateCurve::new(OWN_HAZARD))
        .with_recovery_rate("default", "BANK", RECOVERY)
}

/// Scenario data with a numeraire of 1 everywhere.
pub fn unit_numeraire(n_dates: usize, n_samples: usize) -> AggregationScenarioData {
    let mut data = AggregationScenarioData::new(n_dates, n_samples);
    for j in 0..n_dates {
        for s in 0..n_samples {
            data.set(j, s, 1.0, AggregationDataType::Numeraire, "").unwrap();
        }
    }
    data
}

/// Fills the same value for every (date, sample) of a series.
pub fn fill_series(data: &mut AggregationScenarioData, data_type: AggregationDataType, name: &str, value: f64) {
    for j in 0..data.n_dates() {
        for s in 0..data.n_samples() {
            data.set(j, s, value, data_type, name).unwrap();
        }
    }
}

/// Trade cube from `(id, t0, values[date][sample])` rows.
pub fn cube(dates: Vec<NaiveDate>, n_samples: usize, trades: &[(&str, f64, Vec<Vec<f64>>)]) -> NpvCube<TradeId> {
    let ids = trades.iter().map(|(id, _, _)| TradeId::new(*id)).collect();
    let mut cube = NpvCube::new(as_of(), dates, ids, n_samples).unwrap();
    for (i, (_, t0, values)) in trades.iter().enumerate() {
        cube.set_t0(i, *t0);
        for (j, row) in values.iter().enumerate() {
            for (s, v) in row.iter().enumerate() {
                cube.set(i, j, s, *v);
            }
        }
    }
    cube
}

/// Survival probability of a flat hazard rate curve.
pub fn survival(hazard: f64, t: f64) -> f64 {
    (-hazard * t).exp()
}
