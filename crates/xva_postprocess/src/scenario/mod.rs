//! Simulated market scenarios and auxiliary scenario data.
//!
//! This module provides:
//! - [`RiskFactorKey`] / [`KeyType`]: ordered identifiers of simulated observables
//! - [`Scenario`]: one simulated market state (date, sample) with two
//!   implementations, [`SimpleScenario`] (ordered map) and [`CompactScenario`]
//!   (sparse values over a shared [`KeyRegistry`])
//! - [`AggregationScenarioData`]: dense (date, sample) store of numeraires,
//!   index fixings and FX spots used by collateral and DIM calculations

mod aggregation;
mod compact;
mod error;
mod key;
mod simple;

pub use aggregation::{AggregationDataType, AggregationScenarioData};
pub use compact::{CompactScenario, KeyRegistry};
pub use error::ScenarioError;
pub use key::{KeyType, RiskFactorKey};
pub use simple::SimpleScenario;

use chrono::NaiveDate;

/// One simulated market state.
///
/// The numeraire is the ratio N(t)/N(0) of the simulation numeraire; values
/// are read and written by [`RiskFactorKey`]. Reading a key that was never
/// added is an error.
pub trait Scenario: Send + Sync {
    /// Simulation date of the scenario.
    fn as_of(&self) -> NaiveDate;

    /// Free-form label (e.g. `"sample_17"`).
    fn label(&self) -> &str;

    /// Replaces the label.
    fn set_label(&mut self, label: &str);

    /// Numeraire ratio N(t)/N(0).
    fn numeraire(&self) -> f64;

    /// Replaces the numeraire ratio.
    fn set_numeraire(&mut self, numeraire: f64);

    /// True if a value is stored for `key`.
    fn has(&self, key: &RiskFactorKey) -> bool;

    /// Stored keys in ascending key order.
    fn keys(&self) -> Vec<RiskFactorKey>;

    /// Stores or overwrites a value.
    fn add(&mut self, key: RiskFactorKey, value: f64) -> Result<(), ScenarioError>;

    /// Reads a value.
    fn get(&self, key: &RiskFactorKey) -> Result<f64, ScenarioError>;
}
