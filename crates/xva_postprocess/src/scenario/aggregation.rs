//! Auxiliary per-(date, sample) observables recorded during simulation.
//!
//! The post-processor never sees full scenarios. It only needs the
//! numeraire, a handful of index fixings (collateral remuneration, DIM
//! regressors) and FX spots (collateral currency conversion). These are
//! stored densely per named series.

use std::collections::HashMap;
use std::fmt;

use super::error::ScenarioError;
use super::key::KeyType;
use super::Scenario;

/// Kind of auxiliary observable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AggregationDataType {
    /// Numeraire ratio N(t)/N(0); the series name is ignored.
    Numeraire,
    /// Fixing of a named index on the simulation date
    IndexFixing,
    /// FX spot of a named currency pair
    FxSpot,
}

impl fmt::Display for AggregationDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AggregationDataType::Numeraire => "Numeraire",
            AggregationDataType::IndexFixing => "IndexFixing",
            AggregationDataType::FxSpot => "FXSpot",
        })
    }
}

/// Dense store of auxiliary observables, indexed by simulation date
/// (0-based, excluding today) and sample.
///
/// # Examples
///
/// ```
/// use xva_postprocess::scenario::{AggregationDataType, AggregationScenarioData};
///
/// let mut data = AggregationScenarioData::new(2, 3);
/// data.set(1, 2, 1.015, AggregationDataType::Numeraire, "").unwrap();
/// assert_eq!(data.numeraire(1, 2).unwrap(), 1.015);
///
/// // Values never recorded are errors, not zeros
/// assert!(data.numeraire(0, 0).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct AggregationScenarioData {
    n_dates: usize,
    n_samples: usize,
    series: HashMap<(AggregationDataType, String), Vec<Option<f64>>>,
}

impl AggregationScenarioData {
    /// Creates an empty store for `n_dates` simulation dates and `n_samples` paths.
    pub fn new(n_dates: usize, n_samples: usize) -> Self {
        Self {
            n_dates,
            n_samples,
            series: HashMap::new(),
        }
    }

    /// Number of simulation dates.
    #[inline]
    pub fn n_dates(&self) -> usize {
        self.n_dates
    }

    /// Number of samples.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    fn series_key(data_type: AggregationDataType, name: &str) -> (AggregationDataType, String) {
        match data_type {
            AggregationDataType::Numeraire => (data_type, String::new()),
            _ => (data_type, name.to_string()),
        }
    }

    fn offset(&self, date: usize, sample: usize) -> Result<usize, ScenarioError> {
        if date >= self.n_dates || sample >= self.n_samples {
            return Err(ScenarioError::IndexOutOfRange {
                date,
                sample,
                n_dates: self.n_dates,
                n_samples: self.n_samples,
            });
        }
        Ok(date * self.n_samples + sample)
    }

    /// Records a value.
    pub fn set(
        &mut self,
        date: usize,
        sample: usize,
        value: f64,
        data_type: AggregationDataType,
        name: &str,
    ) -> Result<(), ScenarioError> {
        let offset = self.offset(date, sample)?;
        let size = self.n_dates * self.n_samples;
        self.series
            .entry(Self::series_key(data_type, name))
            .or_insert_with(|| vec![None; size])[offset] = Some(value);
        Ok(())
    }

    /// Reads a value.
    pub fn get(
        &self,
        date: usize,
        sample: usize,
        data_type: AggregationDataType,
        name: &str,
    ) -> Result<f64, ScenarioError> {
        let offset = self.offset(date, sample)?;
        self.series
            .get(&Self::series_key(data_type, name))
            .and_then(|values| values[offset])
            .ok_or_else(|| ScenarioError::MissingData {
                data_type,
                name: name.to_string(),
                date,
                sample,
            })
    }

    /// True if any value of the series was recorded.
    pub fn has(&self, data_type: AggregationDataType, name: &str) -> bool {
        self.series
            .contains_key(&Self::series_key(data_type, name))
    }

    /// Numeraire ratio at a simulation date and sample.
    #[inline]
    pub fn numeraire(&self, date: usize, sample: usize) -> Result<f64, ScenarioError> {
        self.get(date, sample, AggregationDataType::Numeraire, "")
    }

    /// Copies the numeraire and all FX spot keys of a scenario.
    pub fn record_scenario(
        &mut self,
        date: usize,
        sample: usize,
        scenario: &dyn Scenario,
    ) -> Result<(), ScenarioError> {
        self.set(
            date,
            sample,
            scenario.numeraire(),
            AggregationDataType::Numeraire,
            "",
        )?;
        for key in scenario
            .keys()
            .into_iter()
            .filter(|k| k.key_type() == KeyType::FxSpot)
        {
            let value = scenario.get(&key)?;
            self.set(date, sample, value, AggregationDataType::FxSpot, key.name())?;
        }
        Ok(())
    }
}
