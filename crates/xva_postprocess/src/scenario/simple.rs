//! Map-backed scenario.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::error::ScenarioError;
use super::key::RiskFactorKey;
use super::Scenario;

/// Scenario storing its values in an ordered map.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use xva_postprocess::scenario::{KeyType, RiskFactorKey, Scenario, SimpleScenario};
///
/// let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// let mut scenario = SimpleScenario::new(date, "sample_0", 1.02);
/// let key = RiskFactorKey::new(KeyType::FxSpot, "USDEUR", 0);
/// scenario.add(key.clone(), 0.91).unwrap();
///
/// assert_eq!(scenario.get(&key).unwrap(), 0.91);
/// assert!(scenario.get(&RiskFactorKey::new(KeyType::FxSpot, "GBPEUR", 0)).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SimpleScenario {
    as_of: NaiveDate,
    label: String,
    numeraire: f64,
    data: BTreeMap<RiskFactorKey, f64>,
}

impl SimpleScenario {
    /// Creates an empty scenario.
    pub fn new(as_of: NaiveDate, label: impl Into<String>, numeraire: f64) -> Self {
        Self {
            as_of,
            label: label.into(),
            numeraire,
            data: BTreeMap::new(),
        }
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if no values are stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Scenario for SimpleScenario {
    fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn set_label(&mut self, label: &str) {
        self.label = label.to_string();
    }

    fn numeraire(&self) -> f64 {
        self.numeraire
    }

    fn set_numeraire(&mut self, numeraire: f64) {
        self.numeraire = numeraire;
    }

    fn has(&self, key: &RiskFactorKey) -> bool {
        self.data.contains_key(key)
    }

    fn keys(&self) -> Vec<RiskFactorKey> {
        self.data.keys().cloned().collect()
    }

    fn add(&mut self, key: RiskFactorKey, value: f64) -> Result<(), ScenarioError> {
        self.data.insert(key, value);
        Ok(())
    }

    fn get(&self, key: &RiskFactorKey) -> Result<f64, ScenarioError> {
        self.data
            .get(key)
            .copied()
            .ok_or_else(|| ScenarioError::MissingKey {
                label: self.label.clone(),
                key: key.to_string(),
            })
    }
}
