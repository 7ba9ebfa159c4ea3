//! Sparse scenario over a shared key registry.
//!
//! Many scenarios of one simulation share the same key universe. The
//! registry holds that universe once; each scenario stores only
//! `(slot, value)` pairs for the keys it actually carries.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

use super::error::ScenarioError;
use super::key::RiskFactorKey;
use super::Scenario;

/// Immutable, sorted universe of keys shared by compact scenarios.
#[derive(Debug, Default)]
pub struct KeyRegistry {
    keys: Vec<RiskFactorKey>,
    slots: HashMap<RiskFactorKey, u32>,
}

impl KeyRegistry {
    /// Builds a registry; duplicates are removed and keys sorted.
    pub fn new(keys: impl IntoIterator<Item = RiskFactorKey>) -> Self {
        let mut keys: Vec<RiskFactorKey> = keys.into_iter().collect();
        keys.sort();
        keys.dedup();
        let slots = keys
            .iter()
            .enumerate()
            .map(|(i, k)| (k.clone(), i as u32))
            .collect();
        Self { keys, slots }
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn slot(&self, key: &RiskFactorKey) -> Option<u32> {
        self.slots.get(key).copied()
    }
}

/// Scenario storing sparse values against a shared [`KeyRegistry`].
///
/// Adding a key that is not in the registry fails.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use chrono::NaiveDate;
/// use xva_postprocess::scenario::{CompactScenario, KeyRegistry, KeyType, RiskFactorKey, Scenario};
///
/// let eur = RiskFactorKey::new(KeyType::DiscountCurve, "EUR", 0);
/// let usd = RiskFactorKey::new(KeyType::DiscountCurve, "USD", 0);
/// let registry = Arc::new(KeyRegistry::new([eur.clone(), usd.clone()]));
///
/// let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// let mut scenario = CompactScenario::new(registry, date, "sample_3", 1.0);
/// scenario.add(usd.clone(), 0.97).unwrap();
///
/// assert!(scenario.has(&usd));
/// assert!(!scenario.has(&eur));
/// assert_eq!(scenario.keys(), vec![usd]);
/// ```
#[derive(Clone, Debug)]
pub struct CompactScenario {
    registry: Arc<KeyRegistry>,
    as_of: NaiveDate,
    label: String,
    numeraire: f64,
    // sorted by slot
    values: Vec<(u32, f64)>,
}

impl CompactScenario {
    /// Creates an empty scenario over `registry`.
    pub fn new(
        registry: Arc<KeyRegistry>,
        as_of: NaiveDate,
        label: impl Into<String>,
        numeraire: f64,
    ) -> Self {
        Self {
            registry,
            as_of,
            label: label.into(),
            numeraire,
            values: Vec::new(),
        }
    }

    /// Shared key registry.
    pub fn registry(&self) -> &Arc<KeyRegistry> {
        &self.registry
    }

    fn position(&self, slot: u32) -> Result<usize, usize> {
        self.values.binary_search_by_key(&slot, |&(s, _)| s)
    }
}

impl Scenario for CompactScenario {
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
        self.registry
            .slot(key)
            .is_some_and(|slot| self.position(slot).is_ok())
    }

    fn keys(&self) -> Vec<RiskFactorKey> {
        self.values
            .iter()
            .map(|&(slot, _)| self.registry.keys[slot as usize].clone())
            .collect()
    }

    fn add(&mut self, key: RiskFactorKey, value: f64) -> Result<(), ScenarioError> {
        let slot = self
            .registry
            .slot(&key)
            .ok_or_else(|| ScenarioError::UnregisteredKey(key.to_string()))?;
        match self.position(slot) {
            Ok(i) => self.values[i].1 = value,
            Err(i) => self.values.insert(i, (slot, value)),
        }
        Ok(())
    }

    fn get(&self, key: &RiskFactorKey) -> Result<f64, ScenarioError> {
        self.registry
            .slot(key)
            .and_then(|slot| self.position(slot).ok())
            .map(|i| self.values[i].1)
            .ok_or_else(|| ScenarioError::MissingKey {
                label: self.label.clone(),
                key: key.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{KeyType, SimpleScenario};

    fn keys() -> Vec<RiskFactorKey> {
        (0..4)
            .map(|i| RiskFactorKey::new(KeyType::DiscountCurve, "EUR", i))
            .chain([RiskFactorKey::new(KeyType::FxSpot, "USDEUR", 0)])
            .collect()
    }

    #[test]
    fn test_unregistered_key_rejected() {
        let registry = Arc::new(KeyRegistry::new(keys()));
        let mut s =
            CompactScenario::new(registry, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), "s", 1.0);
        let err = s
            .add(RiskFactorKey::new(KeyType::FxSpot, "GBPEUR", 0), 1.1)
            .unwrap_err();
        assert!(matches!(err, ScenarioError::UnregisteredKey(_)));
    }

    #[test]
    fn test_behaves_like_simple_scenario() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let registry = Arc::new(KeyRegistry::new(keys()));
        let mut compact = CompactScenario::new(registry, date, "s", 1.0);
        let mut simple = SimpleScenario::new(date, "s", 1.0);

        // out-of-order inserts and an overwrite
        for (i, value) in [(4usize, 0.9), (2, 0.97), (0, 0.995), (2, 0.96)] {
            let key = keys()[i].clone();
            compact.add(key.clone(), value).unwrap();
            simple.add(key, value).unwrap();
        }

        assert_eq!(compact.keys(), simple.keys());
        for key in keys() {
            assert_eq!(compact.has(&key), simple.has(&key));
            assert_eq!(compact.get(&key).ok(), simple.get(&key).ok());
        }
    }
}
