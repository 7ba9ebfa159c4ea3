//! Risk factor keys.

use std::fmt;
use std::str::FromStr;

use super::error::ScenarioError;

/// Type of a simulated market observable.
///
/// The declaration order defines the primary sort order of [`RiskFactorKey`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyType {
    /// Discount curve of a currency
    DiscountCurve,
    /// Named yield curve
    YieldCurve,
    /// Forwarding curve of an index
    IndexCurve,
    /// Swaption volatility
    SwaptionVolatility,
    /// FX spot rate
    FxSpot,
    /// FX volatility
    FxVolatility,
}

impl KeyType {
    /// Returns the canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            KeyType::DiscountCurve => "DiscountCurve",
            KeyType::YieldCurve => "YieldCurve",
            KeyType::IndexCurve => "IndexCurve",
            KeyType::SwaptionVolatility => "SwaptionVolatility",
            KeyType::FxSpot => "FXSpot",
            KeyType::FxVolatility => "FXVolatility",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeyType {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DiscountCurve" => Ok(KeyType::DiscountCurve),
            "YieldCurve" => Ok(KeyType::YieldCurve),
            "IndexCurve" => Ok(KeyType::IndexCurve),
            "SwaptionVolatility" => Ok(KeyType::SwaptionVolatility),
            "FXSpot" => Ok(KeyType::FxSpot),
            "FXVolatility" => Ok(KeyType::FxVolatility),
            _ => Err(ScenarioError::InvalidKey(s.to_string())),
        }
    }
}

/// Identifier of one simulated market observable.
///
/// Keys order by type, then name, then index. The display form is
/// `Type/name/index` and parses back with [`FromStr`].
///
/// # Examples
///
/// ```
/// use xva_postprocess::scenario::{KeyType, RiskFactorKey};
///
/// let a = RiskFactorKey::new(KeyType::DiscountCurve, "EUR", 3);
/// let b = RiskFactorKey::new(KeyType::FxSpot, "EURUSD", 0);
/// assert!(a < b);
/// assert_eq!(a.to_string(), "DiscountCurve/EUR/3");
/// assert_eq!("DiscountCurve/EUR/3".parse::<RiskFactorKey>().unwrap(), a);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RiskFactorKey {
    key_type: KeyType,
    name: String,
    index: usize,
}

impl RiskFactorKey {
    /// Creates a key.
    pub fn new(key_type: KeyType, name: impl Into<String>, index: usize) -> Self {
        Self {
            key_type,
            name: name.into(),
            index,
        }
    }

    /// Observable type.
    #[inline]
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Observable name (currency, curve, index or pair).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sub-index, e.g. the curve tenor position.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for RiskFactorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.key_type, self.name, self.index)
    }
}

impl FromStr for RiskFactorKey {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        let (Some(key_type), Some(name), Some(index), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ScenarioError::InvalidKey(s.to_string()));
        };
        let index = index
            .parse()
            .map_err(|_| ScenarioError::InvalidKey(s.to_string()))?;
        Ok(Self::new(key_type.parse()?, name, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_type_then_name_then_index() {
        let mut keys = vec![
            RiskFactorKey::new(KeyType::IndexCurve, "EUR-EURIBOR-6M", 0),
            RiskFactorKey::new(KeyType::DiscountCurve, "USD", 1),
            RiskFactorKey::new(KeyType::DiscountCurve, "EUR", 10),
            RiskFactorKey::new(KeyType::DiscountCurve, "EUR", 2),
        ];
        keys.sort();
        let shown: Vec<String> = keys.iter().map(ToString::to_string).collect();
        assert_eq!(
            shown,
            [
                "DiscountCurve/EUR/2",
                "DiscountCurve/EUR/10",
                "DiscountCurve/USD/1",
                "IndexCurve/EUR-EURIBOR-6M/0",
            ]
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("FXSpot/EURUSD".parse::<RiskFactorKey>().is_err());
        assert!("FXSpot/EURUSD/x".parse::<RiskFactorKey>().is_err());
        assert!("Equity/SPX/0".parse::<RiskFactorKey>().is_err());
        assert!("FXSpot/EURUSD/0/1".parse::<RiskFactorKey>().is_err());
    }
}
