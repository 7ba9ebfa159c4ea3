//! Identifier types for portfolio entities.
//!
//! Strongly-typed identifiers for trades, counterparties, and netting sets.
//! All identifiers are totally ordered so that results can be reported in a
//! deterministic order.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier.
            #[inline]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a trade.
    ///
    /// ```
    /// use xva_postprocess::portfolio::TradeId;
    ///
    /// let id = TradeId::new("SWAP_EUR_10Y");
    /// assert_eq!(id.as_str(), "SWAP_EUR_10Y");
    /// ```
    TradeId
);

define_id!(
    /// Unique identifier for a counterparty.
    ///
    /// The same name keys the counterparty's default curve and recovery rate
    /// in the market.
    CounterpartyId
);

define_id!(
    /// Unique identifier for a netting set.
    NettingSetId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_order_lexicographically() {
        let mut ids = vec![TradeId::new("T3"), TradeId::new("T1"), TradeId::new("T2")];
        ids.sort();
        let names: Vec<&str> = ids.iter().map(TradeId::as_str).collect();
        assert_eq!(names, ["T1", "T2", "T3"]);
    }

    #[test]
    fn test_id_conversions() {
        assert_eq!(NettingSetId::from("NS1"), NettingSetId::new("NS1"));
        assert_eq!(
            CounterpartyId::from("CP".to_string()).to_string(),
            "CP".to_string()
        );
    }
}
