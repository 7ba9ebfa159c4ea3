//! Portfolio structures consumed by the post-processor.
//!
//! This module provides:
//! - Typed identifiers ([`TradeId`], [`CounterpartyId`], [`NettingSetId`])
//! - [`Trade`] with maturity and break dates
//! - [`NettingSet`] with optional [`CollateralAgreement`] terms
//! - [`Portfolio`] built and validated through [`PortfolioBuilder`]
//!
//! Counterparty credit data (default curves, recovery rates) is not stored
//! here; it is looked up in the market by counterparty name.

mod builder;
mod error;
mod ids;
mod netting_set;
mod trade;

pub use builder::PortfolioBuilder;
pub use error::PortfolioError;
pub use ids::{CounterpartyId, NettingSetId, TradeId};
pub use netting_set::{CollateralAgreement, NettingSet};
pub use trade::Trade;

use std::collections::HashMap;

use chrono::NaiveDate;

/// Validated portfolio of trades grouped into netting sets.
///
/// Iteration order is the insertion order of the builder; lookups by ID go
/// through hash indices.
#[derive(Clone, Debug)]
pub struct Portfolio {
    trades: Vec<Trade>,
    netting_sets: Vec<NettingSet>,
    trade_index: HashMap<TradeId, usize>,
    netting_set_index: HashMap<NettingSetId, usize>,
}

impl Portfolio {
    pub(crate) fn from_parts(trades: Vec<Trade>, netting_sets: Vec<NettingSet>) -> Self {
        let trade_index = trades
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id().clone(), i))
            .collect();
        let netting_set_index = netting_sets
            .iter()
            .enumerate()
            .map(|(i, ns)| (ns.id().clone(), i))
            .collect();
        Self {
            trades,
            netting_sets,
            trade_index,
            netting_set_index,
        }
    }

    /// All trades in portfolio order.
    #[inline]
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// All netting sets in portfolio order.
    #[inline]
    pub fn netting_sets(&self) -> &[NettingSet] {
        &self.netting_sets
    }

    /// Number of trades.
    #[inline]
    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }

    /// Number of netting sets.
    #[inline]
    pub fn netting_set_count(&self) -> usize {
        self.netting_sets.len()
    }

    /// Looks up a trade by ID.
    pub fn trade(&self, id: &TradeId) -> Option<&Trade> {
        self.trade_index.get(id).map(|&i| &self.trades[i])
    }

    /// Looks up a netting set by ID.
    pub fn netting_set(&self, id: &NettingSetId) -> Option<&NettingSet> {
        self.netting_set_index.get(id).map(|&i| &self.netting_sets[i])
    }

    /// Latest effective trade maturity in a netting set.
    pub fn netting_set_maturity(
        &self,
        id: &NettingSetId,
        as_of: NaiveDate,
        exercise_next_break: bool,
    ) -> Option<NaiveDate> {
        self.netting_set(id)?
            .trade_ids()
            .iter()
            .filter_map(|t| self.trade(t))
            .map(|t| t.effective_maturity(as_of, exercise_next_break))
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn portfolio() -> Portfolio {
        PortfolioBuilder::new()
            .add_netting_set(NettingSet::new("NS_B".into(), "CP1".into()))
            .add_netting_set(NettingSet::new("NS_A".into(), "CP2".into()))
            .add_trade(Trade::new("T1".into(), "NS_B".into(), date(2026, 1, 1)))
            .add_trade(
                Trade::new("T2".into(), "NS_A".into(), date(2034, 1, 1))
                    .with_break_dates([date(2029, 1, 1)]),
            )
            .add_trade(Trade::new("T3".into(), "NS_B".into(), date(2028, 1, 1)))
            .build()
            .unwrap()
    }

    #[test]
    fn test_insertion_order_preserved() {
        let p = portfolio();
        let ns: Vec<&str> = p.netting_sets().iter().map(|n| n.id().as_str()).collect();
        assert_eq!(ns, ["NS_B", "NS_A"]);
        let trades: Vec<&str> = p.netting_sets()[0]
            .trade_ids()
            .iter()
            .map(TradeId::as_str)
            .collect();
        assert_eq!(trades, ["T1", "T3"]);
    }

    #[test]
    fn test_lookup() {
        let p = portfolio();
        assert_eq!(
            p.trade(&"T2".into()).unwrap().netting_set_id().as_str(),
            "NS_A"
        );
        assert!(p.trade(&"T9".into()).is_none());
    }

    #[test]
    fn test_netting_set_maturity() {
        let p = portfolio();
        let as_of = date(2024, 1, 1);
        assert_eq!(
            p.netting_set_maturity(&"NS_B".into(), as_of, false),
            Some(date(2028, 1, 1))
        );
        assert_eq!(
            p.netting_set_maturity(&"NS_A".into(), as_of, true),
            Some(date(2029, 1, 1))
        );
    }
}
