//! Portfolio builder for constructing validated portfolios.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::error::PortfolioError;
use super::netting_set::NettingSet;
use super::trade::Trade;
use super::Portfolio;

/// Builder for constructing portfolios with validation.
///
/// Trades and netting sets are kept in insertion order. On `build()` each
/// trade is attached to its netting set; netting sets without trades are
/// dropped.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use xva_postprocess::portfolio::{NettingSet, PortfolioBuilder, Trade};
///
/// let maturity = NaiveDate::from_ymd_opt(2029, 6, 30).unwrap();
/// let portfolio = PortfolioBuilder::new()
///     .add_netting_set(NettingSet::new("NS1".into(), "CPTY_A".into()))
///     .add_trade(Trade::new("T1".into(), "NS1".into(), maturity))
///     .add_trade(Trade::new("T2".into(), "NS1".into(), maturity))
///     .build()
///     .unwrap();
///
/// assert_eq!(portfolio.trade_count(), 2);
/// assert_eq!(portfolio.netting_sets()[0].trade_ids().len(), 2);
/// ```
#[derive(Default)]
pub struct PortfolioBuilder {
    trades: Vec<Trade>,
    netting_sets: Vec<NettingSet>,
}

impl PortfolioBuilder {
    /// Creates a new portfolio builder.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a trade to the portfolio.
    pub fn add_trade(mut self, trade: Trade) -> Self {
        self.trades.push(trade);
        self
    }

    /// Adds multiple trades to the portfolio.
    pub fn add_trades(mut self, trades: impl IntoIterator<Item = Trade>) -> Self {
        self.trades.extend(trades);
        self
    }

    /// Adds a netting set to the portfolio.
    pub fn add_netting_set(mut self, netting_set: NettingSet) -> Self {
        self.netting_sets.push(netting_set);
        self
    }

    /// Adds multiple netting sets to the portfolio.
    pub fn add_netting_sets(mut self, netting_sets: impl IntoIterator<Item = NettingSet>) -> Self {
        self.netting_sets.extend(netting_sets);
        self
    }

    /// Builds and validates the portfolio.
    ///
    /// # Validation
    ///
    /// - At least one trade
    /// - No duplicate trade or netting set IDs
    /// - Every trade references a known netting set
    /// - Break dates lie before the trade maturity
    /// - Collateral agreements have non-negative thresholds and MTAs
    pub fn build(self) -> Result<Portfolio, PortfolioError> {
        if self.trades.is_empty() {
            return Err(PortfolioError::EmptyPortfolio);
        }

        let mut trade_ids = HashSet::new();
        for trade in &self.trades {
            if !trade_ids.insert(trade.id().clone()) {
                return Err(PortfolioError::DuplicateTrade(trade.id().to_string()));
            }
            if let Some(&date) = trade.break_dates().iter().find(|&&d| d >= trade.maturity()) {
                return Err(PortfolioError::InvalidBreakDate {
                    trade: trade.id().to_string(),
                    date,
                    maturity: trade.maturity(),
                });
            }
        }

        let mut netting_sets = self.netting_sets;
        let mut ns_position = HashMap::new();
        for (i, ns) in netting_sets.iter().enumerate() {
            if ns_position.insert(ns.id().clone(), i).is_some() {
                return Err(PortfolioError::DuplicateNettingSet(ns.id().to_string()));
            }
            ns.validate()?;
        }

        for trade in &self.trades {
            let &i = ns_position.get(trade.netting_set_id()).ok_or_else(|| {
                PortfolioError::UnknownNettingSetReference(
                    trade.id().to_string(),
                    trade.netting_set_id().to_string(),
                )
            })?;
            netting_sets[i].push_trade(trade.id().clone());
        }

        netting_sets.retain(|ns| {
            let keep = !ns.trade_ids().is_empty();
            if !keep {
                debug!(netting_set = %ns.id(), "dropping netting set without trades");
            }
            keep
        });

        Ok(Portfolio::from_parts(self.trades, netting_sets))
    }
}
