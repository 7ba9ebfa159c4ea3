//! XVA result structures at trade, netting set and portfolio level.

use crate::portfolio::{CounterpartyId, NettingSetId, TradeId};

/// Stand-alone XVA of a single trade.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TradeXva {
    /// Trade identifier.
    pub trade_id: TradeId,
    /// Stand-alone CVA.
    pub cva: f64,
    /// Stand-alone DVA.
    pub dva: f64,
    /// Stand-alone FCA.
    pub fca: f64,
    /// Stand-alone FBA.
    pub fba: f64,
}

impl TradeXva {
    /// Net FVA (FCA - FBA).
    #[inline]
    pub fn fva(&self) -> f64 {
        self.fca - self.fba
    }
}

/// XVA of a netting set, including collateral and margin terms.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NettingSetXva {
    /// Netting set identifier.
    pub netting_set_id: NettingSetId,
    /// Counterparty identifier.
    pub counterparty_id: CounterpartyId,
    /// Credit Valuation Adjustment.
    pub cva: f64,
    /// Debit Valuation Adjustment.
    pub dva: f64,
    /// Funding Cost Adjustment.
    pub fca: f64,
    /// Funding Benefit Adjustment.
    pub fba: f64,
    /// Collateral Valuation Adjustment from the collateral spread.
    pub colva: f64,
    /// Value of the zero floor on collateral remuneration.
    pub collateral_floor: f64,
    /// Margin Valuation Adjustment.
    pub mva: f64,
}

impl NettingSetXva {
    /// Net FVA (FCA - FBA).
    #[inline]
    pub fn fva(&self) -> f64 {
        self.fca - self.fba
    }

    /// Bilateral CVA (CVA - DVA).
    #[inline]
    pub fn bilateral_cva(&self) -> f64 {
        self.cva - self.dva
    }
}

/// Portfolio totals over all netting sets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PortfolioXva {
    /// Total CVA.
    pub cva: f64,
    /// Total DVA.
    pub dva: f64,
    /// Total FCA.
    pub fca: f64,
    /// Total FBA.
    pub fba: f64,
    /// Total COLVA.
    pub colva: f64,
    /// Total collateral floor value.
    pub collateral_floor: f64,
    /// Total MVA.
    pub mva: f64,
}

impl PortfolioXva {
    /// Sums netting-set results.
    pub fn from_netting_sets<'a>(results: impl IntoIterator<Item = &'a NettingSetXva>) -> Self {
        results.into_iter().fold(Self::default(), |mut acc, x| {
            acc.cva += x.cva;
            acc.dva += x.dva;
            acc.fca += x.fca;
            acc.fba += x.fba;
            acc.colva += x.colva;
            acc.collateral_floor += x.collateral_floor;
            acc.mva += x.mva;
            acc
        })
    }

    /// Net FVA (FCA - FBA).
    #[inline]
    pub fn fva(&self) -> f64 {
        self.fca - self.fba
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portfolio_totals() {
        let a = NettingSetXva {
            cva: 1.0,
            fca: 2.0,
            fba: 0.5,
            ..NettingSetXva::default()
        };
        let b = NettingSetXva {
            cva: 3.0,
            dva: 1.0,
            mva: 0.25,
            ..NettingSetXva::default()
        };
        let total = PortfolioXva::from_netting_sets([&a, &b]);
        assert_eq!(total.cva, 4.0);
        assert_eq!(total.dva, 1.0);
        assert_eq!(total.fva(), 1.5);
        assert_eq!(total.mva, 0.25);
        assert_eq!(a.bilateral_cva(), 1.0);
    }
}
