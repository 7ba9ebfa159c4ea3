//! Netting sets and their credit support annex (CSA) terms.

use xva_core::types::{Currency, DayCountConvention};

use super::error::PortfolioError;
use super::ids::{CounterpartyId, NettingSetId, TradeId};

/// Collateral agreement (CSA) terms of a netting set.
///
/// Amounts are in the collateral currency. Thresholds and minimum transfer
/// amounts are given separately for the direction in which we pay
/// (post) collateral and the direction in which we receive it.
///
/// # Examples
///
/// ```
/// use xva_core::types::Currency;
/// use xva_postprocess::portfolio::CollateralAgreement;
///
/// let csa = CollateralAgreement::new(Currency::EUR)
///     .with_thresholds(1_000_000.0, 500_000.0)
///     .with_minimum_transfer_amounts(100_000.0, 100_000.0)
///     .with_mpor_days(10)
///     .with_collateral_index("EUR-EONIA");
///
/// assert_eq!(csa.threshold_receive(), 500_000.0);
/// assert_eq!(csa.mpor_days(), 10);
/// assert!(csa.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CollateralAgreement {
    currency: Currency,
    threshold_pay: f64,
    threshold_receive: f64,
    mta_pay: f64,
    mta_receive: f64,
    independent_amount_held: f64,
    mpor_days: u32,
    collateral_index: Option<String>,
    day_count: DayCountConvention,
}

impl CollateralAgreement {
    /// Standard bilateral margin period of risk in calendar days.
    pub const BILATERAL_MPOR_DAYS: u32 = 14;

    /// Creates a zero-threshold agreement with no lag in the given currency.
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            threshold_pay: 0.0,
            threshold_receive: 0.0,
            mta_pay: 0.0,
            mta_receive: 0.0,
            independent_amount_held: 0.0,
            mpor_days: 0,
            collateral_index: None,
            day_count: DayCountConvention::Actual360,
        }
    }

    /// Sets the thresholds for posting (`pay`) and receiving collateral.
    pub fn with_thresholds(mut self, pay: f64, receive: f64) -> Self {
        self.threshold_pay = pay;
        self.threshold_receive = receive;
        self
    }

    /// Sets the minimum transfer amounts for posting and receiving.
    pub fn with_minimum_transfer_amounts(mut self, pay: f64, receive: f64) -> Self {
        self.mta_pay = pay;
        self.mta_receive = receive;
        self
    }

    /// Sets the independent amount held (negative when posted).
    pub fn with_independent_amount(mut self, held: f64) -> Self {
        self.independent_amount_held = held;
        self
    }

    /// Sets the margin period of risk in calendar days.
    pub fn with_mpor_days(mut self, days: u32) -> Self {
        self.mpor_days = days;
        self
    }

    /// Sets the overnight index remunerating the collateral balance.
    pub fn with_collateral_index(mut self, index: impl Into<String>) -> Self {
        self.collateral_index = Some(index.into());
        self
    }

    /// Sets the accrual day count for collateral interest.
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Checks that thresholds and MTAs are finite and non-negative and the
    /// independent amount is finite.
    ///
    /// # Errors
    ///
    /// Returns [`PortfolioError::InvalidCollateralAmount`] naming the first
    /// offending term.
    pub fn validate(&self) -> Result<(), PortfolioError> {
        let amounts = [
            ("threshold pay", self.threshold_pay),
            ("threshold receive", self.threshold_receive),
            ("MTA pay", self.mta_pay),
            ("MTA receive", self.mta_receive),
        ];
        for (term, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(PortfolioError::InvalidCollateralAmount { term, value });
            }
        }
        if !self.independent_amount_held.is_finite() {
            return Err(PortfolioError::InvalidCollateralAmount {
                term: "independent amount",
                value: self.independent_amount_held,
            });
        }
        Ok(())
    }

    /// Returns the collateral currency.
    #[inline]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Threshold below which we do not post collateral.
    #[inline]
    pub fn threshold_pay(&self) -> f64 {
        self.threshold_pay
    }

    /// Threshold below which we do not receive collateral.
    #[inline]
    pub fn threshold_receive(&self) -> f64 {
        self.threshold_receive
    }

    /// Minimum amount we transfer when posting.
    #[inline]
    pub fn mta_pay(&self) -> f64 {
        self.mta_pay
    }

    /// Minimum amount the counterparty transfers to us.
    #[inline]
    pub fn mta_receive(&self) -> f64 {
        self.mta_receive
    }

    /// Independent amount held by us.
    #[inline]
    pub fn independent_amount_held(&self) -> f64 {
        self.independent_amount_held
    }

    /// Margin period of risk in calendar days.
    #[inline]
    pub fn mpor_days(&self) -> u32 {
        self.mpor_days
    }

    /// Overnight index remunerating collateral, if any.
    #[inline]
    pub fn collateral_index(&self) -> Option<&str> {
        self.collateral_index.as_deref()
    }

    /// Accrual day count.
    #[inline]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }
}

/// A netting set: trades with one counterparty, netted before margining.
#[derive(Clone, Debug, PartialEq)]
pub struct NettingSet {
    id: NettingSetId,
    counterparty_id: CounterpartyId,
    collateral: Option<CollateralAgreement>,
    trade_ids: Vec<TradeId>,
}

impl NettingSet {
    /// Creates an uncollateralised netting set.
    pub fn new(id: NettingSetId, counterparty_id: CounterpartyId) -> Self {
        Self {
            id,
            counterparty_id,
            collateral: None,
            trade_ids: Vec::new(),
        }
    }

    /// Attaches a collateral agreement.
    pub fn with_collateral(mut self, csa: CollateralAgreement) -> Self {
        self.collateral = Some(csa);
        self
    }

    /// Returns the netting set identifier.
    #[inline]
    pub fn id(&self) -> &NettingSetId {
        &self.id
    }

    /// Returns the counterparty identifier.
    #[inline]
    pub fn counterparty_id(&self) -> &CounterpartyId {
        &self.counterparty_id
    }

    /// Returns the collateral agreement if the set is margined.
    #[inline]
    pub fn collateral(&self) -> Option<&CollateralAgreement> {
        self.collateral.as_ref()
    }

    /// Returns true if a CSA is attached.
    #[inline]
    pub fn is_collateralised(&self) -> bool {
        self.collateral.is_some()
    }

    /// Trades in this netting set, in portfolio order.
    #[inline]
    pub fn trade_ids(&self) -> &[TradeId] {
        &self.trade_ids
    }

    pub(crate) fn push_trade(&mut self, trade_id: TradeId) {
        self.trade_ids.push(trade_id);
    }

    pub(crate) fn validate(&self) -> Result<(), PortfolioError> {
        if let Some(csa) = &self.collateral {
            csa.validate()
                .map_err(|source| PortfolioError::InvalidCollateralAgreement {
                    netting_set: self.id.to_string(),
                    source: Box::new(source),
                })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_agreement_is_perfect() {
        let csa = CollateralAgreement::new(Currency::USD);
        assert_eq!(csa.threshold_pay(), 0.0);
        assert_eq!(csa.mta_receive(), 0.0);
        assert_eq!(csa.mpor_days(), 0);
        assert_eq!(csa.day_count(), DayCountConvention::Actual360);
        assert!(csa.collateral_index().is_none());

        let bilateral = csa.with_mpor_days(CollateralAgreement::BILATERAL_MPOR_DAYS);
        assert_eq!(bilateral.mpor_days(), 14);
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let csa = CollateralAgreement::new(Currency::USD).with_thresholds(-1.0, 0.0);
        assert_eq!(
            csa.validate(),
            Err(PortfolioError::InvalidCollateralAmount {
                term: "threshold pay",
                value: -1.0
            })
        );
    }

    #[test]
    fn test_infinite_independent_amount_rejected() {
        let csa = CollateralAgreement::new(Currency::USD).with_independent_amount(f64::INFINITY);
        match csa.validate() {
            Err(PortfolioError::InvalidCollateralAmount { term, .. }) => {
                assert_eq!(term, "independent amount")
            }
            other => panic!("Expected InvalidCollateralAmount, got {other:?}"),
        }
    }

    #[test]
    fn test_netting_set_validation_names_set() {
        let ns = NettingSet::new("NS1".into(), "CP1".into()).with_collateral(
            CollateralAgreement::new(Currency::EUR).with_minimum_transfer_amounts(0.0, f64::NAN),
        );
        match ns.validate() {
            Err(PortfolioError::InvalidCollateralAgreement {
                netting_set,
                source,
            }) => {
                assert_eq!(netting_set, "NS1");
                assert!(matches!(
                    *source,
                    PortfolioError::InvalidCollateralAmount { term: "MTA receive", .. }
                ));
            }
            other => panic!("Expected InvalidCollateralAgreement, got {other:?}"),
        }
    }
}
