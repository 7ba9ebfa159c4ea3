//! Portfolio error types.

use thiserror::Error;

/// Errors that can occur while building a portfolio.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PortfolioError {
    /// Duplicate trade ID encountered.
    #[error("Duplicate trade ID: {0}")]
    DuplicateTrade(String),

    /// Duplicate netting set ID encountered.
    #[error("Duplicate netting set ID: {0}")]
    DuplicateNettingSet(String),

    /// Trade references an unknown netting set.
    #[error("Trade references unknown netting set: trade={0}, netting_set={1}")]
    UnknownNettingSetReference(String, String),

    /// Collateral amount that is negative or not finite.
    #[error("{term} must be finite and non-negative, got {value}")]
    InvalidCollateralAmount {
        /// CSA term, e.g. "threshold pay"
        term: &'static str,
        /// Offending value
        value: f64,
    },

    /// Invalid collateral agreement parameters.
    #[error("Invalid collateral agreement for netting set {netting_set}: {source}")]
    InvalidCollateralAgreement {
        /// Netting set carrying the agreement
        netting_set: String,
        /// What is wrong with it
        source: Box<PortfolioError>,
    },

    /// Break date on or after the trade maturity.
    #[error("Trade {trade}: break date {date} is not before maturity {maturity}")]
    InvalidBreakDate {
        /// Trade identifier
        trade: String,
        /// Offending break date
        date: chrono::NaiveDate,
        /// Trade maturity
        maturity: chrono::NaiveDate,
    },

    /// Empty portfolio (no trades).
    #[error("Portfolio is empty")]
    EmptyPortfolio,
}
