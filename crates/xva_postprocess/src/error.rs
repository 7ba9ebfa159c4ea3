//! Post-processing error types.

use thiserror::Error;
use xva_core::market_data::MarketDataError;

use crate::config::ConfigError;
use crate::cube::CubeError;
use crate::portfolio::PortfolioError;
use crate::scenario::ScenarioError;

/// Errors raised while constructing or querying a [`PostProcess`](crate::PostProcess).
///
/// Construction aborts on the first error; no partial results are kept.
#[derive(Debug, Error)]
pub enum PostProcessError {
    /// Invalid or inconsistent configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Configuration failed to load or validate.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Curve, recovery or other market lookup failed.
    #[error("Market data error: {0}")]
    Market(#[from] MarketDataError),

    /// Scenario data missing or malformed.
    #[error("Scenario data error: {0}")]
    Scenario(#[from] ScenarioError),

    /// Portfolio validation failed.
    #[error("Portfolio error: {0}")]
    Portfolio(#[from] PortfolioError),

    /// Cube construction or lookup failed.
    #[error("Cube error: {0}")]
    Cube(#[from] CubeError),

    /// Inputs disagree with each other (dimensions, ids, dates).
    #[error("Data inconsistency: {0}")]
    DataInconsistency(String),

    /// No results for the requested trade.
    #[error("Trade not found: {0}")]
    TradeNotFound(String),

    /// No results for the requested netting set.
    #[error("Netting set not found: {0}")]
    NettingSetNotFound(String),

    /// Export target could not be written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialisation failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PostProcessError>;
