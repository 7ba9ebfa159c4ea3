//! Scenario error types.

use thiserror::Error;

use super::aggregation::AggregationDataType;

/// Errors raised by scenarios and aggregation scenario data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScenarioError {
    /// Key not present in a scenario.
    #[error("Scenario '{label}' has no value for key {key}")]
    MissingKey {
        /// Scenario label
        label: String,
        /// Display form of the missing key
        key: String,
    },

    /// Key not part of a compact scenario's key registry.
    #[error("Key {0} is not registered for this compact scenario")]
    UnregisteredKey(String),

    /// Key string could not be parsed.
    #[error("Invalid risk factor key: {0}")]
    InvalidKey(String),

    /// Auxiliary observable not recorded for a date and sample.
    #[error("No {data_type} data '{name}' for date index {date}, sample {sample}")]
    MissingData {
        /// Observable type
        data_type: AggregationDataType,
        /// Observable name
        name: String,
        /// Simulation date index
        date: usize,
        /// Sample index
        sample: usize,
    },

    /// Date or sample index outside the store dimensions.
    #[error("Index out of range: date {date} (of {n_dates}), sample {sample} (of {n_samples})")]
    IndexOutOfRange {
        /// Requested date index
        date: usize,
        /// Requested sample index
        sample: usize,
        /// Number of dates
        n_dates: usize,
        /// Number of samples
        n_samples: usize,
    },
}
