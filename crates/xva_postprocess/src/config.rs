//! Post-processing configuration.
//!
//! Loaded from TOML or built in code. Enumerated settings (allocation method,
//! collateral calculation type, analytic names) are parsed into closed enums
//! when the configuration is read, so unknown names fail at load time.
//!
//! ```
//! use xva_postprocess::config::{AllocationMethod, Analytic, PostProcessConfig};
//!
//! let config = PostProcessConfig::from_toml_str(r#"
//!     base_currency = "EUR"
//!     allocation_method = "Marginal"
//!     marginal_allocation_limit = 1.0
//!     dva_name = "BANK"
//!
//!     [analytics]
//!     cva = true
//!     dva = true
//! "#).unwrap();
//!
//! assert_eq!(config.allocation_method, AllocationMethod::Marginal);
//! assert_eq!(config.quantile, 0.95);
//! assert!(config.is_enabled(Analytic::Cva));
//! assert!(!config.is_enabled(Analytic::Dim));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use xva_core::market_data::DEFAULT_CONFIGURATION;
use xva_core::types::Currency;

/// Configuration error type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// IO error reading the configuration file.
    #[error("IO error: {0}")]
    Io(String),

    /// TOML parse error, including unknown enumerated names.
    #[error("Parse error: {0}")]
    Parse(String),

    /// One or more settings are invalid.
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Declares a closed set of named options parsed from and rendered as strings.
macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $what:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Canonical name.
            pub fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(ConfigError::Parse(format!(
                        concat!("unknown ", $what, " '{}', expected one of {:?}"),
                        s,
                        [$($text),+]
                    ))),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = ConfigError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.name().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

named_enum!(
    /// Trade allocation method for netting-set exposures and XVAs.
    AllocationMethod, "allocation method" {
        /// No allocation; allocated figures are zero.
        None => "None",
        /// Pykhtin & Rosen marginal allocation, per date and sample.
        Marginal => "Marginal",
        /// Weights |V_i(0)| / Σ|V_j(0)|.
        RelativeFairValueGross => "RelativeFairValueGross",
        /// Weights V_i(0) / Σ V_j(0).
        RelativeFairValueNet => "RelativeFairValueNet",
        /// Weights from stand-alone trade CVA (DVA).
        RelativeXva => "RelativeXVA",
    }
);

named_enum!(
    /// Which exposure drives margin calls under the margin period of risk.
    CollateralCalculationType, "collateral calculation type" {
        /// Both directions use the lagged exposure.
        Symmetric => "Symmetric",
        /// Received collateral lags, posted collateral is immediate.
        AsymmetricCva => "AsymmetricCVA",
        /// Posted collateral lags, received collateral is immediate.
        AsymmetricDva => "AsymmetricDVA",
        /// Margin calls use the current exposure.
        NoLag => "NoLag",
    }
);

named_enum!(
    /// Switchable analytics.
    Analytic, "analytic" {
        /// Dynamic initial margin
        Dim => "dim",
        /// Margin value adjustment (requires `dim`)
        Mva => "mva",
        /// Credit value adjustment
        Cva => "cva",
        /// Debit value adjustment
        Dva => "dva",
        /// Funding cost and benefit adjustments
        Fva => "fva",
        /// Collateral value adjustment
        Colva => "colva",
        /// Collateral floor value
        CollateralFloor => "collateralFloor",
        /// Terminate trades at their next break date
        ExerciseNextBreak => "exerciseNextBreak",
    }
);

/// Post-processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostProcessConfig {
    /// Reporting currency of the NPV cube
    pub base_currency: Currency,

    /// Market configuration used for curve lookups
    #[serde(default = "default_market_configuration")]
    pub market_configuration: String,

    /// Trade allocation method
    #[serde(default = "default_allocation_method")]
    pub allocation_method: AllocationMethod,

    /// Marginal allocation falls back to equal shares when the netting-set
    /// value is smaller than this in absolute terms
    #[serde(default)]
    pub marginal_allocation_limit: f64,

    /// Relative allocation falls back to equal weights when the weight
    /// denominator is within this tolerance of zero
    #[serde(default = "default_allocation_tolerance")]
    pub allocation_tolerance: f64,

    /// PFE quantile
    #[serde(default = "default_quantile")]
    pub quantile: f64,

    /// Collateral calculation type
    #[serde(default = "default_calculation_type")]
    pub calculation_type: CollateralCalculationType,

    /// Own credit name for DVA
    #[serde(default)]
    pub dva_name: Option<String>,

    /// Borrowing curve name for FCA and MVA
    #[serde(default)]
    pub fva_borrowing_curve: Option<String>,

    /// Lending curve name for FBA
    #[serde(default)]
    pub fva_lending_curve: Option<String>,

    /// Spread paid on the collateral balance over the overnight rate
    #[serde(default)]
    pub collateral_spread: f64,

    /// DIM quantile
    #[serde(default = "default_dim_quantile")]
    pub dim_quantile: f64,

    /// DIM horizon (margin period of risk) in calendar days
    #[serde(default = "default_dim_horizon")]
    pub dim_horizon_calendar_days: u32,

    /// Polynomial order of the DIM regression; 0 means no regression
    #[serde(default)]
    pub dim_regression_order: usize,

    /// Named index fixings or FX spots used as additional DIM regressors
    #[serde(default)]
    pub dim_regressors: Vec<String>,

    /// Number of samples evaluated with the local regression
    #[serde(default)]
    pub dim_local_regression_evaluations: usize,

    /// Local regression window in standard deviations of the regressor
    #[serde(default = "default_local_bandwidth")]
    pub dim_local_regression_bandwidth: f64,

    /// Multiplier applied to all DIM estimates
    #[serde(default = "default_dim_scaling")]
    pub dim_scaling: f64,

    /// Analytics switches; absent entries are disabled
    #[serde(default)]
    pub analytics: BTreeMap<Analytic, bool>,
}

fn default_market_configuration() -> String {
    DEFAULT_CONFIGURATION.to_string()
}

fn default_allocation_method() -> AllocationMethod {
    AllocationMethod::None
}

fn default_allocation_tolerance() -> f64 {
    1e-12
}

fn default_quantile() -> f64 {
    0.95
}

fn default_calculation_type() -> CollateralCalculationType {
    CollateralCalculationType::Symmetric
}

fn default_dim_quantile() -> f64 {
    0.99
}

fn default_dim_horizon() -> u32 {
    14
}

fn default_local_bandwidth() -> f64 {
    0.25
}

fn default_dim_scaling() -> f64 {
    1.0
}

impl PostProcessConfig {
    /// Creates a configuration with defaults and all analytics disabled.
    pub fn new(base_currency: Currency) -> Self {
        Self {
            base_currency,
            market_configuration: default_market_configuration(),
            allocation_method: default_allocation_method(),
            marginal_allocation_limit: 0.0,
            allocation_tolerance: default_allocation_tolerance(),
            quantile: default_quantile(),
            calculation_type: default_calculation_type(),
            dva_name: None,
            fva_borrowing_curve: None,
            fva_lending_curve: None,
            collateral_spread: 0.0,
            dim_quantile: default_dim_quantile(),
            dim_horizon_calendar_days: default_dim_horizon(),
            dim_regression_order: 0,
            dim_regressors: Vec::new(),
            dim_local_regression_evaluations: 0,
            dim_local_regression_bandwidth: default_local_bandwidth(),
            dim_scaling: default_dim_scaling(),
            analytics: BTreeMap::new(),
        }
    }

    /// Switches an analytic on or off.
    pub fn with_analytic(mut self, analytic: Analytic, enabled: bool) -> Self {
        self.analytics.insert(analytic, enabled);
        self
    }

    /// Sets the allocation method.
    pub fn with_allocation_method(mut self, method: AllocationMethod) -> Self {
        self.allocation_method = method;
        self
    }

    /// True if the analytic is switched on.
    pub fn is_enabled(&self, analytic: Analytic) -> bool {
        self.analytics.get(&analytic).copied().unwrap_or(false)
    }

    /// Own credit name, treating an empty string as absent.
    pub fn dva_name(&self) -> Option<&str> {
        non_empty(&self.dva_name)
    }

    /// Borrowing curve name, treating an empty string as absent.
    pub fn borrowing_curve(&self) -> Option<&str> {
        non_empty(&self.fva_borrowing_curve)
    }

    /// Lending curve name, treating an empty string as absent.
    pub fn lending_curve(&self) -> Option<&str> {
        non_empty(&self.fva_lending_curve)
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Loads a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Loads and validates a configuration.
    pub fn load_and_validate(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration, reporting every problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        for (name, q) in [("quantile", self.quantile), ("dim_quantile", self.dim_quantile)] {
            if !(0.0..=1.0).contains(&q) {
                errors.push(format!("{name} {q} must lie in [0, 1]"));
            }
        }

        if !(self.marginal_allocation_limit >= 0.0) {
            errors.push(format!(
                "marginal_allocation_limit {} must be non-negative",
                self.marginal_allocation_limit
            ));
        }
        if !(self.allocation_tolerance >= 0.0) {
            errors.push(format!(
                "allocation_tolerance {} must be non-negative",
                self.allocation_tolerance
            ));
        }
        if !self.collateral_spread.is_finite() {
            errors.push("collateral_spread must be finite".to_string());
        }
        if self.market_configuration.is_empty() {
            errors.push("market_configuration cannot be empty".to_string());
        }

        if self.is_enabled(Analytic::Dva) && self.dva_name().is_none() {
            errors.push("dva analytic requires dva_name".to_string());
        }
        if self.is_enabled(Analytic::Mva) && !self.is_enabled(Analytic::Dim) {
            errors.push("mva analytic requires the dim analytic".to_string());
        }

        if self.is_enabled(Analytic::Dim) {
            if self.dim_horizon_calendar_days == 0 {
                errors.push("dim_horizon_calendar_days must be positive".to_string());
            }
            if !(self.dim_scaling >= 0.0) || !self.dim_scaling.is_finite() {
                errors.push(format!(
                    "dim_scaling {} must be finite and non-negative",
                    self.dim_scaling
                ));
            }
            if self.dim_local_regression_evaluations > 0
                && !(self.dim_local_regression_bandwidth > 0.0)
            {
                errors.push(format!(
                    "dim_local_regression_bandwidth {} must be positive",
                    self.dim_local_regression_bandwidth
                ));
            }
            if let Some(blank) = self.dim_regressors.iter().find(|r| r.trim().is_empty()) {
                errors.push(format!("dim_regressors contains a blank name '{blank}'"));
            }
            if !self.dim_regressors.is_empty() && self.dim_regression_order == 0 {
                errors.push("dim_regressors require dim_regression_order > 0".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PostProcessConfig::from_toml_str(r#"base_currency = "USD""#).unwrap();
        assert_eq!(config.base_currency, Currency::USD);
        assert_eq!(config.market_configuration, "default");
        assert_eq!(config.allocation_method, AllocationMethod::None);
        assert_eq!(config.calculation_type, CollateralCalculationType::Symmetric);
        assert_eq!(config.quantile, 0.95);
        assert_eq!(config.dim_quantile, 0.99);
        assert_eq!(config.dim_horizon_calendar_days, 14);
        assert_eq!(config.dim_scaling, 1.0);
        assert!(config.analytics.is_empty());
        assert_eq!(config, PostProcessConfig::new(Currency::USD));
    }

    #[test]
    fn test_unknown_allocation_method() {
        let err = PostProcessConfig::from_toml_str(
            r#"
            base_currency = "EUR"
            allocation_method = "Proportional"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown allocation method 'Proportional'"));
    }

    #[test]
    fn test_unknown_analytic_name() {
        let err = PostProcessConfig::from_toml_str(
            r#"
            base_currency = "EUR"
            [analytics]
            kva = true
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_enum_names_round_trip() {
        for method in [
            AllocationMethod::None,
            AllocationMethod::Marginal,
            AllocationMethod::RelativeFairValueGross,
            AllocationMethod::RelativeFairValueNet,
            AllocationMethod::RelativeXva,
        ] {
            assert_eq!(method.name().parse::<AllocationMethod>().unwrap(), method);
        }
        assert_eq!(
            "AsymmetricCVA".parse::<CollateralCalculationType>().unwrap(),
            CollateralCalculationType::AsymmetricCva
        );
        assert_eq!(
            "collateralFloor".parse::<Analytic>().unwrap(),
            Analytic::CollateralFloor
        );
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let mut config = PostProcessConfig::new(Currency::EUR)
            .with_analytic(Analytic::Mva, true)
            .with_analytic(Analytic::Dva, true);
        config.quantile = 1.5;
        config.marginal_allocation_limit = -1.0;
        match config.validate() {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 4);
                assert!(errors.iter().any(|e| e.contains("requires dva_name")));
                assert!(errors.iter().any(|e| e.contains("requires the dim analytic")));
            }
            other => panic!("Expected validation errors, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_names_are_absent() {
        let mut config = PostProcessConfig::new(Currency::EUR);
        config.fva_lending_curve = Some("  ".to_string());
        config.fva_borrowing_curve = Some("BANK_BORROW".to_string());
        assert_eq!(config.lending_curve(), None);
        assert_eq!(config.borrowing_curve(), Some("BANK_BORROW"));
    }

    #[test]
    fn test_dim_regressors_require_order() {
        let mut config = PostProcessConfig::new(Currency::EUR).with_analytic(Analytic::Dim, true);
        config.dim_regressors = vec!["EUR-EURIBOR-6M".to_string()];
        assert!(config.validate().is_err());
        config.dim_regression_order = 2;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("postprocess.toml");
        std::fs::write(
            &path,
            "base_currency = \"GBP\"\ncalculation_type = \"NoLag\"\n[analytics]\ndim = true\n",
        )
        .unwrap();
        let config = PostProcessConfig::load_and_validate(&path).unwrap();
        assert_eq!(config.calculation_type, CollateralCalculationType::NoLag);
        assert!(config.is_enabled(Analytic::Dim));
        assert!(matches!(
            PostProcessConfig::load(&dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
