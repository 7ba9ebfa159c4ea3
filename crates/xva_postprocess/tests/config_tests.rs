use std::io::Write;

use xva_core::types::Currency;
use xva_postprocess::config::ConfigError;
use xva_postprocess::{AllocationMethod, Analytic, CollateralCalculationType, PostProcessConfig};

const FULL: &str = r#"
base_currency = "USD"
market_configuration = "xva"
allocation_method = "RelativeXVA"
quantile = 0.9
calculation_type = "AsymmetricCVA"
dva_name = "BANK"
fva_borrowing_curve = "USD-BORROW"
fva_lending_curve = "USD-LEND"
collateral_spread = 0.0025
dim_quantile = 0.99
dim_horizon_calendar_days = 10
dim_regression_order = 2
dim_regressors = ["EURUSD"]
dim_local_regression_evaluations = 100
dim_local_regression_bandwidth = 0.5

[analytics]
cva = true
dva = true
fva = true
dim = true
mva = true
colva = true
collateralFloor = true
exerciseNextBreak = false
"#;

#[test]
fn test_load_full_configuration_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FULL.as_bytes()).unwrap();

    let config = PostProcessConfig::load_and_validate(file.path()).unwrap();
    assert_eq!(config.base_currency, Currency::USD);
    assert_eq!(config.market_configuration, "xva");
    assert_eq!(config.allocation_method, AllocationMethod::RelativeXva);
    assert_eq!(config.calculation_type, CollateralCalculationType::AsymmetricCva);
    assert_eq!(config.dim_regressors, vec!["EURUSD".to_string()]);
    assert_eq!(config.dim_horizon_calendar_days, 10);
    assert_eq!(config.dim_scaling, 1.0);
    assert!(config.is_enabled(Analytic::CollateralFloor));
    assert!(!config.is_enabled(Analytic::ExerciseNextBreak));
    assert_eq!(config.borrowing_curve(), Some("USD-BORROW"));
}

#[test]
fn test_validation_collects_every_problem() {
    let mut config = PostProcessConfig::new(Currency::EUR)
        .with_analytic(Analytic::Dva, true)
        .with_analytic(Analytic::Mva, true);
    config.quantile = 1.5;
    config.dva_name = Some(String::new());

    match config.validate() {
        Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 3),
        other => panic!("expected validation errors, got {other:?}"),
    }
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = PostProcessConfig::load(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}
