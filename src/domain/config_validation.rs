//! Configuration validation.
//!
//! Validates every config field before a backtest runs, and builds the
//! immutable run parameters from a validated source.

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::SentraderError;
use crate::domain::metrics::DEFAULT_RISK_FREE_RATE;
use crate::domain::strategy::StrategyConfig;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DEFAULT_INITIAL_CAPITAL: f64 = 1_000_000.0;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), SentraderError> {
    validate_initial_capital(config)?;
    validate_risk_free_rate(config)?;
    validate_dates(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), SentraderError> {
    validate_position_size(config)?;
    validate_thresholds(config)?;
    Ok(())
}

/// Validate both sections and build the run parameters.
pub fn build_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, SentraderError> {
    validate_backtest_config(config)?;
    validate_strategy_config(config)?;

    let start_date = parse_date(config.get_string("backtest", "start_date").as_deref(), "start_date")?;
    let end_date = parse_date(config.get_string("backtest", "end_date").as_deref(), "end_date")?;
    let split_date = optional_date(config, "split_date")?;

    let strategy = StrategyConfig {
        entry_threshold: config.get_double("strategy", "entry_threshold", 0.0),
        exit_threshold: config.get_double("strategy", "exit_threshold", 0.0),
        position_size: position_size(config)?,
    };
    strategy.validate()?;

    Ok(BacktestConfig {
        start_date,
        end_date,
        split_date,
        initial_capital: config.get_double("backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL),
        risk_free_rate: config.get_double("backtest", "risk_free_rate", DEFAULT_RISK_FREE_RATE),
        strategy,
    })
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), SentraderError> {
    let value = numeric(config, "backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(SentraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_capital".to_string(),
            reason: "initial_capital must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), SentraderError> {
    let value = numeric(config, "backtest", "risk_free_rate", DEFAULT_RISK_FREE_RATE)?;
    if !(0.0..1.0).contains(&value) {
        return Err(SentraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "risk_free_rate".to_string(),
            reason: "risk_free_rate must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), SentraderError> {
    let start_str = config.get_string("backtest", "start_date");
    let end_str = config.get_string("backtest", "end_date");

    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    if start_date >= end_date {
        return Err(SentraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "start_date".to_string(),
            reason: "start_date must be before end_date".to_string(),
        });
    }

    if let Some(split) = optional_date(config, "split_date")? {
        if split < start_date || split > end_date {
            return Err(SentraderError::ConfigInvalid {
                section: "backtest".to_string(),
                key: "split_date".to_string(),
                reason: "split_date must fall between start_date and end_date".to_string(),
            });
        }
    }
    Ok(())
}

fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, SentraderError> {
    match value {
        None => Err(SentraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            SentraderError::ConfigInvalid {
                section: "backtest".to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            }
        }),
    }
}

fn optional_date(config: &dyn ConfigPort, field: &str) -> Result<Option<NaiveDate>, SentraderError> {
    match config.get_string("backtest", field) {
        Some(s) if !s.trim().is_empty() => parse_date(Some(&s), field).map(Some),
        _ => Ok(None),
    }
}

fn validate_position_size(config: &dyn ConfigPort) -> Result<(), SentraderError> {
    position_size(config).map(|_| ())
}

fn position_size(config: &dyn ConfigPort) -> Result<u32, SentraderError> {
    let invalid = || SentraderError::ConfigInvalid {
        section: "strategy".to_string(),
        key: "position_size".to_string(),
        reason: "position_size must be a whole number of at least 1".to_string(),
    };

    let raw = match config.get_string("strategy", "position_size") {
        None => return Ok(1),
        Some(s) => s,
    };
    let value: i64 = raw.trim().parse().map_err(|_| invalid())?;
    if value < 1 {
        return Err(invalid());
    }
    u32::try_from(value).map_err(|_| invalid())
}

fn validate_thresholds(config: &dyn ConfigPort) -> Result<(), SentraderError> {
    for key in ["entry_threshold", "exit_threshold"] {
        let value = numeric(config, "strategy", key, 0.0)?;
        if !value.is_finite() {
            return Err(SentraderError::ConfigInvalid {
                section: "strategy".to_string(),
                key: key.to_string(),
                reason: format!("{} must be finite", key),
            });
        }
    }
    Ok(())
}

/// Read a float, treating a present but unparsable value as invalid rather
/// than silently falling back to the default.
fn numeric(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, SentraderError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(s) => s.trim().parse::<f64>().map_err(|_| SentraderError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{} must be a number", key),
        }),
    }
}
