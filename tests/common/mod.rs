#![allow(dead_code)]

use chrono::NaiveDate;
use sentrader::domain::backtest::{BacktestConfig, BacktestReport};
use sentrader::domain::error::SentraderError;
pub use sentrader::domain::observation::MarketObservation;
use sentrader::domain::strategy::StrategyConfig;
use sentrader::ports::data_port::DataPort;
use sentrader::ports::report_port::ReportPort;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

pub struct MockDataPort {
    pub observations: Vec<MarketObservation>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            observations: Vec::new(),
            error: None,
        }
    }

    pub fn with_observations(mut self, observations: Vec<MarketObservation>) -> Self {
        self.observations = observations;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_observations(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<MarketObservation>, SentraderError> {
        if let Some(reason) = &self.error {
            return Err(SentraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .observations
            .iter()
            .filter(|o| o.date >= start_date && o.date <= end_date)
            .copied()
            .collect())
    }

    fn get_data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SentraderError> {
        if let Some(reason) = &self.error {
            return Err(SentraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(match (self.observations.first(), self.observations.last()) {
            (Some(f), Some(l)) => Some((f.date, l.date, self.observations.len())),
            _ => None,
        })
    }
}

/// Records what it was asked to write instead of touching the filesystem.
#[derive(Default)]
pub struct MockReportPort {
    pub written: RefCell<Vec<(PathBuf, usize, usize)>>,
    pub fail: bool,
}

impl ReportPort for MockReportPort {
    fn write(&self, report: &BacktestReport, output_path: &Path) -> Result<(), SentraderError> {
        if self.fail {
            return Err(SentraderError::Report {
                reason: "disk full".into(),
            });
        }
        self.written.borrow_mut().push((
            output_path.to_path_buf(),
            report.strategy.curve.len(),
            report.metrics.len(),
        ));
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn obs(date_str: &str, price: f64, sentiment: f64) -> MarketObservation {
    MarketObservation::new(
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        price,
        sentiment,
    )
}

/// Consecutive calendar days from `start_date`, one per (price, sentiment) pair.
pub fn generate_observations(start_date: &str, prices: &[f64], sentiments: &[f64]) -> Vec<MarketObservation> {
    assert_eq!(prices.len(), sentiments.len());
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    prices
        .iter()
        .zip(sentiments)
        .enumerate()
        .map(|(i, (&p, &s))| MarketObservation::new(start + chrono::Duration::days(i as i64), p, s))
        .collect()
}

/// The four-bar scenario: buy, sell, buy, sell.
pub fn round_trip_observations() -> Vec<MarketObservation> {
    generate_observations(
        "2024-01-01",
        &[100.0, 105.0, 95.0, 110.0],
        &[-0.01, 0.02, -0.02, 0.05],
    )
}

pub fn sample_config() -> BacktestConfig {
    BacktestConfig {
        start_date: date(2020, 1, 1),
        end_date: date(2024, 12, 31),
        split_date: None,
        initial_capital: 1_000_000.0,
        risk_free_rate: 0.01,
        strategy: StrategyConfig::default(),
    }
}
