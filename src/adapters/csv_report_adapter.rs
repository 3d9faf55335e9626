//! CSV report adapter.
//!
//! Writes one file per table into the output directory:
//! `strategy_curve.csv`, `baseline_curve.csv`, `trades.csv` and `metrics.csv`.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::domain::backtest::BacktestReport;
use crate::domain::error::SentraderError;
use crate::ports::report_port::ReportPort;

pub const STRATEGY_CURVE_FILE: &str = "strategy_curve.csv";
pub const BASELINE_CURVE_FILE: &str = "baseline_curve.csv";
pub const TRADES_FILE: &str = "trades.csv";
pub const METRICS_FILE: &str = "metrics.csv";

#[derive(Debug, Default, Clone, Copy)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Serialize)]
struct MetricsRow<'a> {
    series: &'static str,
    period: &'a str,
    initial_value: f64,
    final_value: f64,
    total_return_pct: f64,
    annualized_return_pct: f64,
    annualized_volatility_pct: f64,
    sharpe_ratio: f64,
    sortino_ratio: f64,
    max_drawdown_pct: f64,
    calmar_ratio: f64,
    return_to_volatility_ratio: f64,
    return_to_mdd_ratio: f64,
    trading_days: usize,
    calendar_days: i64,
    years: f64,
    risk_free_rate: f64,
    capital_effect: f64,
}

fn write_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<(), SentraderError> {
    let report_err = |e: csv::Error| SentraderError::Report {
        reason: format!("failed to write {}: {}", path.display(), e),
    };

    let mut writer = csv::Writer::from_path(path).map_err(report_err)?;
    for row in rows {
        writer.serialize(row).map_err(report_err)?;
    }
    writer.flush().map_err(|e| SentraderError::Report {
        reason: format!("failed to flush {}: {}", path.display(), e),
    })
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, report: &BacktestReport, output_path: &Path) -> Result<(), SentraderError> {
        fs::create_dir_all(output_path).map_err(|e| SentraderError::Report {
            reason: format!("failed to create {}: {}", output_path.display(), e),
        })?;

        write_rows(&output_path.join(STRATEGY_CURVE_FILE), &report.strategy.curve)?;
        write_rows(&output_path.join(BASELINE_CURVE_FILE), &report.baseline)?;
        write_rows(&output_path.join(TRADES_FILE), &report.strategy.trades)?;

        let rows = report.metrics.iter().map(|sm| {
            let m = &sm.metrics;
            MetricsRow {
                series: sm.series.name(),
                period: &m.period,
                initial_value: m.initial_value,
                final_value: m.final_value,
                total_return_pct: m.total_return,
                annualized_return_pct: m.annualized_return_pct(),
                annualized_volatility_pct: m.annualized_volatility,
                sharpe_ratio: m.sharpe_ratio,
                sortino_ratio: m.sortino_ratio,
                max_drawdown_pct: m.max_drawdown,
                calmar_ratio: m.calmar_ratio,
                return_to_volatility_ratio: m.return_to_volatility_ratio,
                return_to_mdd_ratio: m.return_to_mdd_ratio,
                trading_days: m.trading_days,
                calendar_days: m.calendar_days,
                years: m.years,
                risk_free_rate: m.risk_free_rate,
                capital_effect: m.capital_effect(report.initial_capital),
            }
        });
        write_rows(&output_path.join(METRICS_FILE), rows)
    }
}
