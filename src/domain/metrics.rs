//! Performance metrics over a valuation curve slice.
//!
//! Every curve starts at 1.0, so the initial value is fixed rather than read
//! from the slice. A slice taken from the middle of a curve is still measured
//! against 1.0.

use serde::Serialize;

use super::valuation::{ValuationPoint, ValueColumn};

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
pub const INITIAL_VALUE: f64 = 1.0;
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    pub period: String,
    pub initial_value: f64,
    pub final_value: f64,
    /// Percent.
    pub total_return: f64,
    /// Fraction, e.g. 0.08 for 8% a year.
    pub annualized_return: f64,
    /// Percent.
    pub annualized_volatility: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    /// Percent, never positive.
    pub max_drawdown: f64,
    pub calmar_ratio: f64,
    pub return_to_volatility_ratio: f64,
    pub return_to_mdd_ratio: f64,
    pub trading_days: usize,
    pub calendar_days: i64,
    pub years: f64,
    pub risk_free_rate: f64,
}

impl PerformanceMetrics {
    pub fn annualized_return_pct(&self) -> f64 {
        self.annualized_return * 100.0
    }

    /// Currency gain or loss of investing `initial_capital` at the start of the curve.
    pub fn capital_effect(&self, initial_capital: f64) -> f64 {
        (self.final_value - INITIAL_VALUE) * initial_capital
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceAnalyzer {
    risk_free_rate: f64,
}

impl Default for PerformanceAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_RISK_FREE_RATE)
    }
}

impl PerformanceAnalyzer {
    /// `risk_free_rate` is annual and enters Sharpe, Sortino and Calmar as is.
    pub fn new(risk_free_rate: f64) -> Self {
        PerformanceAnalyzer { risk_free_rate }
    }

    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    pub fn daily_risk_free_rate(&self) -> f64 {
        self.risk_free_rate / TRADING_DAYS_PER_YEAR
    }

    /// Compute the metrics of one column over a contiguous slice.
    ///
    /// With fewer than two daily returns the annualized statistics, the
    /// drawdown and the ratios are all reported as zero. Zero volatility,
    /// zero drawdown and an empty set of negative returns fall back to
    /// defined values instead of dividing by zero.
    pub fn compute(
        &self,
        curve: &[ValuationPoint],
        column: ValueColumn,
        period: &str,
    ) -> PerformanceMetrics {
        let values: Vec<f64> = curve.iter().map(|p| column.read(p)).collect();
        let final_value = values.last().copied().unwrap_or(INITIAL_VALUE);
        let total_return = (final_value / INITIAL_VALUE - 1.0) * 100.0;

        let trading_days = values.len();
        let years = trading_days as f64 / TRADING_DAYS_PER_YEAR;
        let calendar_days = match (curve.first(), curve.last()) {
            (Some(first), Some(last)) => (last.date - first.date).num_days(),
            _ => 0,
        };

        let mut metrics = PerformanceMetrics {
            period: period.to_string(),
            initial_value: INITIAL_VALUE,
            final_value,
            total_return,
            annualized_return: 0.0,
            annualized_volatility: 0.0,
            sharpe_ratio: 0.0,
            sortino_ratio: 0.0,
            max_drawdown: 0.0,
            calmar_ratio: 0.0,
            return_to_volatility_ratio: 0.0,
            return_to_mdd_ratio: 0.0,
            trading_days,
            calendar_days,
            years,
            risk_free_rate: self.risk_free_rate,
        };

        let returns = pct_change(&values);
        if returns.len() < 2 || years <= 0.0 {
            return metrics;
        }

        let rf = self.risk_free_rate;
        let annualized_return = annualize(final_value / INITIAL_VALUE, years);

        let daily_std = sample_std(&returns);
        let annualized_volatility = daily_std * TRADING_DAYS_PER_YEAR.sqrt() * 100.0;

        let sharpe_ratio = if daily_std != 0.0 {
            (annualized_return - rf) / (annualized_volatility / 100.0)
        } else {
            0.0
        };

        let sortino_ratio = match downside_deviation(&returns) {
            Some(dd) if dd != 0.0 => (annualized_return - rf) / dd,
            Some(_) => 0.0,
            None if annualized_return > rf => f64::INFINITY,
            None => 0.0,
        };

        let max_drawdown = max_drawdown(&values) * 100.0;
        let mdd_fraction = (max_drawdown / 100.0).abs();

        let calmar_ratio = if max_drawdown != 0.0 {
            (annualized_return - rf) / mdd_fraction
        } else {
            0.0
        };

        let return_to_volatility_ratio = if annualized_volatility != 0.0 {
            annualized_return / (annualized_volatility / 100.0)
        } else {
            0.0
        };

        let return_to_mdd_ratio = if max_drawdown != 0.0 {
            annualized_return / mdd_fraction
        } else {
            0.0
        };

        metrics.annualized_return = annualized_return;
        metrics.annualized_volatility = annualized_volatility;
        metrics.sharpe_ratio = sharpe_ratio;
        metrics.sortino_ratio = sortino_ratio;
        metrics.max_drawdown = max_drawdown;
        metrics.calmar_ratio = calmar_ratio;
        metrics.return_to_volatility_ratio = return_to_volatility_ratio;
        metrics.return_to_mdd_ratio = return_to_mdd_ratio;
        metrics
    }
}

/// Simple percentage change between consecutive values; the undefined first
/// element is dropped, as are 0/0 changes.
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| w[1] / w[0] - 1.0)
        .filter(|r| !r.is_nan())
        .collect()
}

/// Drawdown of each value from the running peak, as a fraction (<= 0).
pub fn drawdown_series(values: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    values
        .iter()
        .map(|&v| {
            peak = peak.max(v);
            (v - peak) / peak
        })
        .collect()
}

/// Deepest drawdown as a fraction; zero for a non-decreasing series.
pub fn max_drawdown(values: &[f64]) -> f64 {
    drawdown_series(values)
        .into_iter()
        .fold(0.0_f64, |acc, dd| acc.min(dd))
}

fn annualize(growth: f64, years: f64) -> f64 {
    // additive accounting can drive the value through zero; a fractional
    // power of a negative base is undefined, so that is a total loss
    if growth <= 0.0 {
        return -1.0;
    }
    growth.powf(1.0 / years) - 1.0
}

fn sample_std(returns: &[f64]) -> f64 {
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

/// Annualized root-mean-square of the strictly negative returns, `None` when there are none.
fn downside_deviation(returns: &[f64]) -> Option<f64> {
    let negatives: Vec<f64> = returns.iter().copied().filter(|&r| r < 0.0).collect();
    if negatives.is_empty() {
        return None;
    }
    let mean_sq = negatives.iter().map(|r| r * r).sum::<f64>() / negatives.len() as f64;
    Some(mean_sq.sqrt() * TRADING_DAYS_PER_YEAR.sqrt())
}
