//! Simulation engine and backtest orchestration.
//!
//! BacktestConfig holds run-level parameters. The engine makes one forward
//! pass over the observations: signal, then ledger, then valuation, one
//! [`ValuationPoint`] per bar.

use chrono::NaiveDate;

use super::baseline::run_buy_and_hold;
use super::error::SentraderError;
use super::ledger::{LedgerEvent, PositionLedger};
use super::metrics::{PerformanceAnalyzer, PerformanceMetrics};
use super::observation::{MarketObservation, validate_observations};
use super::period::{FULL_PERIOD, IN_SAMPLE, OUT_OF_SAMPLE, split_curve};
use super::position::Trade;
use super::signal::generate_signal;
use super::strategy::StrategyConfig;
use super::valuation::{DualValuationEngine, ValuationPoint, ValueColumn};
use crate::ports::event_port::{NoopEvents, SimulationEvents};

pub const STRATEGY_LABEL: &str = "sentiment strategy";
pub const BASELINE_LABEL: &str = "buy and hold";

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub split_date: Option<NaiveDate>,
    pub initial_capital: f64,
    pub risk_free_rate: f64,
    pub strategy: StrategyConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub curve: Vec<ValuationPoint>,
    pub trades: Vec<Trade>,
}

impl SimulationResult {
    pub fn final_point(&self) -> Option<&ValuationPoint> {
        self.curve.last()
    }
}

pub struct SimulationEngine<'a> {
    config: StrategyConfig,
    events: &'a dyn SimulationEvents,
}

impl<'a> SimulationEngine<'a> {
    pub fn new(config: StrategyConfig) -> Result<Self, SentraderError> {
        config.validate()?;
        Ok(SimulationEngine {
            config,
            events: &NoopEvents,
        })
    }

    pub fn with_events(mut self, events: &'a dyn SimulationEvents) -> Self {
        self.events = events;
        self
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Run the strategy over the whole observation sequence.
    ///
    /// Input is validated up front; an invalid sequence produces no curve and
    /// no trades.
    pub fn run(
        &self,
        observations: &[MarketObservation],
    ) -> Result<SimulationResult, SentraderError> {
        validate_observations(observations)?;

        if let (Some(first), Some(last)) = (observations.first(), observations.last()) {
            self.events
                .on_start(STRATEGY_LABEL, observations.len(), first.date, last.date);
        }

        let mut ledger = PositionLedger::new(self.config.position_size);
        let mut valuation = DualValuationEngine::new();
        let mut curve = Vec::with_capacity(observations.len());

        for obs in observations {
            let signal = generate_signal(
                obs.sentiment,
                self.config.entry_threshold,
                self.config.exit_threshold,
            );

            let closed = match ledger.apply(signal, obs.date, obs.price)? {
                Some(LedgerEvent::Opened {
                    date,
                    size,
                    entry_price,
                }) => {
                    self.events
                        .on_position_opened(date, size, entry_price, obs.sentiment);
                    false
                }
                Some(LedgerEvent::Closed(trade)) => {
                    self.events.on_position_closed(&trade, obs.sentiment);
                    true
                }
                None => false,
            };

            curve.push(valuation.value(
                obs,
                ledger.state(),
                ledger.cumulative_realized_pnl(),
                closed,
            ));
        }

        let trades = ledger.into_trades();
        if let Some(last) = curve.last() {
            self.events.on_complete(STRATEGY_LABEL, last, trades.len());
        }

        Ok(SimulationResult { curve, trades })
    }
}

/// The curve a metrics record was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    StrategyMarket,
    StrategyEquity,
    BuyAndHold,
}

impl Series {
    pub fn name(self) -> &'static str {
        match self {
            Series::StrategyMarket => "strategy_market",
            Series::StrategyEquity => "strategy_equity",
            Series::BuyAndHold => "buy_and_hold",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesMetrics {
    pub series: Series,
    pub metrics: PerformanceMetrics,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestReport {
    pub strategy: SimulationResult,
    pub baseline: Vec<ValuationPoint>,
    pub metrics: Vec<SeriesMetrics>,
    pub initial_capital: f64,
    pub split_date: Option<NaiveDate>,
}

impl BacktestReport {
    pub fn find(&self, series: Series, period: &str) -> Option<&PerformanceMetrics> {
        self.metrics
            .iter()
            .find(|m| m.series == series && m.metrics.period == period)
            .map(|m| &m.metrics)
    }
}

/// Run the strategy and the buy-and-hold baseline over the same observations
/// and measure both, over the full period and, when a split date is set, over
/// each sample period.
pub fn run_backtest(
    observations: &[MarketObservation],
    config: &BacktestConfig,
    events: &dyn SimulationEvents,
) -> Result<BacktestReport, SentraderError> {
    let strategy = SimulationEngine::new(config.strategy)?
        .with_events(events)
        .run(observations)?;

    let baseline = run_buy_and_hold(observations, config.strategy.position_size)?;
    if let Some(last) = baseline.last() {
        events.on_complete(BASELINE_LABEL, last, 0);
    }

    let analyzer = PerformanceAnalyzer::new(config.risk_free_rate);
    let sources: [(Series, &[ValuationPoint], ValueColumn); 3] = [
        (Series::StrategyMarket, &strategy.curve, ValueColumn::MarketValue),
        (Series::StrategyEquity, &strategy.curve, ValueColumn::EquityValue),
        (Series::BuyAndHold, &baseline, ValueColumn::MarketValue),
    ];

    let mut metrics = Vec::new();
    for (series, curve, column) in sources {
        metrics.push(SeriesMetrics {
            series,
            metrics: analyzer.compute(curve, column, FULL_PERIOD),
        });

        if let Some(split) = config.split_date {
            let (in_sample, out_of_sample) = split_curve(curve, split);
            metrics.push(SeriesMetrics {
                series,
                metrics: analyzer.compute(in_sample, column, IN_SAMPLE),
            });
            metrics.push(SeriesMetrics {
                series,
                metrics: analyzer.compute(out_of_sample, column, OUT_OF_SAMPLE),
            });
        }
    }

    Ok(BacktestReport {
        strategy,
        baseline,
        metrics,
        initial_capital: config.initial_capital,
        split_date: config.split_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::RefCell;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn observations(prices: &[f64], sentiments: &[f64]) -> Vec<MarketObservation> {
        prices
            .iter()
            .zip(sentiments)
            .enumerate()
            .map(|(i, (&p, &s))| MarketObservation::new(d(i as u32 + 1), p, s))
            .collect()
    }

    fn sample_config() -> BacktestConfig {
        BacktestConfig {
            start_date: d(1),
            end_date: d(31),
            split_date: None,
            initial_capital: 1_000_000.0,
            risk_free_rate: 0.01,
            strategy: StrategyConfig::default(),
        }
    }

    #[derive(Default)]
    struct RecordingEvents {
        log: RefCell<Vec<String>>,
    }

    impl SimulationEvents for RecordingEvents {
        fn on_start(&self, label: &str, bars: usize, _first: NaiveDate, _last: NaiveDate) {
            self.log.borrow_mut().push(format!("start {} {}", label, bars));
        }

        fn on_position_opened(&self, date: NaiveDate, size: u32, entry_price: f64, _s: f64) {
            self.log
                .borrow_mut()
                .push(format!("open {} {} {}", date, size, entry_price));
        }

        fn on_position_closed(&self, trade: &Trade, _s: f64) {
            self.log
                .borrow_mut()
                .push(format!("close {} {}", trade.exit_date, trade.exit_price));
        }

        fn on_complete(&self, label: &str, _last: &ValuationPoint, trades: usize) {
            self.log
                .borrow_mut()
                .push(format!("complete {} {}", label, trades));
        }
    }

    #[test]
    fn engine_rejects_invalid_config() {
        let config = StrategyConfig {
            position_size: 0,
            ..StrategyConfig::default()
        };
        assert!(SimulationEngine::new(config).is_err());
    }

    #[test]
    fn engine_rejects_empty_input() {
        let engine = SimulationEngine::new(StrategyConfig::default()).unwrap();
        let err = engine.run(&[]).unwrap_err();
        assert!(matches!(err, SentraderError::InvalidInput { .. }));
    }

    #[test]
    fn one_point_per_bar_in_date_order() {
        let obs = observations(&[100.0, 101.0, 102.0], &[0.0, 0.0, 0.0]);
        let result = SimulationEngine::new(StrategyConfig::default())
            .unwrap()
            .run(&obs)
            .unwrap();
        assert_eq!(result.curve.len(), 3);
        for (point, o) in result.curve.iter().zip(&obs) {
            assert_eq!(point.date, o.date);
            assert_eq!(point.price, o.price);
        }
    }

    #[test]
    fn no_signal_stays_flat_at_one() {
        let obs = observations(&[100.0, 80.0, 130.0], &[0.0, 0.0, 0.0]);
        let result = SimulationEngine::new(StrategyConfig::default())
            .unwrap()
            .run(&obs)
            .unwrap();
        assert!(result.trades.is_empty());
        for p in &result.curve {
            assert_eq!(p.market_value, 1.0);
            assert_eq!(p.equity_value, 1.0);
            assert_eq!(p.position_size, 0);
        }
    }

    #[test]
    fn open_position_at_end_is_left_open() {
        let obs = observations(&[100.0, 110.0], &[-0.1, -0.1]);
        let result = SimulationEngine::new(StrategyConfig::default())
            .unwrap()
            .run(&obs)
            .unwrap();
        assert!(result.trades.is_empty());
        let last = result.final_point().unwrap();
        assert_eq!(last.position_size, 1);
        assert_relative_eq!(last.market_value, 1.10, epsilon = 1e-12);
        assert_eq!(last.equity_value, 1.0);
    }

    #[test]
    fn events_follow_the_pass() {
        let obs = observations(&[100.0, 105.0, 95.0], &[-0.01, 0.02, 0.0]);
        let events = RecordingEvents::default();
        SimulationEngine::new(StrategyConfig::default())
            .unwrap()
            .with_events(&events)
            .run(&obs)
            .unwrap();

        let log = events.log.borrow();
        assert_eq!(
            *log,
            vec![
                "start sentiment strategy 3".to_string(),
                "open 2024-01-01 1 100".to_string(),
                "close 2024-01-02 105".to_string(),
                "complete sentiment strategy 1".to_string(),
            ]
        );
    }

    #[test]
    fn report_without_split_has_full_period_only() {
        let obs = observations(&[100.0, 105.0, 95.0, 110.0], &[-0.01, 0.02, -0.02, 0.05]);
        let report = run_backtest(&obs, &sample_config(), &NoopEvents).unwrap();

        assert_eq!(report.metrics.len(), 3);
        assert!(report.find(Series::StrategyMarket, FULL_PERIOD).is_some());
        assert!(report.find(Series::StrategyEquity, FULL_PERIOD).is_some());
        assert!(report.find(Series::BuyAndHold, FULL_PERIOD).is_some());
        assert!(report.find(Series::BuyAndHold, IN_SAMPLE).is_none());
    }

    #[test]
    fn report_with_split_covers_each_sample() {
        let obs = observations(
            &[100.0, 105.0, 95.0, 110.0, 108.0, 112.0],
            &[-0.01, 0.02, -0.02, 0.05, -0.03, 0.01],
        );
        let config = BacktestConfig {
            split_date: Some(d(4)),
            ..sample_config()
        };
        let report = run_backtest(&obs, &config, &NoopEvents).unwrap();

        assert_eq!(report.metrics.len(), 9);
        let ins = report.find(Series::StrategyMarket, IN_SAMPLE).unwrap();
        let outs = report.find(Series::StrategyMarket, OUT_OF_SAMPLE).unwrap();
        assert_eq!(ins.trading_days, 3);
        assert_eq!(outs.trading_days, 3);
        assert_eq!(report.split_date, Some(d(4)));
    }

    #[test]
    fn baseline_matches_strategy_length() {
        let obs = observations(&[100.0, 105.0, 95.0], &[0.0, 0.0, 0.0]);
        let report = run_backtest(&obs, &sample_config(), &NoopEvents).unwrap();
        assert_eq!(report.baseline.len(), report.strategy.curve.len());
        assert_relative_eq!(report.baseline[2].market_value, 1.0 + 0.05 + (95.0 / 105.0 - 1.0), epsilon = 1e-12);
    }

    #[test]
    fn series_names() {
        assert_eq!(Series::StrategyMarket.name(), "strategy_market");
        assert_eq!(Series::StrategyEquity.name(), "strategy_equity");
        assert_eq!(Series::BuyAndHold.name(), "buy_and_hold");
    }
}
