//! Mark-to-market and realized-equity valuation, one point per bar.
//!
//! Both curves are normalized to start at 1.0: the value of one notional unit
//! of currency. The market curve includes the unrealized return of an open
//! position; the equity curve moves only when a position is closed.

use chrono::NaiveDate;
use serde::Serialize;

use super::observation::MarketObservation;
use super::position::PositionState;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValuationPoint {
    pub date: NaiveDate,
    pub market_value: f64,
    pub equity_value: f64,
    pub daily_market_return: f64,
    pub daily_equity_return: f64,
    pub price: f64,
    pub sentiment: f64,
    pub position_size: u32,
    pub cumulative_realized_pnl: f64,
}

/// Which curve of a [`ValuationPoint`] sequence to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueColumn {
    MarketValue,
    EquityValue,
}

impl ValueColumn {
    pub fn read(self, point: &ValuationPoint) -> f64 {
        match self {
            ValueColumn::MarketValue => point.market_value,
            ValueColumn::EquityValue => point.equity_value,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueColumn::MarketValue => "market_value",
            ValueColumn::EquityValue => "equity_value",
        }
    }
}

/// Derives both curves bar by bar from the ledger state after that bar's signal.
#[derive(Debug, Clone, PartialEq)]
pub struct DualValuationEngine {
    equity_value: f64,
    previous: Option<(f64, f64)>,
}

impl Default for DualValuationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DualValuationEngine {
    pub fn new() -> Self {
        DualValuationEngine {
            equity_value: 1.0,
            previous: None,
        }
    }

    /// Value one bar.
    ///
    /// `closed_this_bar` marks the bar on which the ledger closed a position;
    /// only then does the equity curve step to `1 + cumulative_realized_pnl`.
    pub fn value(
        &mut self,
        observation: &MarketObservation,
        state: PositionState,
        cumulative_realized_pnl: f64,
        closed_this_bar: bool,
    ) -> ValuationPoint {
        let market_value = 1.0 + cumulative_realized_pnl + state.unrealized_return(observation.price);

        if closed_this_bar {
            self.equity_value = 1.0 + cumulative_realized_pnl;
        }

        let (daily_market_return, daily_equity_return) = match self.previous {
            Some((prev_market, prev_equity)) => (
                market_value / prev_market - 1.0,
                self.equity_value / prev_equity - 1.0,
            ),
            None => (0.0, 0.0),
        };
        self.previous = Some((market_value, self.equity_value));

        ValuationPoint {
            date: observation.date,
            market_value,
            equity_value: self.equity_value,
            daily_market_return,
            daily_equity_return,
            price: observation.price,
            sentiment: observation.sentiment,
            position_size: state.size(),
            cumulative_realized_pnl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn obs(day: u32, price: f64) -> MarketObservation {
        MarketObservation::new(NaiveDate::from_ymd_opt(2024, 1, day).unwrap(), price, 0.0)
    }

    fn long(entry_price: f64, size: u32) -> PositionState {
        PositionState::Long {
            size,
            entry_price,
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn first_bar_starts_at_one_with_zero_returns() {
        let mut engine = DualValuationEngine::new();
        let point = engine.value(&obs(1, 100.0), PositionState::Flat, 0.0, false);

        assert_eq!(point.market_value, 1.0);
        assert_eq!(point.equity_value, 1.0);
        assert_eq!(point.daily_market_return, 0.0);
        assert_eq!(point.daily_equity_return, 0.0);
        assert_eq!(point.position_size, 0);
    }

    #[test]
    fn market_value_includes_unrealized_return() {
        let mut engine = DualValuationEngine::new();
        engine.value(&obs(1, 100.0), long(100.0, 1), 0.0, false);
        let point = engine.value(&obs(2, 110.0), long(100.0, 1), 0.0, false);

        assert_relative_eq!(point.market_value, 1.10, epsilon = 1e-12);
        assert_eq!(point.equity_value, 1.0);
        assert_relative_eq!(point.daily_market_return, 0.10, epsilon = 1e-12);
        assert_eq!(point.daily_equity_return, 0.0);
        assert_eq!(point.position_size, 1);
    }

    #[test]
    fn market_value_adds_realized_to_unrealized() {
        let mut engine = DualValuationEngine::new();
        let point = engine.value(&obs(1, 90.0), long(100.0, 2), 0.25, false);
        // 1 + 0.25 + (90 - 100) / 100 * 2
        assert_relative_eq!(point.market_value, 1.05, epsilon = 1e-12);
    }

    #[test]
    fn equity_steps_only_on_close() {
        let mut engine = DualValuationEngine::new();
        engine.value(&obs(1, 100.0), long(100.0, 1), 0.0, false);
        let held = engine.value(&obs(2, 120.0), long(100.0, 1), 0.0, false);
        assert_eq!(held.equity_value, 1.0);

        let closed = engine.value(&obs(3, 105.0), PositionState::Flat, 0.05, true);
        assert_relative_eq!(closed.equity_value, 1.05, epsilon = 1e-12);
        assert_relative_eq!(closed.market_value, closed.equity_value, epsilon = 1e-12);
        assert_relative_eq!(closed.daily_equity_return, 0.05, epsilon = 1e-12);

        let after = engine.value(&obs(4, 130.0), PositionState::Flat, 0.05, false);
        assert_eq!(after.equity_value, closed.equity_value);
        assert_eq!(after.daily_equity_return, 0.0);
    }

    #[test]
    fn flat_market_value_is_realized_only() {
        let mut engine = DualValuationEngine::new();
        let point = engine.value(&obs(1, 500.0), PositionState::Flat, 0.3, false);
        assert_relative_eq!(point.market_value, 1.3, epsilon = 1e-12);
    }

    #[test]
    fn value_column_reads_each_curve() {
        let mut engine = DualValuationEngine::new();
        let point = engine.value(&obs(1, 110.0), long(100.0, 1), 0.0, false);
        assert_relative_eq!(ValueColumn::MarketValue.read(&point), 1.10, epsilon = 1e-12);
        assert_eq!(ValueColumn::EquityValue.read(&point), 1.0);
        assert_eq!(ValueColumn::MarketValue.name(), "market_value");
        assert_eq!(ValueColumn::EquityValue.name(), "equity_value");
    }
}
