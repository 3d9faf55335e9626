//! Simulation events rendered as `tracing` records.
//!
//! Run boundaries log at info, position changes at debug.

use chrono::NaiveDate;

use crate::domain::position::Trade;
use crate::domain::valuation::ValuationPoint;
use crate::ports::event_port::SimulationEvents;

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventAdapter;

impl TracingEventAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl SimulationEvents for TracingEventAdapter {
    fn on_start(&self, label: &str, bars: usize, first: NaiveDate, last: NaiveDate) {
        tracing::info!(
            series = label,
            bars,
            first = %first,
            last = %last,
            "Starting simulation"
        );
    }

    fn on_position_opened(&self, date: NaiveDate, size: u32, entry_price: f64, sentiment: f64) {
        tracing::debug!(
            date = %date,
            size,
            price = entry_price,
            sentiment,
            "Opened long position"
        );
    }

    fn on_position_closed(&self, trade: &Trade, sentiment: f64) {
        tracing::debug!(
            date = %trade.exit_date,
            size = trade.size,
            price = trade.exit_price,
            sentiment,
            trade_return = trade.trade_return,
            cumulative_pnl = trade.cumulative_realized_pnl,
            equity = trade.equity_value,
            "Closed long position"
        );
    }

    fn on_complete(&self, label: &str, last: &ValuationPoint, trades: usize) {
        tracing::info!(
            series = label,
            trades,
            market_value = last.market_value,
            equity_value = last.equity_value,
            "Simulation complete: final value {:.4}",
            last.market_value
        );
    }
}
