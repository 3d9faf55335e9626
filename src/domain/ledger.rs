//! Position ledger: the flat/long state machine and the realized P&L tally.
//!
//! Realized returns accumulate additively ("single interest"): each closed
//! trade adds `per_contract_return * size` to a running total that starts at
//! zero. The total is never compounded.

use chrono::NaiveDate;

use super::error::SentraderError;
use super::position::{PositionState, Trade};
use super::signal::Signal;

/// What a signal did to the ledger, if anything.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEvent {
    Opened {
        date: NaiveDate,
        size: u32,
        entry_price: f64,
    },
    Closed(Trade),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionLedger {
    position_size: u32,
    state: PositionState,
    cumulative_realized_pnl: f64,
    trades: Vec<Trade>,
}

impl PositionLedger {
    /// `position_size` is the number of contracts opened on every buy and must be at least 1.
    pub fn new(position_size: u32) -> Self {
        debug_assert!(position_size >= 1);
        PositionLedger {
            position_size,
            state: PositionState::Flat,
            cumulative_realized_pnl: 0.0,
            trades: Vec::new(),
        }
    }

    pub fn state(&self) -> PositionState {
        self.state
    }

    pub fn cumulative_realized_pnl(&self) -> f64 {
        self.cumulative_realized_pnl
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn into_trades(self) -> Vec<Trade> {
        self.trades
    }

    /// Apply one bar's signal at that bar's price.
    ///
    /// Buy opens only from flat and sell closes only from long; every other
    /// combination, and hold, leaves the ledger untouched and returns `None`.
    pub fn apply(
        &mut self,
        signal: Signal,
        date: NaiveDate,
        price: f64,
    ) -> Result<Option<LedgerEvent>, SentraderError> {
        match (signal, self.state) {
            (Signal::Buy, PositionState::Flat) => self.open(date, price).map(Some),
            (
                Signal::Sell,
                PositionState::Long {
                    size,
                    entry_price,
                    entry_date,
                },
            ) => Ok(Some(self.close(date, price, size, entry_price, entry_date))),
            _ => Ok(None),
        }
    }

    fn open(&mut self, date: NaiveDate, price: f64) -> Result<LedgerEvent, SentraderError> {
        if !price.is_finite() || price <= 0.0 {
            return Err(SentraderError::invalid_input(format!(
                "cannot open position at non-positive entry price {} on {}",
                price, date
            )));
        }

        self.state = PositionState::Long {
            size: self.position_size,
            entry_price: price,
            entry_date: date,
        };

        Ok(LedgerEvent::Opened {
            date,
            size: self.position_size,
            entry_price: price,
        })
    }

    fn close(
        &mut self,
        date: NaiveDate,
        price: f64,
        size: u32,
        entry_price: f64,
        entry_date: NaiveDate,
    ) -> LedgerEvent {
        let trade_return = (price - entry_price) / entry_price * f64::from(size);
        self.cumulative_realized_pnl += trade_return;

        let trade = Trade {
            entry_date,
            entry_price,
            exit_date: date,
            exit_price: price,
            size,
            trade_return,
            cumulative_realized_pnl: self.cumulative_realized_pnl,
            equity_value: 1.0 + self.cumulative_realized_pnl,
        };

        self.state = PositionState::Flat;
        self.trades.push(trade.clone());
        LedgerEvent::Closed(trade)
    }
}
