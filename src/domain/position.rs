//! Position state and closed-trade records.

use chrono::NaiveDate;
use serde::Serialize;

/// Current exposure of the single traded instrument.
///
/// A flat book has no size and no entry price; a long book always carries a
/// positive size and a positive entry price.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PositionState {
    #[default]
    Flat,
    Long {
        size: u32,
        entry_price: f64,
        entry_date: NaiveDate,
    },
}

impl PositionState {
    pub fn is_flat(&self) -> bool {
        matches!(self, PositionState::Flat)
    }

    pub fn is_long(&self) -> bool {
        !self.is_flat()
    }

    pub fn size(&self) -> u32 {
        match self {
            PositionState::Flat => 0,
            PositionState::Long { size, .. } => *size,
        }
    }

    pub fn entry_price(&self) -> f64 {
        match self {
            PositionState::Flat => 0.0,
            PositionState::Long { entry_price, .. } => *entry_price,
        }
    }

    /// Additive return of the open position at `price`: per-contract return
    /// times size. Zero when flat.
    pub fn unrealized_return(&self, price: f64) -> f64 {
        match self {
            PositionState::Flat => 0.0,
            PositionState::Long {
                size, entry_price, ..
            } => (price - entry_price) / entry_price * f64::from(*size),
        }
    }
}

/// A round trip, recorded once at close and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    pub size: u32,
    /// Per-contract return times size.
    pub trade_return: f64,
    pub cumulative_realized_pnl: f64,
    pub equity_value: f64,
}

impl Trade {
    pub fn per_contract_return(&self) -> f64 {
        (self.exit_price - self.entry_price) / self.entry_price
    }

    pub fn holding_days(&self) -> i64 {
        (self.exit_date - self.entry_date).num_days()
    }
}
