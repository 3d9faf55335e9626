//! Simulation event sink port.
//!
//! The engine reports what it does through this trait and never formats
//! output itself. Every method has an empty default so sinks only implement
//! what they care about.

use chrono::NaiveDate;

use crate::domain::position::Trade;
use crate::domain::valuation::ValuationPoint;

pub trait SimulationEvents {
    fn on_start(&self, _label: &str, _bars: usize, _first: NaiveDate, _last: NaiveDate) {}

    fn on_position_opened(&self, _date: NaiveDate, _size: u32, _entry_price: f64, _sentiment: f64) {
    }

    fn on_position_closed(&self, _trade: &Trade, _sentiment: f64) {}

    fn on_complete(&self, _label: &str, _last: &ValuationPoint, _trades: usize) {}
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEvents;

impl SimulationEvents for NoopEvents {}
