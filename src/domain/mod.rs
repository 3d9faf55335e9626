//! Core domain types and logic.

pub mod backtest;
pub mod baseline;
pub mod config_validation;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod observation;
pub mod period;
pub mod position;
pub mod signal;
pub mod strategy;
pub mod valuation;
