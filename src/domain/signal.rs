//! Sentiment-to-intent signal mapping.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "buy"),
            Signal::Sell => write!(f, "sell"),
            Signal::Hold => write!(f, "hold"),
        }
    }
}

/// Map a sentiment reading to a trading intent.
///
/// `Buy` when `sentiment < -entry_threshold`, `Sell` when
/// `sentiment > exit_threshold`, otherwise `Hold`. Thresholds are
/// user-configurable and may overlap (for example a negative exit threshold);
/// when both conditions hold, `Buy` wins because it is checked first.
pub fn generate_signal(sentiment: f64, entry_threshold: f64, exit_threshold: f64) -> Signal {
    if sentiment < -entry_threshold {
        Signal::Buy
    } else if sentiment > exit_threshold {
        Signal::Sell
    } else {
        Signal::Hold
    }
}
