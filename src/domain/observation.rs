//! Daily market observation and input validation.

use chrono::NaiveDate;

use super::error::SentraderError;

/// One trading day of input: closing price and the sentiment reading for that day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketObservation {
    pub date: NaiveDate,
    pub price: f64,
    pub sentiment: f64,
}

impl MarketObservation {
    pub fn new(date: NaiveDate, price: f64, sentiment: f64) -> Self {
        MarketObservation {
            date,
            price,
            sentiment,
        }
    }
}

/// Reject sequences the simulation cannot run on.
///
/// The sequence must be non-empty, strictly increasing by date, with finite
/// positive prices and finite sentiment values. Nothing is simulated when this
/// fails.
pub fn validate_observations(observations: &[MarketObservation]) -> Result<(), SentraderError> {
    if observations.is_empty() {
        return Err(SentraderError::invalid_input("observation sequence is empty"));
    }

    for (i, obs) in observations.iter().enumerate() {
        if !obs.price.is_finite() || obs.price <= 0.0 {
            return Err(SentraderError::invalid_input(format!(
                "non-positive price {} on {} (index {})",
                obs.price, obs.date, i
            )));
        }
        if !obs.sentiment.is_finite() {
            return Err(SentraderError::invalid_input(format!(
                "non-finite sentiment on {} (index {})",
                obs.date, i
            )));
        }
    }

    if let Some(w) = observations.windows(2).find(|w| w[1].date <= w[0].date) {
        return Err(SentraderError::invalid_input(format!(
            "dates not strictly increasing: {} followed by {}",
            w[0].date, w[1].date
        )));
    }

    Ok(())
}
