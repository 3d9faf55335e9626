//! Buy-and-hold reference curve.
//!
//! The position is open from the first bar to the last, sized like the
//! strategy. Each bar adds `(price[i] / price[i-1] - 1) * size` to a running
//! total, so the curve is anchored on the previous close rather than on an
//! entry price. With no exit ever taken, market value and equity value are the
//! same number on every bar.

use super::error::SentraderError;
use super::observation::{MarketObservation, validate_observations};
use super::valuation::ValuationPoint;

pub fn run_buy_and_hold(
    observations: &[MarketObservation],
    position_size: u32,
) -> Result<Vec<ValuationPoint>, SentraderError> {
    validate_observations(observations)?;
    if position_size == 0 {
        return Err(SentraderError::invalid_input(
            "buy-and-hold position size must be at least 1",
        ));
    }

    let size = f64::from(position_size);
    let mut curve = Vec::with_capacity(observations.len());
    let mut cumulative = 0.0_f64;
    let mut previous_price: Option<f64> = None;

    for obs in observations {
        // per-bar increment doubles as the daily return column
        let increment = match previous_price {
            Some(prev) => (obs.price / prev - 1.0) * size,
            None => 0.0,
        };
        cumulative += increment;
        let value = 1.0 + cumulative;

        curve.push(ValuationPoint {
            date: obs.date,
            market_value: value,
            equity_value: value,
            daily_market_return: increment,
            daily_equity_return: increment,
            price: obs.price,
            sentiment: obs.sentiment,
            position_size,
            cumulative_realized_pnl: cumulative,
        });
        previous_price = Some(obs.price);
    }

    Ok(curve)
}
