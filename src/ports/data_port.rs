//! Observation source port trait.

use crate::domain::error::SentraderError;
use crate::domain::observation::MarketObservation;
use chrono::NaiveDate;

pub trait DataPort {
    /// Observations dated within `start_date..=end_date`, in date order.
    fn fetch_observations(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<MarketObservation>, SentraderError>;

    /// First date, last date and observation count, or `None` when the source is empty.
    fn get_data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SentraderError>;
}
