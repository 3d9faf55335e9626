//! Sample-period slicing of a finished valuation curve.

use chrono::NaiveDate;

use super::valuation::ValuationPoint;

pub const FULL_PERIOD: &str = "full";
pub const IN_SAMPLE: &str = "in-sample";
pub const OUT_OF_SAMPLE: &str = "out-of-sample";

/// Split a date-ordered curve at `split_date`.
///
/// The first slice holds points dated before `split_date`, the second holds
/// the rest. Either may be empty.
pub fn split_curve(
    curve: &[ValuationPoint],
    split_date: NaiveDate,
) -> (&[ValuationPoint], &[ValuationPoint]) {
    let idx = curve.partition_point(|p| p.date < split_date);
    curve.split_at(idx)
}
