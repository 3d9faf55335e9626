//! CSV file data adapter.
//!
//! Reads a headered `date,price,sentiment` file. Columns are located by header
//! name, so extra columns and column order do not matter.

use crate::domain::error::SentraderError;
use crate::domain::observation::MarketObservation;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

pub struct CsvAdapter {
    path: PathBuf,
}

struct Columns {
    date: usize,
    price: usize,
    sentiment: usize,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<MarketObservation>, SentraderError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| SentraderError::Data {
                reason: format!("failed to read {}: {}", self.path.display(), e),
            })?;

        let headers = rdr.headers().map_err(|e| SentraderError::Data {
            reason: format!("CSV header error: {}", e),
        })?;
        let columns = Columns {
            date: column(headers, "date")?,
            price: column(headers, "price")?,
            sentiment: column(headers, "sentiment")?,
        };

        let mut observations = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            // header is line 1
            let line = i + 2;
            let record = result.map_err(|e| SentraderError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = field(&record, columns.date, "date", line)?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                SentraderError::Data {
                    reason: format!("line {}: invalid date '{}': {}", line, date_str, e),
                }
            })?;
            let price = number(&record, columns.price, "price", line)?;
            let sentiment = number(&record, columns.sentiment, "sentiment", line)?;

            observations.push(MarketObservation::new(date, price, sentiment));
        }

        observations.sort_by_key(|o| o.date);
        Ok(observations)
    }
}

fn column(headers: &csv::StringRecord, name: &str) -> Result<usize, SentraderError> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| SentraderError::Data {
            reason: format!("missing {} column", name),
        })
}

fn field<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    name: &str,
    line: usize,
) -> Result<&'r str, SentraderError> {
    record.get(idx).ok_or_else(|| SentraderError::Data {
        reason: format!("line {}: missing {} value", line, name),
    })
}

fn number(
    record: &csv::StringRecord,
    idx: usize,
    name: &str,
    line: usize,
) -> Result<f64, SentraderError> {
    let raw = field(record, idx, name, line)?;
    raw.parse().map_err(|e| SentraderError::Data {
        reason: format!("line {}: invalid {} value '{}': {}", line, name, raw, e),
    })
}

impl DataPort for CsvAdapter {
    fn fetch_observations(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<MarketObservation>, SentraderError> {
        let mut observations = self.read_all()?;
        observations.retain(|o| o.date >= start_date && o.date <= end_date);
        Ok(observations)
    }

    fn get_data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SentraderError> {
        let observations = self.read_all()?;
        Ok(match (observations.first(), observations.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, observations.len())),
            _ => None,
        })
    }
}
