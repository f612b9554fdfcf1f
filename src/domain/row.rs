//! End-of-day observation for one security.

use crate::domain::date_key::DateKey;
use crate::domain::error::EodError;
use serde::{Deserialize, Serialize};

/// One day's OHLCV plus adjusted close, as delivered by the price feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adjusted_close: f64,
    pub volume: f64,
}

impl Row {
    pub fn key(&self) -> Result<DateKey, EodError> {
        DateKey::parse(&self.date)
    }
}

/// Orders rows by parsed date, oldest first. Rows sharing a date keep their
/// delivered order; unparseable dates sort first and fail later in
/// [`Table::from_rows`](crate::domain::table::Table::from_rows).
pub fn sort_by_date(rows: &mut [Row]) {
    rows.sort_by_cached_key(|row| row.key().ok());
}
