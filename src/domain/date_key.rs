//! Day-granularity date keys.
//!
//! Every date that enters the engine goes through [`DateKey::parse`], so rows,
//! merged tables and rolling windows all agree on the same key for a day.

use crate::domain::error::EodError;
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Serialize, Serializer};
use std::fmt;

/// A calendar day, keyed externally as Unix epoch seconds at 00:00:00 UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Parses the leading `YYYY-MM-DD` of a provider date string. A trailing
    /// time component, introduced by `T` or a space, is ignored; any other
    /// suffix is rejected.
    pub fn parse(value: &str) -> Result<Self, EodError> {
        let invalid = || EodError::DateParse {
            value: value.to_string(),
        };
        let trimmed = value.trim();
        let (day, rest) = trimmed.split_at_checked(10).unwrap_or((trimmed, ""));
        if !(rest.is_empty() || rest.starts_with(['T', ' '])) {
            return Err(invalid());
        }
        NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| invalid())
    }

    /// Truncates epoch seconds to the containing UTC day.
    pub fn from_epoch(seconds: i64) -> Option<Self> {
        chrono::DateTime::from_timestamp(seconds, 0).map(|dt| Self(dt.date_naive()))
    }

    pub fn epoch(&self) -> i64 {
        self.0.and_time(NaiveTime::MIN).and_utc().timestamp()
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// True when this is the final calendar day of its month.
    pub fn is_month_end(&self) -> bool {
        self.0
            .succ_opt()
            .is_none_or(|next| next.month() != self.0.month())
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.epoch())
    }
}
