#![allow(dead_code)]

use chrono::NaiveDate;
use eodtable::domain::date_key::DateKey;
use eodtable::domain::error::EodError;
use eodtable::domain::issuer::Issuer;
use eodtable::domain::row::Row;
use eodtable::domain::table::Table;
use eodtable::ports::issuer_port::IssuerPort;
use eodtable::ports::price_port::PricePort;
use std::collections::HashMap;

pub struct MockPricePort {
    pub data: HashMap<String, Vec<Row>>,
    pub errors: HashMap<String, String>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_rows(mut self, ticker: &str, rows: Vec<Row>) -> Self {
        self.data.insert(ticker.to_string(), rows);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl PricePort for MockPricePort {
    fn fetch_rows(&self, ticker: &str) -> Result<Vec<Row>, EodError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(EodError::Fetch {
                ticker: ticker.to_string(),
                reason: reason.clone(),
            });
        }
        self.data.get(ticker).cloned().ok_or_else(|| EodError::Fetch {
            ticker: ticker.to_string(),
            reason: "unknown ticker".into(),
        })
    }
}

pub struct MockIssuerPort {
    pub issuers: HashMap<i64, Issuer>,
}

impl MockIssuerPort {
    pub fn new() -> Self {
        Self {
            issuers: HashMap::new(),
        }
    }

    pub fn with_issuer(mut self, id: i64, ticker: &str) -> Self {
        self.issuers.insert(
            id,
            Issuer {
                id,
                ticker: ticker.to_string(),
                name: format!("{ticker} fund"),
                issuer: String::new(),
                country_name: String::new(),
                currency: "GBP".into(),
                security_type: "ETF".into(),
                asset_class: None,
                exchange: None,
            },
        );
        self
    }
}

impl IssuerPort for MockIssuerPort {
    fn get_issuer(&self, id: i64) -> Result<Option<Issuer>, EodError> {
        Ok(self.issuers.get(&id).cloned())
    }
}

pub fn make_row(date: &str, adjusted_close: f64) -> Row {
    Row {
        date: date.to_string(),
        open: adjusted_close - 1.0,
        high: adjusted_close + 1.0,
        low: adjusted_close - 2.0,
        close: adjusted_close + 0.5,
        adjusted_close,
        volume: 1000.0,
    }
}

/// `count` consecutive calendar days from `start_date`, price rising by 1.
pub fn generate_rows(start_date: &str, count: usize, start_price: f64) -> Vec<Row> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| {
            let date = start + chrono::Duration::days(i as i64);
            make_row(&date.format("%Y-%m-%d").to_string(), start_price + i as f64)
        })
        .collect()
}

pub fn make_table(rows: Vec<Row>) -> Table {
    Table::from_rows(rows).unwrap()
}

pub fn day(y: i32, m: u32, d: u32) -> DateKey {
    DateKey::from(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

pub fn key(date: &str) -> DateKey {
    DateKey::parse(date).unwrap()
}

pub const PRICES_HEADER: &str = "date,open,high,low,close,adjusted_close,volume\n";

/// Renders rows in the on-disk price CSV layout.
pub fn rows_to_csv(rows: &[Row]) -> String {
    let mut out = PRICES_HEADER.to_string();
    for r in rows {
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            r.date, r.open, r.high, r.low, r.close, r.adjusted_close, r.volume
        ));
    }
    out
}
