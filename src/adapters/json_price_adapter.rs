//! JSON file price adapter: one `<TICKER>.json` per security holding the
//! provider's array of daily rows.

use crate::domain::error::EodError;
use crate::domain::row::{sort_by_date, Row};
use crate::ports::price_port::PricePort;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::debug;

pub struct JsonPriceAdapter {
    base_path: PathBuf,
}

impl JsonPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn json_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", ticker))
    }
}

impl PricePort for JsonPriceAdapter {
    fn fetch_rows(&self, ticker: &str) -> Result<Vec<Row>, EodError> {
        let path = self.json_path(ticker);
        let file = File::open(&path).map_err(|e| EodError::Fetch {
            ticker: ticker.to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rows: Vec<Row> =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| EodError::Fetch {
                ticker: ticker.to_string(),
                reason: format!("JSON parse error: {}", e),
            })?;

        sort_by_date(&mut rows);
        debug!(ticker, rows = rows.len(), "read JSON prices");
        Ok(rows)
    }
}
