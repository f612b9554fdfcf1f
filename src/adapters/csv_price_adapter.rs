//! CSV file price adapter: one `<TICKER>.csv` per security.

use crate::domain::error::EodError;
use crate::domain::row::{sort_by_date, Row};
use crate::ports::price_port::PricePort;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }
}

impl PricePort for CsvPriceAdapter {
    fn fetch_rows(&self, ticker: &str) -> Result<Vec<Row>, EodError> {
        let path = self.csv_path(ticker);
        let mut rdr = csv::Reader::from_path(&path).map_err(|e| EodError::Fetch {
            ticker: ticker.to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rows = rdr
            .deserialize::<Row>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| EodError::Fetch {
                ticker: ticker.to_string(),
                reason: format!("CSV parse error: {}", e),
            })?;

        sort_by_date(&mut rows);
        debug!(ticker, rows = rows.len(), path = %path.display(), "read CSV prices");
        Ok(rows)
    }
}
