//! Price history port trait.

use crate::domain::error::EodError;
use crate::domain::row::Row;

/// Source of a security's full daily history, oldest first.
pub trait PricePort: Send + Sync {
    fn fetch_rows(&self, ticker: &str) -> Result<Vec<Row>, EodError>;
}
