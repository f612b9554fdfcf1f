//! Price fetching at the engine boundary.
//!
//! Every failure here (port error, bad date, timeout, panicked task) collapses
//! into `None` after being logged. Batch fetches run one blocking task per
//! ticker and join them all; a single failure fails the batch.

use crate::domain::error::EodError;
use crate::domain::row::Row;
use crate::domain::table::Table;
use crate::domain::table_set::TableSet;
use crate::ports::price_port::PricePort;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Fetches one security into a daily table.
pub fn get_price(port: &dyn PricePort, ticker: &str) -> Option<Table> {
    match port.fetch_rows(ticker).and_then(Table::from_rows) {
        Ok(table) => Some(table),
        Err(e) => {
            warn!(ticker, error = %e, "price history unavailable");
            None
        }
    }
}

/// Fetches one security's raw rows.
pub fn get_price_flat(port: &dyn PricePort, ticker: &str) -> Option<Vec<Row>> {
    match port.fetch_rows(ticker) {
        Ok(rows) => Some(rows),
        Err(e) => {
            warn!(ticker, error = %e, "price history unavailable");
            None
        }
    }
}

/// Fetches every ticker concurrently into a set ordered like `tickers`.
pub async fn get_prices(
    port: Arc<dyn PricePort>,
    tickers: &[String],
    timeout: Option<Duration>,
) -> Option<TableSet> {
    let tables = fan_out(port, tickers, timeout, get_price).await?;
    info!(securities = tables.len(), "fetched price tables");
    Some(TableSet::new(tables))
}

/// Like [`get_prices`] but keeps each security's rows as delivered.
pub async fn get_prices_flat(
    port: Arc<dyn PricePort>,
    tickers: &[String],
    timeout: Option<Duration>,
) -> Option<Vec<Vec<Row>>> {
    fan_out(port, tickers, timeout, get_price_flat).await
}

/// [`get_prices`] for callers that need a hard error: an absent batch, or a
/// set whose size differs from the request, is `MissingData`.
pub async fn require_prices(
    port: Arc<dyn PricePort>,
    tickers: &[String],
    timeout: Option<Duration>,
) -> Result<TableSet, EodError> {
    let set = get_prices(port, tickers, timeout)
        .await
        .ok_or(EodError::MissingData)?;
    if set.len() != tickers.len() {
        return Err(EodError::MissingData);
    }
    Ok(set)
}

async fn fan_out<T>(
    port: Arc<dyn PricePort>,
    tickers: &[String],
    timeout: Option<Duration>,
    fetch: fn(&dyn PricePort, &str) -> Option<T>,
) -> Option<Vec<T>>
where
    T: Send + 'static,
{
    let tasks = tickers.iter().cloned().map(|ticker| {
        let port = Arc::clone(&port);
        async move {
            let label = ticker.clone();
            let handle = tokio::task::spawn_blocking(move || fetch(port.as_ref(), &ticker));
            let joined = match timeout {
                Some(limit) => match tokio::time::timeout(limit, handle).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        warn!(ticker = %label, ?limit, "price fetch timed out");
                        return None;
                    }
                },
                None => handle.await,
            };
            match joined {
                Ok(result) => result,
                Err(e) => {
                    warn!(ticker = %label, error = %e, "price fetch task failed");
                    None
                }
            }
        }
    });

    join_all(tasks).await.into_iter().collect()
}
