//! Engine configuration.

use crate::domain::table_set::Bounds;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: i64 = 30;
pub const DEFAULT_ROLLING_PERIOD: i64 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataFormat {
    #[default]
    Csv,
    Json,
}

impl FromStr for DataFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(DataFormat::Csv),
            "json" => Ok(DataFormat::Json),
            other => Err(format!("unknown data format {other:?} (expected csv or json)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub data_format: DataFormat,
    pub data_path: PathBuf,
    pub issuers_path: Option<PathBuf>,
    /// `None` disables the per-fetch timeout.
    pub fetch_timeout: Option<Duration>,
    pub bounds: Bounds,
    pub rolling_period: usize,
}
