//! Issuer directory records and id-to-ticker resolution.

use crate::domain::error::EodError;
use crate::ports::issuer_port::IssuerPort;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issuer {
    pub id: i64,
    pub ticker: String,
    pub name: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub country_name: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub security_type: String,
    #[serde(default)]
    pub asset_class: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
}

/// Resolves every id to a ticker, in request order. Any id that cannot be
/// resolved, for whatever reason, fails the whole request.
pub fn resolve_tickers(port: &dyn IssuerPort, ids: &[i64]) -> Result<Vec<String>, EodError> {
    ids.iter()
        .map(|&id| match port.get_issuer(id) {
            Ok(Some(issuer)) => Ok(issuer.ticker),
            Ok(None) => {
                warn!(id, "issuer not found");
                Err(EodError::MissingIssuer { id })
            }
            Err(e) => {
                warn!(id, error = %e, "issuer lookup failed");
                Err(EodError::MissingIssuer { id })
            }
        })
        .collect()
}

/// Parses a comma-separated id list such as `"12, 7,30"`.
pub fn parse_ids(input: &str) -> Result<Vec<i64>, EodError> {
    input
        .split(',')
        .map(|token| {
            let trimmed = token.trim();
            trimmed.parse::<i64>().map_err(|_| EodError::ConfigInvalid {
                section: "request".into(),
                key: "ids".into(),
                reason: format!("invalid issuer id {trimmed:?}"),
            })
        })
        .collect()
}
