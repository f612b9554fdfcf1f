//! Domain error types.

/// Top-level error type for eodtable.
#[derive(Debug, thiserror::Error)]
pub enum EodError {
    #[error("price fetch failed for {ticker}: {reason}")]
    Fetch { ticker: String, reason: String },

    #[error("missing issuer {id}")]
    MissingIssuer { id: i64 },

    #[error("issuer directory error: {reason}")]
    IssuerDirectory { reason: String },

    #[error("missing data")]
    MissingData,

    #[error("no overlapping dates")]
    NoOverlap,

    #[error("invalid date {value:?} (expected YYYY-MM-DD)")]
    DateParse { value: String },

    #[error("table is already at monthly frequency")]
    AlreadyMonthly,

    #[error("invalid rolling period {period}: must be at least 1")]
    InvalidPeriod { period: usize },

    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("output error: {reason}")]
    Output { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&EodError> for std::process::ExitCode {
    fn from(err: &EodError) -> Self {
        let code: u8 = match err {
            EodError::Io(_) | EodError::Output { .. } => 1,
            EodError::ConfigParse { .. }
            | EodError::ConfigMissing { .. }
            | EodError::ConfigInvalid { .. } => 2,
            EodError::Fetch { .. }
            | EodError::MissingIssuer { .. }
            | EodError::IssuerDirectory { .. }
            | EodError::DateParse { .. } => 3,
            EodError::AlreadyMonthly
            | EodError::InvalidPeriod { .. }
            | EodError::LengthMismatch { .. } => 4,
            EodError::MissingData | EodError::NoOverlap => 5,
        };
        std::process::ExitCode::from(code)
    }
}
