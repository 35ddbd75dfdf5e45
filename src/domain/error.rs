//! Domain error types.

/// Top-level error type for marketlens.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("insufficient data for {operation}: have {have} points, need {need}")]
    InsufficientData {
        operation: &'static str,
        have: usize,
        need: usize,
    },

    #[error("no assets provided")]
    NoAssets,

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

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

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AnalyticsError {
    /// True for the recoverable "not enough points" family, where callers are
    /// expected to substitute a neutral default.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, AnalyticsError::InsufficientData { .. })
    }
}

impl From<&AnalyticsError> for std::process::ExitCode {
    fn from(err: &AnalyticsError) -> Self {
        let code: u8 = match err {
            AnalyticsError::Io(_) | AnalyticsError::Report { .. } => 1,
            AnalyticsError::ConfigParse { .. }
            | AnalyticsError::ConfigMissing { .. }
            | AnalyticsError::ConfigInvalid { .. } => 2,
            AnalyticsError::Data { .. } => 3,
            AnalyticsError::InvalidInput { .. } => 4,
            AnalyticsError::InsufficientData { .. } | AnalyticsError::NoAssets => 5,
        };
        std::process::ExitCode::from(code)
    }
}
