//! Domain error types.

/// Top-level error type for sentrader.
#[derive(Debug, thiserror::Error)]
pub enum SentraderError {
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

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SentraderError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        SentraderError::InvalidInput {
            reason: reason.into(),
        }
    }
}

impl From<&SentraderError> for std::process::ExitCode {
    fn from(err: &SentraderError) -> Self {
        let code: u8 = match err {
            SentraderError::Io(_) => 1,
            SentraderError::ConfigParse { .. }
            | SentraderError::ConfigMissing { .. }
            | SentraderError::ConfigInvalid { .. } => 2,
            SentraderError::Data { .. } => 3,
            SentraderError::InvalidInput { .. } => 4,
            SentraderError::Report { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
