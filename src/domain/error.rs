//! Domain error types.

use crate::domain::selection::SelectionError;

/// Top-level error type for lakaspiac.
///
/// Empty selections and "not available" aggregates are ordinary results and
/// never surface here.
#[derive(Debug, thiserror::Error)]
pub enum LakaspiacError {
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    #[error("malformed input in {path}: {reason}")]
    MalformedInput { path: String, reason: String },

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

    #[error("invalid selection: {0}")]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&LakaspiacError> for std::process::ExitCode {
    fn from(err: &LakaspiacError) -> Self {
        let code: u8 = match err {
            LakaspiacError::Io(_) => 1,
            LakaspiacError::ConfigParse { .. }
            | LakaspiacError::ConfigMissing { .. }
            | LakaspiacError::ConfigInvalid { .. }
            | LakaspiacError::Selection(_) => 2,
            LakaspiacError::FileNotFound { .. } => 3,
            LakaspiacError::MalformedInput { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
