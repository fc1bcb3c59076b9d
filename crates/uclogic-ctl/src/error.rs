//! Error types for uclogic-ctl

use hid_uclogic_protocol::UclogicError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Device not supported: {0}")]
    Unsupported(String),

    #[error("Classification failed: {0}")]
    Classification(#[from] UclogicError),

    #[error("Invalid device info: {0}")]
    InvalidDeviceInfo(String),

    #[error("Invalid recording, line {line}: {reason}")]
    InvalidRecording { line: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Unsupported(_) => 2,
            Self::Classification(UclogicError::Unsupported) => 2,
            Self::Classification(_) => 3,
            Self::InvalidDeviceInfo(_) | Self::InvalidRecording { .. } | Self::Yaml(_) => 4,
            Self::Io(_) | Self::Json(_) => 1,
        }
    }
}
