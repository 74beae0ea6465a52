use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("invalid configuration for {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("configuration error: {0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid script {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("script step {index} targets toast #{toast}, but only {live} are on screen")]
    UnknownToast {
        index: usize,
        toast: usize,
        live: usize,
    },
}

impl Error {
    /// Whether the failure came from user-supplied input rather than the runtime.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Script(_))
    }
}
