use thiserror::Error;

/// Errors surfaced by supplier sources and destination sinks.
///
/// The variant says what went wrong; the caller decides how severe it is.
/// A catalog fetch that fails with [`SyncError::Transport`] or
/// [`SyncError::Api`] ends the run, while the same error during one
/// product's reconciliation only fails that product.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Network or HTTP-layer failure talking to either remote.
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote answered but reported a business-level failure, or the
    /// payload did not have the expected shape.
    #[error("remote API error: {0}")]
    Api(String),

    /// A single create, update, or delete against the storefront failed.
    #[error("operation failed for {target}: {message}")]
    OperationFailure { target: String, message: String },
}

impl SyncError {
    /// Builds an [`SyncError::OperationFailure`] for `target`.
    pub fn operation(target: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::OperationFailure {
            target: target.into(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
