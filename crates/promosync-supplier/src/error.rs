use promosync_core::SyncError;
use thiserror::Error;

/// Errors returned by the PromoOpción catalog client.
#[derive(Debug, Error)]
pub enum SupplierError {
    /// Network or TLS failure, or a non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog endpoint answered with `"success": false`.
    #[error("PromoOpción API error: {0}")]
    ApiError(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("supplier user and password cannot be empty")]
    MissingCredentials,
}

impl From<SupplierError> for SyncError {
    fn from(err: SupplierError) -> Self {
        match err {
            SupplierError::Http(_) => SyncError::Transport(err.to_string()),
            SupplierError::ApiError(_)
            | SupplierError::Deserialize { .. }
            | SupplierError::InvalidBaseUrl { .. }
            | SupplierError::MissingCredentials => SyncError::Api(err.to_string()),
        }
    }
}
