use promosync_core::SyncError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShopifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by Shopify (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("malformed response for {context}: {reason}")]
    MalformedResponse { context: String, reason: String },

    #[error("invalid shop URL \"{shop_url}\": {reason}")]
    InvalidShopUrl { shop_url: String, reason: String },

    #[error("Shopify access token cannot be empty")]
    MissingToken,

    #[error("Shopify session is closed")]
    SessionClosed,
}

impl ShopifyError {
    /// Classifies a failed read (lookup or listing) for the sync engine.
    ///
    /// HTTP-layer failures become [`SyncError::Transport`]; everything the
    /// storefront answered but we could not use becomes [`SyncError::Api`].
    #[must_use]
    pub fn into_sync_error(self) -> SyncError {
        match self {
            ShopifyError::Http(_)
            | ShopifyError::RateLimited { .. }
            | ShopifyError::NotFound { .. }
            | ShopifyError::UnexpectedStatus { .. } => SyncError::Transport(self.to_string()),
            ShopifyError::Deserialize { .. }
            | ShopifyError::GraphQl(_)
            | ShopifyError::MalformedResponse { .. }
            | ShopifyError::InvalidShopUrl { .. }
            | ShopifyError::MissingToken
            | ShopifyError::SessionClosed => SyncError::Api(self.to_string()),
        }
    }
}
