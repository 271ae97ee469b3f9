pub mod error;
mod rate_limit;
pub mod session;
mod sink;
mod types;

pub use error::ShopifyError;
pub use session::{admin_base_url, ShopifySession, DEFAULT_LOOKUP_DELAY_MS};
