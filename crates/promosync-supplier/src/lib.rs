pub mod client;
pub mod error;
pub mod normalize;
mod retry;
pub mod types;

pub use client::PromoOpcionClient;
pub use error::SupplierError;
pub use normalize::normalize_product;
pub use types::{PromoChild, PromoProduct};
