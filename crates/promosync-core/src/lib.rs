pub mod app_config;
pub mod catalog;
pub mod config;
pub mod error;
pub mod remote;

pub use app_config::{AppConfig, InactiveVariantPolicy, InvalidPricePolicy};
pub use catalog::{
    DestinationProduct, DestinationVariant, ProductDraft, SupplierProduct, SupplierVariant,
    VariantDraft, VariantRef, VariantStatus,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, SyncError};
pub use remote::{DestinationSink, SupplierSource};
