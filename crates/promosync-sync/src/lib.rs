//! Reconciliation engine for the PromoOpción to Shopify catalog sync.
//!
//! Prices supplier variants, diffs each supplier product against the
//! storefront, and drives the resulting create, update, and delete
//! operations through the [`promosync_core::DestinationSink`] trait.

pub mod error;
pub mod orchestrator;
pub mod pricing;
pub mod reconcile;
pub mod report;

pub use error::PricingError;
pub use orchestrator::{run_full_sync, SessionGuard, SyncOptions};
pub use pricing::{round_for_transmission, PricingPolicy};
pub use reconcile::{
    ApplyResult, Operation, PlanKind, ProductPlan, ReconcileOptions, Reconciler, SkipReason,
};
pub use report::{FailureStage, ProductFailure, SyncReport};
