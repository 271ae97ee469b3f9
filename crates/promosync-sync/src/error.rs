use thiserror::Error;

#[derive(Debug, Error)]
pub enum PricingError {
    #[error("{name} must be in [0, 1), got {value}")]
    RateOutOfRange { name: &'static str, value: String },

    #[error("price tolerance must not be negative, got {0}")]
    NegativeTolerance(String),
}
