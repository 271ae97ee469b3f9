//! Supplier unit price to storefront sale price.
//!
//! `price = base * (1 - discount_rate) / (1 - margin_rate)`
//!
//! With the default rates (23% discount, 40% margin on the sale price) this is
//! `base * 0.77 / 0.60`. Arithmetic stays at full `Decimal` precision;
//! [`round_for_transmission`] is applied once, when a quote is produced.

use promosync_core::{AppConfig, InvalidPricePolicy};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::PricingError;

/// Pricing parameters for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    discount_rate: Decimal,
    margin_rate: Decimal,
    invalid_price: InvalidPricePolicy,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            discount_rate: Decimal::new(23, 2),
            margin_rate: Decimal::new(40, 2),
            invalid_price: InvalidPricePolicy::Zero,
        }
    }
}

impl PricingPolicy {
    /// # Errors
    ///
    /// Returns [`PricingError::RateOutOfRange`] unless both rates are in `[0, 1)`.
    pub fn new(
        discount_rate: Decimal,
        margin_rate: Decimal,
        invalid_price: InvalidPricePolicy,
    ) -> Result<Self, PricingError> {
        check_rate("discount_rate", discount_rate)?;
        check_rate("margin_rate", margin_rate)?;
        Ok(Self {
            discount_rate,
            margin_rate,
            invalid_price,
        })
    }

    /// # Errors
    ///
    /// Returns [`PricingError`] if the configured rates are out of range.
    pub fn from_config(config: &AppConfig) -> Result<Self, PricingError> {
        Self::new(
            config.discount_rate,
            config.margin_rate,
            config.invalid_price_policy,
        )
    }

    #[must_use]
    pub fn invalid_price(&self) -> InvalidPricePolicy {
        self.invalid_price
    }

    /// Unrounded sale price for `base_price`.
    ///
    /// Returns `None` only if the arithmetic overflows `Decimal`.
    #[must_use]
    pub fn price(&self, base_price: Decimal) -> Option<Decimal> {
        let retained = Decimal::ONE - self.discount_rate;
        let divisor = Decimal::ONE - self.margin_rate;
        base_price.checked_mul(retained)?.checked_div(divisor)
    }

    /// Sale price ready to send, rounded to two decimals.
    ///
    /// A missing or unusable base price yields `0.00` under
    /// [`InvalidPricePolicy::Zero`] and `None` under
    /// [`InvalidPricePolicy::Skip`].
    #[must_use]
    pub fn quote(&self, base_price: Option<Decimal>) -> Option<Decimal> {
        match base_price.and_then(|p| self.price(p)) {
            Some(price) => Some(round_for_transmission(price)),
            None => match self.invalid_price {
                InvalidPricePolicy::Zero => Some(round_for_transmission(Decimal::ZERO)),
                InvalidPricePolicy::Skip => None,
            },
        }
    }
}

/// Rounds to two decimals, half away from zero.
#[must_use]
pub fn round_for_transmission(price: Decimal) -> Decimal {
    price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn check_rate(name: &'static str, value: Decimal) -> Result<(), PricingError> {
    if value < Decimal::ZERO || value >= Decimal::ONE {
        return Err(PricingError::RateOutOfRange {
            name,
            value: value.to_string(),
        });
    }
    Ok(())
}
