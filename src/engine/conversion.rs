//! Token ↔ USD conversion.
//!
//! Feed answers carry 8 decimals, token amounts and USD values 18. Prices are
//! lifted by the additional feed precision before use, so both directions
//! work on 18-decimal operands only.

use primitive_types::U256;

use crate::core::config::EngineConfig;
use crate::error::Result;
use crate::utils::math::{safe_mul, safe_mul_div};

/// Lift an 8-decimal feed price to 18 decimals
pub fn scaled_price(price: U256, config: &EngineConfig) -> Result<U256> {
    safe_mul(price, config.feed_scale(), "price scaling")
}

/// USD value of `amount` tokens: `price * 10^10 * amount / 10^18`
pub fn to_usd(price: U256, amount: U256, config: &EngineConfig) -> Result<U256> {
    let price = scaled_price(price, config)?;
    safe_mul_div(price, amount, config.precision_u256(), "usd value")
}

/// Token amount worth `usd`: `usd * 10^18 / (price * 10^10)`
pub fn from_usd(price: U256, usd: U256, config: &EngineConfig) -> Result<U256> {
    let price = scaled_price(price, config)?;
    safe_mul_div(usd, config.precision_u256(), price, "token amount")
}
