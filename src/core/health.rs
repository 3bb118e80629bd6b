//! Health factor calculation.
//!
//! The health factor is an 18-decimal ratio of threshold-adjusted collateral
//! value to outstanding debt. At or above 1.0 an account is safe; below it the
//! account can be liquidated. An account without debt has the maximum health
//! factor and can never be liquidated.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::utils::math::{format_wad, safe_mul, safe_mul_div};

// ═══════════════════════════════════════════════════════════════════════════════
// HEALTH FACTOR
// ═══════════════════════════════════════════════════════════════════════════════

/// 18-decimal fixed-point health factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HealthFactor(U256);

impl HealthFactor {
    /// Zero (fully insolvent)
    pub const ZERO: Self = Self(U256([0, 0, 0, 0]));

    /// Largest representable value, assigned to debt-free accounts
    pub const MAX: Self = Self(U256::MAX);

    /// Wrap a raw 18-decimal value
    pub const fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    /// Raw 18-decimal value
    pub fn raw(&self) -> U256 {
        self.0
    }

    /// Check against a minimum (inclusive)
    pub fn is_healthy(&self, min: HealthFactor) -> bool {
        *self >= min
    }

    /// True for debt-free accounts
    pub fn is_unbounded(&self) -> bool {
        *self == Self::MAX
    }
}

impl fmt::Display for HealthFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unbounded() {
            write!(f, "max")
        } else {
            write!(f, "{}", format_wad(self.0))
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CALCULATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Compute the health factor of a position.
///
/// `(collateral_usd * threshold / liquidation_precision) * scale / debt`,
/// or [`HealthFactor::MAX`] when `debt` is zero. `scale` must be the same
/// fixed-point precision the USD values were computed in.
pub fn calculate_health_factor(
    debt: U256,
    collateral_usd: U256,
    threshold: U256,
    liquidation_precision: U256,
    scale: U256,
) -> Result<HealthFactor> {
    if debt.is_zero() {
        return Ok(HealthFactor::MAX);
    }

    let adjusted = safe_mul_div(
        collateral_usd,
        threshold,
        liquidation_precision,
        "threshold-adjusted collateral",
    )?;
    let ratio = safe_mul(adjusted, scale, "health factor")? / debt;

    Ok(HealthFactor(ratio))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::math::{precision, wad, wad_from_hundredths};

    fn hf(debt: U256, usd: U256) -> HealthFactor {
        calculate_health_factor(debt, usd, U256::from(50u64), U256::from(100u64), precision()).unwrap()
    }

    #[test]
    fn test_zero_debt_is_max() {
        assert_eq!(hf(U256::zero(), wad(1)), HealthFactor::MAX);
        assert_eq!(hf(U256::zero(), U256::zero()), HealthFactor::MAX);
    }

    #[test]
    fn test_healthy_position() {
        // $20,000 collateral against $8,000 debt
        let factor = hf(wad(8_000), wad(20_000));
        assert_eq!(factor.raw(), wad_from_hundredths(125));
        assert!(factor.is_healthy(HealthFactor::from_raw(wad(1))));
    }

    #[test]
    fn test_liquidatable_position() {
        // Price fell: $5,000 collateral against $8,000 debt
        let factor = hf(wad(8_000), wad(5_000));
        assert_eq!(factor.raw(), wad_from_hundredths(3125) / U256::from(100u64));
        assert!(!factor.is_healthy(HealthFactor::from_raw(wad(1))));
    }

    #[test]
    fn test_exactly_double_collateral_is_one() {
        assert_eq!(hf(wad(100), wad(200)).raw(), wad(1));
    }

    #[test]
    fn test_display() {
        assert_eq!(HealthFactor::MAX.to_string(), "max");
        assert_eq!(hf(wad(8_000), wad(20_000)).to_string(), "1.25");
    }
}
