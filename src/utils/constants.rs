//! Protocol constants and magic numbers.
//!
//! All engine-wide constants are defined here for easy auditing. Values that
//! feed the 18-decimal fixed-point arithmetic are kept as `u128` so they can be
//! lifted into `U256` without loss.

// ═══════════════════════════════════════════════════════════════════════════════
// FIXED-POINT PRECISION
// ═══════════════════════════════════════════════════════════════════════════════

/// Fixed-point precision used for amounts, USD values and health factors (10^18)
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// Number of decimals carried by price feed answers
pub const FEED_DECIMALS: u8 = 8;

/// Scale applied to an 8-decimal feed answer to lift it to 18 decimals (10^10)
pub const ADDITIONAL_FEED_PRECISION: u128 = 10_000_000_000;

// ═══════════════════════════════════════════════════════════════════════════════
// LIQUIDATION PARAMETERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Share of collateral value counted toward the health factor, in percent.
/// 50 means an account must be 200% collateralized.
pub const LIQUIDATION_THRESHOLD: u128 = 50;

/// Denominator for threshold and bonus percentages
pub const LIQUIDATION_PRECISION: u128 = 100;

/// Extra collateral awarded to a liquidator over the debt covered, in percent
pub const LIQUIDATION_BONUS: u128 = 10;

/// Health factor below which an account can be liquidated (1.0 in 18 decimals)
pub const MIN_HEALTH_FACTOR: u128 = PRECISION;

// ═══════════════════════════════════════════════════════════════════════════════
// ORACLE CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum age of a feed reading before it is treated as stale (3 hours)
pub const ORACLE_TIMEOUT_SECS: u64 = 3 * 60 * 60;

// ═══════════════════════════════════════════════════════════════════════════════
// IDENTIFIERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Length of an address in bytes
pub const ADDRESS_LENGTH: usize = 20;

/// Name of the issued stablecoin
pub const DSC_NAME: &str = "DecentralizedStableCoin";

/// Ticker of the issued stablecoin
pub const DSC_SYMBOL: &str = "DSC";
