//! Fixed-point arithmetic helpers.
//!
//! Amounts, USD values and health factors are 18-decimal fixed-point numbers
//! held in `U256`. Every operation that can overflow is checked and reports
//! [`Error::Overflow`] instead of wrapping.

use primitive_types::U256;
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::utils::constants::PRECISION;

// ═══════════════════════════════════════════════════════════════════════════════
// CONSTRUCTORS
// ═══════════════════════════════════════════════════════════════════════════════

/// One whole unit in 18-decimal fixed point
pub fn precision() -> U256 {
    U256::from(PRECISION)
}

/// Scale a whole number of units to 18 decimals (`units * 10^18`)
pub fn wad(units: u64) -> U256 {
    U256::from(units) * precision()
}

/// Scale a fractional number of units, given in hundredths, to 18 decimals
pub fn wad_from_hundredths(hundredths: u64) -> U256 {
    U256::from(hundredths) * precision() / U256::from(100u64)
}

// ═══════════════════════════════════════════════════════════════════════════════
// SAFE ARITHMETIC OPERATIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Safe addition with overflow check
pub fn safe_add(a: U256, b: U256, operation: &str) -> Result<U256> {
    a.checked_add(b).ok_or_else(|| Error::Overflow {
        operation: operation.into(),
    })
}

/// Safe multiplication with overflow check
pub fn safe_mul(a: U256, b: U256, operation: &str) -> Result<U256> {
    a.checked_mul(b).ok_or_else(|| Error::Overflow {
        operation: operation.into(),
    })
}

/// Computes `(a * b) / c`, truncating, with an overflow check on the product
pub fn safe_mul_div(a: U256, b: U256, c: U256, operation: &str) -> Result<U256> {
    if c.is_zero() {
        return Err(Error::InvalidParameter {
            name: "divisor".into(),
            reason: format!("division by zero in {}", operation),
        });
    }
    Ok(safe_mul(a, b, operation)? / c)
}

// ═══════════════════════════════════════════════════════════════════════════════
// FORMATTING
// ═══════════════════════════════════════════════════════════════════════════════

/// Render an 18-decimal value as a decimal string (`15000000000000000000` → `15`).
///
/// The integer and fractional parts are split in `U256`, so every value keeps
/// its unit however wide it is.
pub fn format_wad(value: U256) -> String {
    let (whole, fraction) = value.div_mod(precision());
    if fraction.is_zero() {
        return whole.to_string();
    }

    let digits = format!("{:018}", fraction.as_u128());
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

/// Parse a decimal string (`"2000.5"`) into an 18-decimal value
pub fn parse_wad(text: &str) -> Result<U256> {
    let invalid = |reason: String| Error::InvalidParameter {
        name: "amount".into(),
        reason,
    };

    let decimal: Decimal = text
        .trim()
        .parse()
        .map_err(|e: rust_decimal::Error| invalid(e.to_string()))?;
    if decimal.is_sign_negative() {
        return Err(invalid(format!("{} is negative", text)));
    }
    if decimal.scale() > 18 {
        return Err(invalid(format!("{} has more than 18 decimals", text)));
    }

    let mantissa = decimal.mantissa() as u128;
    let scale_up = 10u128.pow(18 - decimal.scale());
    safe_mul(U256::from(mantissa), U256::from(scale_up), "parse_wad")
}
