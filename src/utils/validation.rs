//! Input validation helpers.
//!
//! Validation runs before any mutation, so a rejected call leaves no trace.

use primitive_types::U256;

use crate::error::{Error, Result};
use crate::utils::address::Address;

/// Validate that an amount is non-zero
pub fn validate_non_zero(amount: U256) -> Result<()> {
    if amount.is_zero() {
        return Err(Error::ZeroAmount);
    }
    Ok(())
}

/// Validate that an address is not the null address
pub fn validate_address(address: &Address, name: &str) -> Result<()> {
    if address.is_zero() {
        return Err(Error::InvalidParameter {
            name: name.into(),
            reason: "cannot be the zero address".into(),
        });
    }
    Ok(())
}
