//! Error types for the DSC engine.
//!
//! Every failure is synchronous and total for the operation that raised it:
//! the engine discards all effects of the failed call before the error is
//! returned. [`ErrorCategory`] groups the variants by how they arise.

use primitive_types::U256;
use thiserror::Error;

use crate::core::health::HealthFactor;
use crate::token::TokenError;
use crate::utils::address::Address;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the DSC engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ═══════════════════════════════════════════════════════════════════
    // Validation Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Amount is zero
    #[error("Amount must be more than zero")]
    ZeroAmount,

    /// Token is not registered as collateral
    #[error("Token {0} is not allowed as collateral")]
    TokenNotAllowed(Address),

    /// Collateral token and price feed lists differ in length
    #[error("Token addresses and price feed addresses must be the same length: {tokens} tokens, {feeds} feeds")]
    LengthMismatch {
        /// Number of token addresses supplied
        tokens: usize,
        /// Number of price feed addresses supplied
        feeds: usize,
    },

    /// Invalid input parameter
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// Reason for invalidity
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Oracle Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Feed reading is older than the oracle timeout
    #[error("Stale price from feed {feed}: last update {age}s ago, max allowed {max_age}s")]
    StaleData {
        /// Feed that produced the reading
        feed: Address,
        /// Seconds since the reading was updated
        age: u64,
        /// Maximum allowed age in seconds
        max_age: u64,
    },

    /// Feed answered with a non-positive price
    #[error("Invalid price {answer} from feed {feed}")]
    InvalidPrice {
        /// Feed that produced the reading
        feed: Address,
        /// Raw 8-decimal answer
        answer: i128,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Invariant Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Health factor below the minimum after a mutation
    #[error("Health factor {0} is below the minimum")]
    BadHealthFactor(HealthFactor),

    /// Liquidation attempted on a healthy account
    #[error("Health factor {0} is ok, account cannot be liquidated")]
    HealthFactorOk(HealthFactor),

    /// Liquidation did not improve the target's health factor
    #[error("Health factor not improved: started at {starting}, ended at {ending}")]
    HealthFactorNotImproved {
        /// Health factor before liquidation
        starting: HealthFactor,
        /// Health factor after liquidation
        ending: HealthFactor,
    },

    /// Attempt to remove more collateral than the position holds
    #[error("Insufficient collateral for {account} in {token}: requested {requested}, available {available}")]
    InsufficientCollateral {
        /// Position owner
        account: Address,
        /// Collateral token
        token: Address,
        /// Requested amount
        requested: U256,
        /// Recorded amount
        available: U256,
    },

    /// Attempt to repay more debt than the position holds
    #[error("Insufficient debt for {account}: requested {requested}, available {available}")]
    InsufficientDebt {
        /// Position owner
        account: Address,
        /// Requested amount
        requested: U256,
        /// Recorded amount
        available: U256,
    },

    // ═══════════════════════════════════════════════════════════════════
    // External Call Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Token transfer reported failure
    #[error("Transfer of token {token} failed")]
    TransferFailed {
        /// Token being moved
        token: Address,
    },

    /// Stablecoin mint reported failure
    #[error("Stablecoin mint failed")]
    MintFailed,

    /// Collaborator reverted
    #[error("Token call reverted: {0}")]
    Token(#[from] TokenError),

    // ═══════════════════════════════════════════════════════════════════
    // Execution Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Nested entry into a guarded operation
    #[error("Reentrant call rejected")]
    Reentrancy,

    /// Overflow in calculation
    #[error("Arithmetic overflow in {operation}")]
    Overflow {
        /// Operation that overflowed
        operation: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Coarse classification of failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rejected before any mutation
    Validation,
    /// Rejected after a tentative mutation, which is rolled back
    InvariantViolation,
    /// A collaborator reported failure
    ExternalCallFailure,
    /// Oracle reading too old or unusable
    StaleData,
    /// Nested entry into the engine
    ReentrancyViolation,
    /// Fixed-point arithmetic left the representable range
    Arithmetic,
}

impl Error {
    /// Taxonomy bucket of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::ZeroAmount
            | Error::TokenNotAllowed(_)
            | Error::LengthMismatch { .. }
            | Error::InvalidParameter { .. }
            | Error::Config(_) => ErrorCategory::Validation,
            Error::StaleData { .. } | Error::InvalidPrice { .. } => ErrorCategory::StaleData,
            Error::BadHealthFactor(_)
            | Error::HealthFactorOk(_)
            | Error::HealthFactorNotImproved { .. }
            | Error::InsufficientCollateral { .. }
            | Error::InsufficientDebt { .. } => ErrorCategory::InvariantViolation,
            Error::TransferFailed { .. } | Error::MintFailed | Error::Token(_) => {
                ErrorCategory::ExternalCallFailure
            }
            Error::Reentrancy => ErrorCategory::ReentrancyViolation,
            Error::Overflow { .. } => ErrorCategory::Arithmetic,
        }
    }

    /// Returns true if resubmitting the call could succeed without a code change
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::StaleData { .. }
                | Error::BadHealthFactor(_)
                | Error::HealthFactorOk(_)
                | Error::InsufficientCollateral { .. }
                | Error::InsufficientDebt { .. }
                | Error::TransferFailed { .. }
                | Error::Token(_)
                | Error::Reentrancy
        )
    }

    /// Returns the error code for external systems
    pub fn code(&self) -> u32 {
        match self {
            // Validation errors: 1xxx
            Error::ZeroAmount => 1001,
            Error::TokenNotAllowed(_) => 1002,
            Error::LengthMismatch { .. } => 1003,
            Error::InvalidParameter { .. } => 1004,
            Error::Config(_) => 1005,

            // Oracle errors: 2xxx
            Error::StaleData { .. } => 2001,
            Error::InvalidPrice { .. } => 2002,

            // Invariant errors: 3xxx
            Error::BadHealthFactor(_) => 3001,
            Error::HealthFactorOk(_) => 3002,
            Error::HealthFactorNotImproved { .. } => 3003,
            Error::InsufficientCollateral { .. } => 3004,
            Error::InsufficientDebt { .. } => 3005,

            // External call errors: 4xxx
            Error::TransferFailed { .. } => 4001,
            Error::MintFailed => 4002,
            Error::Token(_) => 4003,

            // Execution errors: 9xxx
            Error::Reentrancy => 9001,
            Error::Overflow { .. } => 9002,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_unique() {
        let codes = vec![
            Error::ZeroAmount.code(),
            Error::TokenNotAllowed(Address::ZERO).code(),
            Error::LengthMismatch { tokens: 1, feeds: 2 }.code(),
            Error::StaleData { feed: Address::ZERO, age: 0, max_age: 0 }.code(),
            Error::BadHealthFactor(HealthFactor::MAX).code(),
            Error::HealthFactorOk(HealthFactor::MAX).code(),
            Error::TransferFailed { token: Address::ZERO }.code(),
            Error::MintFailed.code(),
            Error::Reentrancy.code(),
            Error::Overflow { operation: "".into() }.code(),
        ];

        let mut unique_codes = codes.clone();
        unique_codes.sort();
        unique_codes.dedup();

        assert_eq!(codes.len(), unique_codes.len(), "Error codes must be unique");
    }

    #[test]
    fn test_error_display() {
        let err = Error::LengthMismatch { tokens: 2, feeds: 1 };
        assert!(err.to_string().contains("2 tokens"));
        assert!(err.to_string().contains("1 feeds"));
    }

    #[test]
    fn test_categories() {
        assert_eq!(Error::ZeroAmount.category(), ErrorCategory::Validation);
        assert_eq!(
            Error::BadHealthFactor(HealthFactor::ZERO).category(),
            ErrorCategory::InvariantViolation
        );
        assert_eq!(
            Error::TransferFailed { token: Address::ZERO }.category(),
            ErrorCategory::ExternalCallFailure
        );
        assert_eq!(
            Error::StaleData { feed: Address::ZERO, age: 10_801, max_age: 10_800 }.category(),
            ErrorCategory::StaleData
        );
        assert_eq!(Error::Reentrancy.category(), ErrorCategory::ReentrancyViolation);
    }

    #[test]
    fn test_is_recoverable() {
        assert!(Error::Reentrancy.is_recoverable());
        assert!(!Error::ZeroAmount.is_recoverable());
        assert!(!Error::LengthMismatch { tokens: 0, feeds: 1 }.is_recoverable());
    }
}
