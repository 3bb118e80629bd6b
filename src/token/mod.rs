//! External token collaborators.
//!
//! The engine moves collateral through a [`TokenBank`] and issues debt through
//! a [`Stablecoin`]. Both are external to the engine: it only relies on their
//! boolean success signalling, on reverts surfacing as [`TokenError`], and on
//! their participation in the host transaction ([`Transactional`]).
//!
//! In-memory implementations are provided for tests and simulations.

pub mod bank;
pub mod erc20;
pub mod stablecoin;
pub mod transaction;

pub use bank::*;
pub use erc20::*;
pub use stablecoin::*;
pub use transaction::*;

use primitive_types::U256;
use thiserror::Error;

use crate::utils::address::Address;

/// Revert raised inside a token collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Sender balance too low
    #[error("insufficient balance for {owner}: balance {balance}, needed {needed}")]
    InsufficientBalance {
        /// Account being debited
        owner: Address,
        /// Current balance
        balance: U256,
        /// Amount requested
        needed: U256,
    },

    /// Spender allowance too low
    #[error("insufficient allowance for {spender}: allowance {allowance}, needed {needed}")]
    InsufficientAllowance {
        /// Account spending on behalf of the owner
        spender: Address,
        /// Current allowance
        allowance: U256,
        /// Amount requested
        needed: U256,
    },

    /// Transfer or mint to the zero address
    #[error("recipient cannot be the zero address")]
    NotZeroAddress,

    /// Mint or burn amount of zero
    #[error("amount must be more than zero")]
    MustBeMoreThanZero,

    /// Burn larger than the caller's balance
    #[error("burn amount exceeds balance")]
    BurnAmountExceedsBalance,

    /// Owner-gated call from another account
    #[error("caller {0} is not the owner")]
    NotOwner(Address),

    /// Unknown token in a multi-token bank
    #[error("unknown token {0}")]
    UnknownToken(Address),

    /// Balance or supply overflow
    #[error("token arithmetic overflow")]
    Overflow,
}
