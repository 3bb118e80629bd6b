//! Collateral ledger.
//!
//! Records, per account and per token, how much collateral has been deposited
//! and not withdrawn. Positions are created on first deposit and never removed;
//! they may fall back to zero. Custody transfers are the engine's concern, not
//! the ledger's.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::utils::address::Address;
use crate::utils::math::safe_add;

/// Per-(account, token) deposited amounts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollateralLedger {
    positions: BTreeMap<(Address, Address), U256>,
}

impl CollateralLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded amount of `token` for `account` (zero if never deposited)
    pub fn balance_of(&self, account: &Address, token: &Address) -> U256 {
        self.positions
            .get(&(*account, *token))
            .copied()
            .unwrap_or_default()
    }

    /// Increase a position, returning the new amount
    pub fn credit(&mut self, account: &Address, token: &Address, amount: U256) -> Result<U256> {
        let position = self.positions.entry((*account, *token)).or_default();
        *position = safe_add(*position, amount, "collateral credit")?;

        tracing::debug!(
            account = %account.short(),
            token = %token.short(),
            %amount,
            total = %*position,
            "collateral credited"
        );
        Ok(*position)
    }

    /// Decrease a position, failing if it holds less than `amount`
    pub fn debit(&mut self, account: &Address, token: &Address, amount: U256) -> Result<U256> {
        let available = self.balance_of(account, token);
        let remaining = available
            .checked_sub(amount)
            .ok_or(Error::InsufficientCollateral {
                account: *account,
                token: *token,
                requested: amount,
                available,
            })?;

        self.positions.insert((*account, *token), remaining);

        tracing::debug!(
            account = %account.short(),
            token = %token.short(),
            %amount,
            total = %remaining,
            "collateral debited"
        );
        Ok(remaining)
    }

    /// Check whether a position was ever opened
    pub fn has_position(&self, account: &Address, token: &Address) -> bool {
        self.positions.contains_key(&(*account, *token))
    }

    /// All positions of an account as `(token, amount)`
    pub fn positions_of(&self, account: &Address) -> Vec<(Address, U256)> {
        self.positions
            .iter()
            .filter(|((owner, _), _)| owner == account)
            .map(|((_, token), amount)| (*token, *amount))
            .collect()
    }

    /// Sum of all recorded positions in `token`
    pub fn total_of(&self, token: &Address) -> U256 {
        self.positions
            .iter()
            .filter(|((_, t), _)| t == token)
            .fold(U256::zero(), |acc, (_, amount)| acc.saturating_add(*amount))
    }

    /// Accounts holding at least one position
    pub fn accounts(&self) -> Vec<Address> {
        let mut accounts: Vec<Address> = self.positions.keys().map(|(owner, _)| *owner).collect();
        accounts.dedup();
        accounts
    }
}
