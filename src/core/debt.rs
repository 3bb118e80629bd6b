//! Debt ledger.
//!
//! Records how much of the stablecoin each account has minted and not yet
//! repaid. Minting accumulates onto the existing debt; repayment decrements it
//! and can never take it below zero.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::utils::address::Address;
use crate::utils::math::safe_add;

/// Per-account outstanding debt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtLedger {
    positions: BTreeMap<Address, U256>,
}

impl DebtLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Outstanding debt of `account`
    pub fn debt_of(&self, account: &Address) -> U256 {
        self.positions.get(account).copied().unwrap_or_default()
    }

    /// Add newly minted debt, returning the new total
    pub fn increase(&mut self, account: &Address, amount: U256) -> Result<U256> {
        let position = self.positions.entry(*account).or_default();
        *position = safe_add(*position, amount, "debt increase")?;

        tracing::debug!(account = %account.short(), %amount, total = %*position, "debt increased");
        Ok(*position)
    }

    /// Remove repaid debt, failing if the account owes less than `amount`
    pub fn decrease(&mut self, account: &Address, amount: U256) -> Result<U256> {
        let available = self.debt_of(account);
        let remaining = available.checked_sub(amount).ok_or(Error::InsufficientDebt {
            account: *account,
            requested: amount,
            available,
        })?;

        self.positions.insert(*account, remaining);

        tracing::debug!(account = %account.short(), %amount, total = %remaining, "debt decreased");
        Ok(remaining)
    }

    /// Sum of all outstanding debt
    pub fn total(&self) -> U256 {
        self.positions
            .values()
            .fold(U256::zero(), |acc, debt| acc.saturating_add(*debt))
    }

    /// Accounts with a debt position
    pub fn accounts(&self) -> Vec<Address> {
        self.positions.keys().copied().collect()
    }
}
