//! Fungible balance and allowance bookkeeping.
//!
//! A single token's balances, allowances and supply with standard
//! fungible-token semantics. Shared by the in-memory bank and stablecoin.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::token::TokenError;
use crate::utils::address::Address;

/// Balances, allowances and supply of one token
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Erc20Balances {
    total_supply: U256,
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
}

impl Erc20Balances {
    /// Create an empty token
    pub fn new() -> Self {
        Self::default()
    }

    /// Total supply
    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Balance of an address
    pub fn balance_of(&self, owner: &Address) -> U256 {
        self.balances.get(owner).copied().unwrap_or_default()
    }

    /// Remaining allowance of `spender` over `owner`'s balance
    pub fn allowance(&self, owner: &Address, spender: &Address) -> U256 {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default()
    }

    /// Set `spender`'s allowance over `owner`'s balance
    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: U256) {
        self.allowances.insert((*owner, *spender), amount);
    }

    /// Move `amount` from `from` to `to`
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: U256) -> Result<(), TokenError> {
        if to.is_zero() {
            return Err(TokenError::NotZeroAddress);
        }

        let from_balance = self.balance_of(from);
        let remaining = from_balance
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance {
                owner: *from,
                balance: from_balance,
                needed: amount,
            })?;
        self.balances.insert(*from, remaining);

        let to_balance = self.balance_of(to);
        let credited = to_balance.checked_add(amount).ok_or(TokenError::Overflow)?;
        self.balances.insert(*to, credited);

        Ok(())
    }

    /// Spend `spender`'s allowance to move `amount` from `from` to `to`.
    ///
    /// An allowance of `U256::MAX` is treated as unlimited and not decremented.
    pub fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<(), TokenError> {
        let allowance = self.allowance(from, spender);
        if allowance != U256::MAX {
            let remaining = allowance
                .checked_sub(amount)
                .ok_or(TokenError::InsufficientAllowance {
                    spender: *spender,
                    allowance,
                    needed: amount,
                })?;
            self.transfer(from, to, amount)?;
            self.allowances.insert((*from, *spender), remaining);
            return Ok(());
        }

        self.transfer(from, to, amount)
    }

    /// Create `amount` new tokens for `to`
    pub fn mint(&mut self, to: &Address, amount: U256) -> Result<(), TokenError> {
        if to.is_zero() {
            return Err(TokenError::NotZeroAddress);
        }

        let supply = self.total_supply.checked_add(amount).ok_or(TokenError::Overflow)?;
        let balance = self.balance_of(to).checked_add(amount).ok_or(TokenError::Overflow)?;

        self.total_supply = supply;
        self.balances.insert(*to, balance);
        Ok(())
    }

    /// Destroy `amount` of `from`'s tokens
    pub fn burn(&mut self, from: &Address, amount: U256) -> Result<(), TokenError> {
        let balance = self.balance_of(from);
        let remaining = balance
            .checked_sub(amount)
            .ok_or(TokenError::BurnAmountExceedsBalance)?;

        self.balances.insert(*from, remaining);
        self.total_supply = self.total_supply.saturating_sub(amount);
        Ok(())
    }

    /// Verify supply invariant (total_supply == sum of all balances)
    pub fn verify_supply_invariant(&self) -> bool {
        let sum = self
            .balances
            .values()
            .fold(U256::zero(), |acc, b| acc.saturating_add(*b));
        sum == self.total_supply
    }
}
