//! Collateral token transfers.
//!
//! [`TokenBank`] is the engine's view of the collateral tokens: a set of
//! fungible tokens addressed by token id. Transfers return `Ok(false)` for a
//! soft failure and `Err` when the token reverts.

use primitive_types::U256;
use std::collections::HashMap;

use crate::token::erc20::Erc20Balances;
use crate::token::transaction::{Journal, Transactional};
use crate::token::TokenError;
use crate::utils::address::Address;

/// Fungible collateral tokens the engine pulls from and pushes to
pub trait TokenBank: Transactional {
    /// Balance of `owner` in `token`
    fn balance_of(&self, token: &Address, owner: &Address) -> U256;

    /// Allowance of `spender` over `owner`'s `token` balance
    fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> U256;

    /// Let `spender` move up to `amount` of `owner`'s `token`
    fn approve(
        &self,
        token: &Address,
        owner: &Address,
        spender: &Address,
        amount: U256,
    ) -> Result<bool, TokenError>;

    /// Move `amount` of `token` from `from` to `to`, called by `from`
    fn transfer(
        &self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<bool, TokenError>;

    /// Move `amount` of `token` from `from` to `to` using `spender`'s allowance
    fn transfer_from(
        &self,
        token: &Address,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<bool, TokenError>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// IN-MEMORY BANK
// ═══════════════════════════════════════════════════════════════════════════════

/// In-memory multi-token bank
#[derive(Debug, Default)]
pub struct InMemoryTokenBank {
    tokens: Journal<HashMap<Address, Erc20Balances>>,
}

impl InMemoryTokenBank {
    /// Create a bank with no tokens
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bank that knows the given tokens
    pub fn with_tokens(tokens: &[Address]) -> Self {
        let bank = Self::new();
        for token in tokens {
            bank.add_token(*token);
        }
        bank
    }

    /// Register a token with empty balances
    pub fn add_token(&self, token: Address) {
        self.tokens.write().entry(token).or_default();
    }

    /// Create `amount` of `token` for `to` (test and simulation setup)
    pub fn mint_to(&self, token: &Address, to: &Address, amount: U256) -> Result<(), TokenError> {
        let mut tokens = self.tokens.write();
        let balances = tokens.get_mut(token).ok_or(TokenError::UnknownToken(*token))?;
        balances.mint(to, amount)
    }

    /// Total supply of `token`
    pub fn total_supply(&self, token: &Address) -> U256 {
        self.tokens
            .read()
            .get(token)
            .map(Erc20Balances::total_supply)
            .unwrap_or_default()
    }

    fn with_token<R>(
        &self,
        token: &Address,
        f: impl FnOnce(&mut Erc20Balances) -> Result<R, TokenError>,
    ) -> Result<R, TokenError> {
        let mut tokens = self.tokens.write();
        let balances = tokens.get_mut(token).ok_or(TokenError::UnknownToken(*token))?;
        f(balances)
    }
}

impl Transactional for InMemoryTokenBank {
    fn begin(&self) {
        self.tokens.begin();
    }

    fn commit(&self) {
        self.tokens.commit();
    }

    fn rollback(&self) {
        self.tokens.rollback();
    }
}

impl TokenBank for InMemoryTokenBank {
    fn balance_of(&self, token: &Address, owner: &Address) -> U256 {
        self.tokens
            .read()
            .get(token)
            .map(|balances| balances.balance_of(owner))
            .unwrap_or_default()
    }

    fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> U256 {
        self.tokens
            .read()
            .get(token)
            .map(|balances| balances.allowance(owner, spender))
            .unwrap_or_default()
    }

    fn approve(
        &self,
        token: &Address,
        owner: &Address,
        spender: &Address,
        amount: U256,
    ) -> Result<bool, TokenError> {
        self.with_token(token, |balances| {
            balances.approve(owner, spender, amount);
            Ok(true)
        })
    }

    fn transfer(
        &self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<bool, TokenError> {
        self.with_token(token, |balances| balances.transfer(from, to, amount).map(|_| true))
    }

    fn transfer_from(
        &self,
        token: &Address,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<bool, TokenError> {
        self.with_token(token, |balances| {
            balances.transfer_from(spender, from, to, amount).map(|_| true)
        })
    }
}
