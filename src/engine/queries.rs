//! Read-only views of the engine.
//!
//! Queries never mutate. Price-dependent ones go through the staleness gate
//! and fail with [`Error::StaleData`](crate::error::Error::StaleData) rather
//! than report a value computed from an untrusted price.

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::core::config::EngineConfig;
use crate::core::health::{calculate_health_factor, HealthFactor};
use crate::engine::conversion::{from_usd, to_usd};
use crate::engine::dsc_engine::DscEngine;
use crate::error::Result;
use crate::events::EngineEvent;
use crate::utils::address::Address;
use crate::utils::math::safe_add;

/// Debt and collateral value of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInformation {
    /// Stablecoin issued and not repaid
    pub total_dsc_minted: U256,
    /// USD value of all deposited collateral, 18 decimals
    pub collateral_value_usd: U256,
}

/// Custody value against issued supply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvencyReport {
    /// USD value of the tokens the engine holds
    pub custody_value_usd: U256,
    /// USD value of the recorded collateral positions
    pub ledger_value_usd: U256,
    /// Stablecoin total supply
    pub total_supply: U256,
    /// Sum of recorded debt
    pub total_debt: U256,
}

impl SolvencyReport {
    /// Custody covers supply
    pub fn is_solvent(&self) -> bool {
        self.custody_value_usd >= self.total_supply
    }
}

impl DscEngine {
    /// Debt and collateral USD value of `account`
    pub fn account_information(&self, account: &Address) -> Result<AccountInformation> {
        let total_dsc_minted = self.debt_of(account);
        let collateral_value_usd = self.account_collateral_value(account)?;
        Ok(AccountInformation {
            total_dsc_minted,
            collateral_value_usd,
        })
    }

    /// Current health factor of `account`
    pub fn health_factor(&self, account: &Address) -> Result<HealthFactor> {
        let info = self.account_information(account)?;
        self.calculate_health_factor(info.total_dsc_minted, info.collateral_value_usd)
    }

    /// Health factor of a hypothetical position
    pub fn calculate_health_factor(&self, debt: U256, collateral_value_usd: U256) -> Result<HealthFactor> {
        calculate_health_factor(
            debt,
            collateral_value_usd,
            self.config.threshold(),
            self.config.liquidation_denominator(),
            self.config.precision_u256(),
        )
    }

    /// USD value of every collateral position of `account`.
    ///
    /// Every registered feed is read, even for tokens the account never
    /// deposited, so one stale feed freezes the whole valuation.
    pub fn account_collateral_value(&self, account: &Address) -> Result<U256> {
        let mut total = U256::zero();
        for token in self.registry.tokens() {
            let amount = self.collateral_balance_of(account, token);
            total = safe_add(total, self.usd_value(token, amount)?, "collateral value")?;
        }
        Ok(total)
    }

    /// USD value of `amount` of `token`
    pub fn usd_value(&self, token: &Address, amount: U256) -> Result<U256> {
        let feed = self.registry.price_feed(token)?;
        let reading = self.oracle.latest_price(&feed)?;
        to_usd(reading.price, amount, &self.config)
    }

    /// Amount of `token` worth `usd_amount`
    pub fn token_amount_from_usd(&self, token: &Address, usd_amount: U256) -> Result<U256> {
        let feed = self.registry.price_feed(token)?;
        let reading = self.oracle.latest_price(&feed)?;
        from_usd(reading.price, usd_amount, &self.config)
    }

    /// Recorded collateral of `account` in `token`
    pub fn collateral_balance_of(&self, account: &Address, token: &Address) -> U256 {
        self.state.borrow().collateral.balance_of(account, token)
    }

    /// Recorded debt of `account`
    pub fn debt_of(&self, account: &Address) -> U256 {
        self.state.borrow().debt.debt_of(account)
    }

    /// Registered collateral tokens, in registration order
    pub fn collateral_tokens(&self) -> Vec<Address> {
        self.registry.tokens().to_vec()
    }

    /// Price feed of a registered token
    pub fn collateral_token_price_feed(&self, token: &Address) -> Result<Address> {
        self.registry.price_feed(token)
    }

    /// Address of the issued stablecoin
    pub fn stablecoin(&self) -> Address {
        self.stablecoin.address()
    }

    /// Address of the engine
    pub fn address(&self) -> Address {
        self.address
    }

    /// Risk and oracle parameters
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Accounts that ever held collateral or debt
    pub fn accounts(&self) -> Vec<Address> {
        let state = self.state.borrow();
        let mut accounts = state.collateral.accounts();
        accounts.extend(state.debt.accounts());
        accounts.sort();
        accounts.dedup();
        accounts
    }

    /// Custody and ledger value against issued supply
    pub fn protocol_solvency(&self) -> Result<SolvencyReport> {
        let mut custody_value_usd = U256::zero();
        let mut ledger_value_usd = U256::zero();

        for token in self.registry.tokens() {
            let held = self.bank.balance_of(token, &self.address);
            let recorded = self.state.borrow().collateral.total_of(token);
            custody_value_usd = safe_add(custody_value_usd, self.usd_value(token, held)?, "custody value")?;
            ledger_value_usd = safe_add(ledger_value_usd, self.usd_value(token, recorded)?, "ledger value")?;
        }

        Ok(SolvencyReport {
            custody_value_usd,
            ledger_value_usd,
            total_supply: self.stablecoin.total_supply(),
            total_debt: self.state.borrow().debt.total(),
        })
    }

    /// Events of committed operations, oldest first
    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.borrow().events().to_vec()
    }

    /// Check if a mutating operation is in progress
    pub fn is_busy(&self) -> bool {
        self.guard.is_entered()
    }
}
