//! Scenario simulation.
//!
//! A scenario is a JSON file describing collateral tokens with their prices,
//! funded accounts and a list of steps. [`Simulation`] wires an engine to
//! in-memory collaborators, runs every step and reports the outcome of each
//! along with the final state of every account.
//!
//! ```json
//! {
//!   "start_time": 1700000000,
//!   "tokens": [{ "symbol": "weth", "price": "2000" }],
//!   "accounts": [{ "name": "alice", "balances": { "weth": "10" } }],
//!   "steps": [
//!     { "action": "deposit-and-mint", "account": "alice", "token": "weth",
//!       "collateral": "10", "mint": "8000" },
//!     { "action": "set-price", "token": "weth", "price": "500" }
//!   ]
//! }
//! ```

use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;

use crate::core::config::EngineConfig;
use crate::core::health::HealthFactor;
use crate::engine::dsc_engine::{Collaborators, DscEngine};
use crate::engine::queries::SolvencyReport;
use crate::error::Error;
use crate::oracle::feed::InMemoryPriceOracle;
use crate::token::bank::{InMemoryTokenBank, TokenBank};
use crate::token::stablecoin::{InMemoryStablecoin, Stablecoin};
use crate::token::TokenError;
use crate::utils::address::Address;
use crate::utils::constants::FEED_DECIMALS;
use crate::utils::math::{format_wad, parse_wad};
use crate::utils::time::{Clock, ManualClock};

// ═══════════════════════════════════════════════════════════════════════════════
// SCENARIO FILE
// ═══════════════════════════════════════════════════════════════════════════════

/// A collateral token and its starting price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSpec {
    /// Symbol, also used to derive the token and feed addresses
    pub symbol: String,
    /// USD price as a decimal string
    pub price: String,
}

/// A funded account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSpec {
    /// Account name, also used to derive its address
    pub name: String,
    /// Starting token balances by symbol, decimal strings
    #[serde(default)]
    pub balances: BTreeMap<String, String>,
}

/// One simulated call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    /// Deposit collateral
    Deposit {
        /// Caller
        account: String,
        /// Token symbol
        token: String,
        /// Amount
        amount: String,
    },
    /// Deposit collateral and mint in one call
    DepositAndMint {
        /// Caller
        account: String,
        /// Token symbol
        token: String,
        /// Collateral amount
        collateral: String,
        /// Stablecoin amount
        mint: String,
    },
    /// Mint stablecoin
    Mint {
        /// Caller
        account: String,
        /// Amount
        amount: String,
    },
    /// Repay stablecoin
    Burn {
        /// Caller
        account: String,
        /// Amount
        amount: String,
    },
    /// Withdraw collateral
    Redeem {
        /// Caller
        account: String,
        /// Token symbol
        token: String,
        /// Amount
        amount: String,
    },
    /// Repay stablecoin and withdraw collateral in one call
    RedeemForDsc {
        /// Caller
        account: String,
        /// Token symbol
        token: String,
        /// Collateral amount
        collateral: String,
        /// Stablecoin amount
        burn: String,
    },
    /// Publish a new price
    SetPrice {
        /// Token symbol
        token: String,
        /// USD price
        price: String,
    },
    /// Move the clock forward
    AdvanceTime {
        /// Seconds to advance
        seconds: u64,
    },
    /// Liquidate an account
    Liquidate {
        /// Caller repaying the debt
        liquidator: String,
        /// Collateral token symbol to seize
        token: String,
        /// Account liquidated
        target: String,
        /// Debt to cover
        debt: String,
    },
}

impl Step {
    /// Kebab-case action name
    pub fn action(&self) -> &'static str {
        match self {
            Step::Deposit { .. } => "deposit",
            Step::DepositAndMint { .. } => "deposit-and-mint",
            Step::Mint { .. } => "mint",
            Step::Burn { .. } => "burn",
            Step::Redeem { .. } => "redeem",
            Step::RedeemForDsc { .. } => "redeem-for-dsc",
            Step::SetPrice { .. } => "set-price",
            Step::AdvanceTime { .. } => "advance-time",
            Step::Liquidate { .. } => "liquidate",
        }
    }
}

/// Complete scenario file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Clock value at the start, unix seconds
    #[serde(default = "default_start_time")]
    pub start_time: u64,
    /// Engine parameters; defaults when omitted
    #[serde(default)]
    pub config: EngineConfig,
    /// Collateral tokens
    pub tokens: Vec<TokenSpec>,
    /// Funded accounts
    #[serde(default)]
    pub accounts: Vec<AccountSpec>,
    /// Steps to run, in order
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_start_time() -> u64 {
    1_700_000_000
}

impl Scenario {
    /// Load a scenario from a JSON file
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(|e| ScenarioError::Io(e.to_string()))?;
        Self::from_json(&content)
    }

    /// Parse a scenario from JSON text
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        serde_json::from_str(json).map_err(|e| ScenarioError::Parse(e.to_string()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Failure to set up or drive a simulation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScenarioError {
    /// File could not be read
    #[error("IO error: {0}")]
    Io(String),
    /// File is not a valid scenario
    #[error("Parse error: {0}")]
    Parse(String),
    /// Step names an account the scenario does not declare
    #[error("unknown account '{0}'")]
    UnknownAccount(String),
    /// Step names a token the scenario does not declare
    #[error("unknown token '{0}'")]
    UnknownToken(String),
    /// Amount or price is not a valid decimal
    #[error("invalid value '{value}': {reason}")]
    InvalidValue {
        /// Offending text
        value: String,
        /// Reason
        reason: String,
    },
    /// Engine rejected the setup
    #[error(transparent)]
    Engine(#[from] Error),
    /// Funding an account failed
    #[error(transparent)]
    Token(#[from] TokenError),
}

// ═══════════════════════════════════════════════════════════════════════════════
// REPORT
// ═══════════════════════════════════════════════════════════════════════════════

/// Outcome of one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Position in the scenario, starting at 1
    pub index: usize,
    /// Action name
    pub action: String,
    /// Whether the step succeeded
    pub ok: bool,
    /// Extra information on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Error message on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Final state of one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountReport {
    /// Account name
    pub name: String,
    /// Derived address
    pub address: Address,
    /// Recorded debt
    pub debt: String,
    /// Stablecoin wallet balance
    pub dsc_balance: String,
    /// Collateral value in USD, or the error preventing valuation
    pub collateral_value_usd: String,
    /// Health factor, or the error preventing computation
    pub health_factor: String,
    /// Whether the account can be liquidated
    pub liquidatable: bool,
}

/// Full simulation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Per-step outcomes
    pub steps: Vec<StepReport>,
    /// Final account table
    pub accounts: Vec<AccountReport>,
    /// Protocol solvency, if prices allowed computing it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solvency: Option<SolvencyReport>,
}

impl SimulationReport {
    /// Number of failed steps
    pub fn failures(&self) -> usize {
        self.steps.iter().filter(|s| !s.ok).count()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SIMULATION
// ═══════════════════════════════════════════════════════════════════════════════

/// An engine wired to in-memory collaborators
pub struct Simulation {
    engine: Rc<DscEngine>,
    bank: Rc<InMemoryTokenBank>,
    stablecoin: Rc<InMemoryStablecoin>,
    oracle: Rc<InMemoryPriceOracle>,
    clock: Rc<ManualClock>,
    tokens: BTreeMap<String, (Address, Address)>,
    accounts: Vec<(String, Address)>,
}

impl Simulation {
    /// Build the engine and fund the accounts
    pub fn new(scenario: &Scenario) -> Result<Self, ScenarioError> {
        let engine_address = Address::from_label("dsc-engine");
        let clock = Rc::new(ManualClock::new(scenario.start_time));
        let oracle = Rc::new(InMemoryPriceOracle::new());
        let stablecoin = Rc::new(InMemoryStablecoin::new(Address::from_label("dsc"), engine_address));

        let mut tokens = BTreeMap::new();
        let mut token_addresses = Vec::new();
        let mut feed_addresses = Vec::new();
        for spec in &scenario.tokens {
            let token = Address::from_label(&spec.symbol);
            let feed = Address::from_label(&format!("{}-usd", spec.symbol));
            oracle.update_answer(&feed, parse_feed_price(&spec.price)?, scenario.start_time);
            tokens.insert(spec.symbol.clone(), (token, feed));
            token_addresses.push(token);
            feed_addresses.push(feed);
        }

        let bank = Rc::new(InMemoryTokenBank::with_tokens(&token_addresses));
        let engine = DscEngine::new(
            engine_address,
            &token_addresses,
            &feed_addresses,
            Collaborators {
                bank: bank.clone(),
                stablecoin: stablecoin.clone(),
                oracle: oracle.clone(),
                clock: clock.clone(),
            },
            scenario.config.clone(),
        )?;

        let mut accounts = Vec::new();
        for spec in &scenario.accounts {
            let account = Address::from_label(&spec.name);
            for (symbol, amount) in &spec.balances {
                let (token, _) = tokens
                    .get(symbol)
                    .ok_or_else(|| ScenarioError::UnknownToken(symbol.clone()))?;
                bank.mint_to(token, &account, parse_amount(amount)?)?;
            }
            for (token, _) in tokens.values() {
                bank.approve(token, &account, &engine_address, U256::MAX)?;
            }
            stablecoin.approve(&account, &engine_address, U256::MAX)?;
            accounts.push((spec.name.clone(), account));
        }

        Ok(Self {
            engine,
            bank,
            stablecoin,
            oracle,
            clock,
            tokens,
            accounts,
        })
    }

    /// The simulated engine
    pub fn engine(&self) -> &Rc<DscEngine> {
        &self.engine
    }

    /// Wallet balance of `account` in the token named `symbol`
    pub fn wallet_balance(&self, account: &str, symbol: &str) -> Result<U256, ScenarioError> {
        let account = self.account(account)?;
        let (token, _) = self.token(symbol)?;
        Ok(self.bank.balance_of(&token, &account))
    }

    /// Run every step and collect the report
    pub fn run(&self, steps: &[Step]) -> Result<SimulationReport, ScenarioError> {
        let mut reports = Vec::with_capacity(steps.len());
        for (i, step) in steps.iter().enumerate() {
            let outcome = self.apply(step)?;
            let (ok, detail, error) = match outcome {
                Ok(detail) => (true, detail, None),
                Err(err) => (false, None, Some(err.to_string())),
            };
            tracing::debug!(index = i + 1, action = step.action(), ok, "step finished");
            reports.push(StepReport {
                index: i + 1,
                action: step.action().to_string(),
                ok,
                detail,
                error,
            });
        }

        Ok(SimulationReport {
            steps: reports,
            accounts: self.account_reports(),
            solvency: self.engine.protocol_solvency().ok(),
        })
    }

    /// Apply one step. The outer error is a scenario mistake, the inner one
    /// an engine rejection.
    fn apply(&self, step: &Step) -> Result<Result<Option<String>, Error>, ScenarioError> {
        let engine = &self.engine;
        let result = match step {
            Step::Deposit { account, token, amount } => engine
                .deposit_collateral(&self.account(account)?, &self.token(token)?.0, parse_amount(amount)?)
                .map(|_| None),
            Step::DepositAndMint { account, token, collateral, mint } => engine
                .deposit_collateral_and_mint_dsc(
                    &self.account(account)?,
                    &self.token(token)?.0,
                    parse_amount(collateral)?,
                    parse_amount(mint)?,
                )
                .map(|_| None),
            Step::Mint { account, amount } => engine
                .mint_dsc(&self.account(account)?, parse_amount(amount)?)
                .map(|_| None),
            Step::Burn { account, amount } => engine
                .burn_dsc(&self.account(account)?, parse_amount(amount)?)
                .map(|_| None),
            Step::Redeem { account, token, amount } => engine
                .redeem_collateral(&self.account(account)?, &self.token(token)?.0, parse_amount(amount)?)
                .map(|_| None),
            Step::RedeemForDsc { account, token, collateral, burn } => engine
                .redeem_collateral_for_dsc(
                    &self.account(account)?,
                    &self.token(token)?.0,
                    parse_amount(collateral)?,
                    parse_amount(burn)?,
                )
                .map(|_| None),
            Step::SetPrice { token, price } => {
                let (_, feed) = self.token(token)?;
                self.oracle
                    .update_answer(&feed, parse_feed_price(price)?, self.clock.now());
                Ok(Some(format!("{} = ${}", token, price)))
            }
            Step::AdvanceTime { seconds } => {
                self.clock.advance(*seconds);
                Ok(Some(format!("now {}", self.clock.now())))
            }
            Step::Liquidate { liquidator, token, target, debt } => engine
                .liquidate(
                    &self.account(liquidator)?,
                    &self.token(token)?.0,
                    &self.account(target)?,
                    parse_amount(debt)?,
                )
                .map(|outcome| {
                    Some(format!(
                        "seized {} {} (bonus {}{}), health {} -> {}",
                        format_wad(outcome.collateral_seized),
                        token,
                        format_wad(outcome.bonus_collateral),
                        if outcome.capped { ", capped" } else { "" },
                        outcome.starting_health_factor,
                        outcome.ending_health_factor,
                    ))
                }),
        };
        Ok(result)
    }

    fn account_reports(&self) -> Vec<AccountReport> {
        let min = self.engine.config().min_health();
        self.accounts
            .iter()
            .map(|(name, address)| {
                let health: Result<HealthFactor, Error> = self.engine.health_factor(address);
                AccountReport {
                    name: name.clone(),
                    address: *address,
                    debt: format_wad(self.engine.debt_of(address)),
                    dsc_balance: format_wad(self.stablecoin.balance_of(address)),
                    collateral_value_usd: match self.engine.account_collateral_value(address) {
                        Ok(value) => format_wad(value),
                        Err(err) => err.to_string(),
                    },
                    liquidatable: matches!(&health, Ok(hf) if !hf.is_healthy(min)),
                    health_factor: match health {
                        Ok(hf) => hf.to_string(),
                        Err(err) => err.to_string(),
                    },
                }
            })
            .collect()
    }

    fn account(&self, name: &str) -> Result<Address, ScenarioError> {
        self.accounts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, address)| *address)
            .ok_or_else(|| ScenarioError::UnknownAccount(name.to_string()))
    }

    fn token(&self, symbol: &str) -> Result<(Address, Address), ScenarioError> {
        self.tokens
            .get(symbol)
            .copied()
            .ok_or_else(|| ScenarioError::UnknownToken(symbol.to_string()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PARSING
// ═══════════════════════════════════════════════════════════════════════════════

/// Parse a decimal token amount into 18-decimal fixed point
pub fn parse_amount(text: &str) -> Result<U256, ScenarioError> {
    parse_wad(text).map_err(|e| ScenarioError::InvalidValue {
        value: text.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a decimal USD price into an 8-decimal feed answer
pub fn parse_feed_price(text: &str) -> Result<i128, ScenarioError> {
    let invalid = |reason: &str| ScenarioError::InvalidValue {
        value: text.to_string(),
        reason: reason.to_string(),
    };

    let price: Decimal = text.trim().parse().map_err(|_| invalid("not a decimal number"))?;
    let scaled = price * Decimal::from(10u64.pow(u32::from(FEED_DECIMALS)));
    if scaled.fract() != Decimal::ZERO {
        return Err(invalid("more than 8 decimals"));
    }
    scaled.mantissa().checked_div(10i128.pow(scaled.scale())).ok_or_else(|| invalid("out of range"))
}
