//! The DSC engine.
//!
//! Holds the collateral and debt ledgers and drives the external token
//! collaborators. Every public mutation runs inside one transaction boundary:
//! the reentrancy guard is entered first, then ledger state, the event log and
//! every transactional collaborator are checkpointed. Ledgers are mutated
//! optimistically, health is validated afterwards, and any error restores all
//! checkpoints so the failed call leaves no trace.
//!
//! The engine is shared as `Rc<DscEngine>` and mutated through `&self`. This
//! lets an untrusted collaborator hold a handle back into the engine; the guard
//! is what turns such a nested call into [`Error::Reentrancy`].

use primitive_types::U256;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::core::collateral::CollateralLedger;
use crate::core::config::EngineConfig;
use crate::core::debt::DebtLedger;
use crate::core::registry::CollateralRegistry;
use crate::engine::guard::ReentrancyGuard;
use crate::error::{Error, Result};
use crate::events::{
    CollateralDepositedEvent, CollateralRedeemedEvent, DscBurnedEvent, DscMintedEvent,
    EngineEvent, EventLog,
};
use crate::oracle::adapter::OracleAdapter;
use crate::oracle::feed::PriceOracle;
use crate::token::bank::TokenBank;
use crate::token::stablecoin::Stablecoin;
use crate::utils::address::Address;
use crate::utils::time::Clock;
use crate::utils::validation::{validate_address, validate_non_zero};

// ═══════════════════════════════════════════════════════════════════════════════
// COLLABORATORS
// ═══════════════════════════════════════════════════════════════════════════════

/// External systems the engine talks to
#[derive(Clone)]
pub struct Collaborators {
    /// Collateral tokens
    pub bank: Rc<dyn TokenBank>,
    /// Issued stablecoin; the engine must own it to mint and burn
    pub stablecoin: Rc<dyn Stablecoin>,
    /// Price feeds
    pub oracle: Rc<dyn PriceOracle>,
    /// Time source for staleness checks
    pub clock: Rc<dyn Clock>,
}

/// Ledger state restored wholesale on rollback
#[derive(Debug, Clone, Default)]
pub(super) struct EngineState {
    pub(super) collateral: CollateralLedger,
    pub(super) debt: DebtLedger,
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENGINE
// ═══════════════════════════════════════════════════════════════════════════════

/// Collateralized-debt engine issuing a USD-pegged stablecoin
pub struct DscEngine {
    pub(super) address: Address,
    pub(super) config: EngineConfig,
    pub(super) registry: CollateralRegistry,
    pub(super) bank: Rc<dyn TokenBank>,
    pub(super) stablecoin: Rc<dyn Stablecoin>,
    pub(super) oracle: OracleAdapter,
    pub(super) state: RefCell<EngineState>,
    pub(super) events: RefCell<EventLog>,
    pub(super) guard: ReentrancyGuard,
}

impl DscEngine {
    /// Create an engine at `address` accepting the given collateral tokens.
    ///
    /// `token_addresses` and `price_feed_addresses` are parallel lists.
    pub fn new(
        address: Address,
        token_addresses: &[Address],
        price_feed_addresses: &[Address],
        collaborators: Collaborators,
        config: EngineConfig,
    ) -> Result<Rc<Self>> {
        validate_address(&address, "engine")?;
        config.validate()?;
        let registry = CollateralRegistry::new(token_addresses, price_feed_addresses)?;

        let Collaborators {
            bank,
            stablecoin,
            oracle,
            clock,
        } = collaborators;

        if stablecoin.owner() != address {
            tracing::warn!(
                engine = %address,
                owner = %stablecoin.owner(),
                "engine does not own the stablecoin, minting will fail"
            );
        }

        tracing::info!(
            engine = %address,
            tokens = registry.len(),
            stablecoin = %stablecoin.address(),
            "engine created"
        );

        Ok(Rc::new(Self {
            address,
            oracle: OracleAdapter::new(oracle, clock, config.oracle_timeout_secs),
            config,
            registry,
            bank,
            stablecoin,
            state: RefCell::new(EngineState::default()),
            events: RefCell::new(EventLog::new()),
            guard: ReentrancyGuard::new(),
        }))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // PUBLIC OPERATIONS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Deposit collateral into custody
    pub fn deposit_collateral(&self, caller: &Address, token: &Address, amount: U256) -> Result<()> {
        self.atomically("deposit_collateral", |engine| {
            engine.deposit(caller, token, amount)
        })?;
        tracing::info!(account = %caller.short(), token = %token.short(), %amount, "collateral deposited");
        Ok(())
    }

    /// Deposit collateral and mint stablecoin as one unit
    pub fn deposit_collateral_and_mint_dsc(
        &self,
        caller: &Address,
        token: &Address,
        collateral_amount: U256,
        mint_amount: U256,
    ) -> Result<()> {
        self.atomically("deposit_collateral_and_mint_dsc", |engine| {
            engine.deposit(caller, token, collateral_amount)?;
            engine.mint(caller, mint_amount)
        })?;
        tracing::info!(
            account = %caller.short(),
            token = %token.short(),
            %collateral_amount,
            %mint_amount,
            "collateral deposited and stablecoin minted"
        );
        Ok(())
    }

    /// Withdraw collateral back to the caller
    pub fn redeem_collateral(&self, caller: &Address, token: &Address, amount: U256) -> Result<()> {
        self.atomically("redeem_collateral", |engine| {
            validate_non_zero(amount)?;
            engine.registry.price_feed(token)?;
            engine.redeem_from(caller, caller, token, amount)?;
            engine.assert_healthy(caller)
        })?;
        tracing::info!(account = %caller.short(), token = %token.short(), %amount, "collateral redeemed");
        Ok(())
    }

    /// Repay stablecoin, then withdraw collateral, as one unit
    pub fn redeem_collateral_for_dsc(
        &self,
        caller: &Address,
        token: &Address,
        collateral_amount: U256,
        burn_amount: U256,
    ) -> Result<()> {
        self.atomically("redeem_collateral_for_dsc", |engine| {
            validate_non_zero(collateral_amount)?;
            validate_non_zero(burn_amount)?;
            engine.registry.price_feed(token)?;
            engine.burn_from(caller, caller, burn_amount)?;
            engine.redeem_from(caller, caller, token, collateral_amount)?;
            engine.assert_healthy(caller)
        })?;
        tracing::info!(
            account = %caller.short(),
            token = %token.short(),
            %collateral_amount,
            %burn_amount,
            "collateral redeemed for stablecoin"
        );
        Ok(())
    }

    /// Mint stablecoin against deposited collateral
    pub fn mint_dsc(&self, caller: &Address, amount: U256) -> Result<()> {
        self.atomically("mint_dsc", |engine| engine.mint(caller, amount))?;
        tracing::info!(account = %caller.short(), %amount, "stablecoin minted");
        Ok(())
    }

    /// Repay the caller's own debt
    pub fn burn_dsc(&self, caller: &Address, amount: U256) -> Result<()> {
        self.atomically("burn_dsc", |engine| {
            validate_non_zero(amount)?;
            engine.burn_from(caller, caller, amount)?;
            // Repaying can only raise the health factor; checked regardless.
            engine.assert_healthy(caller)
        })?;
        tracing::info!(account = %caller.short(), %amount, "stablecoin burned");
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // TRANSACTION BOUNDARY
    // ═══════════════════════════════════════════════════════════════════════════

    /// Run `operation` under the reentrancy guard, all-or-nothing.
    ///
    /// The guard is entered before any checkpoint is taken, so a rejected
    /// nested call cannot disturb the outer operation's checkpoints.
    pub(super) fn atomically<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&Self) -> Result<T>,
    ) -> Result<T> {
        let _entered = self.guard.enter(operation)?;

        let snapshot = self.state.borrow().clone();
        let event_mark = self.events.borrow().len();
        self.bank.begin();
        self.stablecoin.begin();

        match f(self) {
            Ok(value) => {
                self.bank.commit();
                self.stablecoin.commit();
                Ok(value)
            }
            Err(err) => {
                *self.state.borrow_mut() = snapshot;
                self.events.borrow_mut().truncate(event_mark);
                self.bank.rollback();
                self.stablecoin.rollback();
                tracing::warn!(operation, error = %err, code = err.code(), "operation rolled back");
                Err(err)
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // INTERNAL PRIMITIVES
    // ═══════════════════════════════════════════════════════════════════════════

    /// Credit a position and pull the tokens into custody
    fn deposit(&self, caller: &Address, token: &Address, amount: U256) -> Result<()> {
        validate_non_zero(amount)?;
        self.registry.price_feed(token)?;

        self.state.borrow_mut().collateral.credit(caller, token, amount)?;

        tracing::debug!(token = %token.short(), from = %caller.short(), %amount, "pulling collateral");
        let success = self
            .bank
            .transfer_from(token, &self.address, caller, &self.address, amount)?;
        if !success {
            return Err(Error::TransferFailed { token: *token });
        }

        self.emit(EngineEvent::CollateralDeposited(CollateralDepositedEvent {
            depositor: *caller,
            token: *token,
            amount,
        }));
        Ok(())
    }

    /// Record debt, check health, then issue the stablecoin
    fn mint(&self, caller: &Address, amount: U256) -> Result<()> {
        validate_non_zero(amount)?;

        self.state.borrow_mut().debt.increase(caller, amount)?;
        self.assert_healthy(caller)?;

        tracing::debug!(to = %caller.short(), %amount, "minting stablecoin");
        let minted = self.stablecoin.mint(&self.address, caller, amount)?;
        if !minted {
            return Err(Error::MintFailed);
        }

        self.emit(EngineEvent::DscMinted(DscMintedEvent {
            minter: *caller,
            amount,
        }));
        Ok(())
    }

    /// Debit `from`'s position and push the tokens to `to`.
    ///
    /// No health check: callers decide whose health matters.
    pub(super) fn redeem_from(
        &self,
        from: &Address,
        to: &Address,
        token: &Address,
        amount: U256,
    ) -> Result<()> {
        self.state.borrow_mut().collateral.debit(from, token, amount)?;

        tracing::debug!(token = %token.short(), to = %to.short(), %amount, "pushing collateral");
        let success = self.bank.transfer(token, &self.address, to, amount)?;
        if !success {
            return Err(Error::TransferFailed { token: *token });
        }

        self.emit(EngineEvent::CollateralRedeemed(CollateralRedeemedEvent {
            from: *from,
            to: *to,
            token: *token,
            amount,
        }));
        Ok(())
    }

    /// Reduce `on_behalf_of`'s debt with stablecoin supplied by `payer`.
    ///
    /// The stablecoin is pulled into custody and burned there.
    pub(super) fn burn_from(&self, payer: &Address, on_behalf_of: &Address, amount: U256) -> Result<()> {
        self.state.borrow_mut().debt.decrease(on_behalf_of, amount)?;

        tracing::debug!(from = %payer.short(), %amount, "pulling stablecoin");
        let success = self
            .stablecoin
            .transfer_from(&self.address, payer, &self.address, amount)?;
        if !success {
            return Err(Error::TransferFailed {
                token: self.stablecoin.address(),
            });
        }
        self.stablecoin.burn(&self.address, amount)?;

        self.emit(EngineEvent::DscBurned(DscBurnedEvent {
            payer: *payer,
            on_behalf_of: *on_behalf_of,
            amount,
        }));
        Ok(())
    }

    /// Fail with [`Error::BadHealthFactor`] if `account` is below the minimum
    pub(super) fn assert_healthy(&self, account: &Address) -> Result<()> {
        let health_factor = self.health_factor(account)?;
        if !health_factor.is_healthy(self.config.min_health()) {
            return Err(Error::BadHealthFactor(health_factor));
        }
        Ok(())
    }

    /// Record an event once the step it describes has fully succeeded
    pub(super) fn emit(&self, event: EngineEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl fmt::Debug for DscEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DscEngine")
            .field("address", &self.address)
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("state", &self.state)
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}
