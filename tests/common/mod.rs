//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use primitive_types::U256;

use dsc::prelude::{
    Address, Clock, Collaborators, DscEngine, EngineConfig, InMemoryPriceOracle,
    InMemoryStablecoin, InMemoryTokenBank, ManualClock, Stablecoin, TokenBank, TokenError,
    Transactional,
};

pub const ETH_USD: i128 = 2_000 * 100_000_000;
pub const BTC_USD: i128 = 1_000 * 100_000_000;
pub const START: u64 = 1_700_000_000;

pub fn weth() -> Address {
    Address::from_label("weth")
}

pub fn wbtc() -> Address {
    Address::from_label("wbtc")
}

pub fn eth_usd_feed() -> Address {
    Address::from_label("eth-usd")
}

pub fn btc_usd_feed() -> Address {
    Address::from_label("btc-usd")
}

pub fn engine_address() -> Address {
    Address::from_label("dsc-engine")
}

pub fn user(name: &str) -> Address {
    Address::from_label(name)
}

/// USD price in whole dollars as an 8-decimal feed answer
pub fn usd(price: i128) -> i128 {
    price * 100_000_000
}

// ═══════════════════════════════════════════════════════════════════════════════
// HARNESS
// ═══════════════════════════════════════════════════════════════════════════════

pub struct Harness {
    pub engine: Rc<DscEngine>,
    pub ledger: Rc<InMemoryTokenBank>,
    pub dsc: Rc<InMemoryStablecoin>,
    pub oracle: Rc<InMemoryPriceOracle>,
    pub clock: Rc<ManualClock>,
}

impl Harness {
    pub fn new() -> Self {
        let ledger = Rc::new(new_ledger());
        Self::with_bank(ledger.clone(), ledger)
    }

    /// Engine talking to `bank`, with `ledger` holding the balances behind it
    pub fn with_bank(bank: Rc<dyn TokenBank>, ledger: Rc<InMemoryTokenBank>) -> Self {
        let dsc = Rc::new(InMemoryStablecoin::new(Address::from_label("dsc"), engine_address()));
        Self::with_collaborators(bank, ledger, dsc.clone(), dsc)
    }

    pub fn with_collaborators(
        bank: Rc<dyn TokenBank>,
        ledger: Rc<InMemoryTokenBank>,
        stablecoin: Rc<dyn Stablecoin>,
        dsc: Rc<InMemoryStablecoin>,
    ) -> Self {
        let oracle = Rc::new(InMemoryPriceOracle::new());
        let clock = Rc::new(ManualClock::new(START));
        oracle.update_answer(&eth_usd_feed(), ETH_USD, START);
        oracle.update_answer(&btc_usd_feed(), BTC_USD, START);

        let engine = DscEngine::new(
            engine_address(),
            &[weth(), wbtc()],
            &[eth_usd_feed(), btc_usd_feed()],
            Collaborators {
                bank,
                stablecoin,
                oracle: oracle.clone(),
                clock: clock.clone(),
            },
            EngineConfig::default(),
        )
        .expect("engine construction");

        Self {
            engine,
            ledger,
            dsc,
            oracle,
            clock,
        }
    }

    /// Give `account` tokens and approve the engine for them and for stablecoin
    pub fn fund(&self, account: &Address, token: &Address, amount: U256) {
        self.ledger.mint_to(token, account, amount).unwrap();
        self.ledger
            .approve(token, account, &engine_address(), U256::MAX)
            .unwrap();
        self.dsc.approve(account, &engine_address(), U256::MAX).unwrap();
    }

    pub fn set_price(&self, feed: &Address, answer: i128) {
        self.oracle.update_answer(feed, answer, self.clock.now());
    }

    pub fn wallet(&self, account: &Address, token: &Address) -> U256 {
        self.ledger.balance_of(token, account)
    }

    pub fn custody(&self, token: &Address) -> U256 {
        self.ledger.balance_of(token, &engine_address())
    }
}

pub fn new_ledger() -> InMemoryTokenBank {
    InMemoryTokenBank::with_tokens(&[weth(), wbtc()])
}

// ═══════════════════════════════════════════════════════════════════════════════
// ADVERSARIAL COLLABORATORS
// ═══════════════════════════════════════════════════════════════════════════════

type Attack = Box<dyn Fn(&DscEngine) -> dsc::error::Result<()>>;

/// Call back into the engine from inside a collaborator
#[derive(Default)]
pub struct Trap {
    engine: RefCell<Weak<DscEngine>>,
    attack: RefCell<Option<Attack>>,
    outcomes: RefCell<Vec<dsc::error::Result<()>>>,
}

impl Trap {
    pub fn arm(&self, engine: &Rc<DscEngine>, attack: Attack) {
        *self.engine.borrow_mut() = Rc::downgrade(engine);
        *self.attack.borrow_mut() = Some(attack);
    }

    /// Results of every nested call so far
    pub fn outcomes(&self) -> Vec<dsc::error::Result<()>> {
        self.outcomes.borrow().clone()
    }

    fn strike(&self) {
        let engine = self.engine.borrow().upgrade();
        let attack = self.attack.borrow();
        if let (Some(engine), Some(attack)) = (engine, attack.as_ref()) {
            let outcome = attack(&engine);
            self.outcomes.borrow_mut().push(outcome);
        }
    }
}

/// Bank that calls back into the engine from inside every transfer
pub struct ReentrantBank {
    inner: Rc<InMemoryTokenBank>,
    pub trap: Trap,
}

impl ReentrantBank {
    pub fn new(inner: Rc<InMemoryTokenBank>) -> Self {
        Self {
            inner,
            trap: Trap::default(),
        }
    }
}

impl Transactional for ReentrantBank {
    fn begin(&self) {
        self.inner.begin();
    }

    fn commit(&self) {
        self.inner.commit();
    }

    fn rollback(&self) {
        self.inner.rollback();
    }
}

impl TokenBank for ReentrantBank {
    fn balance_of(&self, token: &Address, owner: &Address) -> U256 {
        self.inner.balance_of(token, owner)
    }

    fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> U256 {
        self.inner.allowance(token, owner, spender)
    }

    fn approve(
        &self,
        token: &Address,
        owner: &Address,
        spender: &Address,
        amount: U256,
    ) -> Result<bool, TokenError> {
        self.inner.approve(token, owner, spender, amount)
    }

    fn transfer(
        &self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<bool, TokenError> {
        self.trap.strike();
        self.inner.transfer(token, from, to, amount)
    }

    fn transfer_from(
        &self,
        token: &Address,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<bool, TokenError> {
        self.trap.strike();
        self.inner.transfer_from(token, spender, from, to, amount)
    }
}

/// Bank that reports failure without reverting
pub struct SoftFailBank {
    inner: Rc<InMemoryTokenBank>,
    pub fail_transfer: Cell<bool>,
    pub fail_transfer_from: Cell<bool>,
}

impl SoftFailBank {
    pub fn new(inner: Rc<InMemoryTokenBank>) -> Self {
        Self {
            inner,
            fail_transfer: Cell::new(false),
            fail_transfer_from: Cell::new(false),
        }
    }
}

impl Transactional for SoftFailBank {
    fn begin(&self) {
        self.inner.begin();
    }

    fn commit(&self) {
        self.inner.commit();
    }

    fn rollback(&self) {
        self.inner.rollback();
    }
}

impl TokenBank for SoftFailBank {
    fn balance_of(&self, token: &Address, owner: &Address) -> U256 {
        self.inner.balance_of(token, owner)
    }

    fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> U256 {
        self.inner.allowance(token, owner, spender)
    }

    fn approve(
        &self,
        token: &Address,
        owner: &Address,
        spender: &Address,
        amount: U256,
    ) -> Result<bool, TokenError> {
        self.inner.approve(token, owner, spender, amount)
    }

    fn transfer(
        &self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<bool, TokenError> {
        if self.fail_transfer.get() {
            return Ok(false);
        }
        self.inner.transfer(token, from, to, amount)
    }

    fn transfer_from(
        &self,
        token: &Address,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<bool, TokenError> {
        if self.fail_transfer_from.get() {
            return Ok(false);
        }
        self.inner.transfer_from(token, spender, from, to, amount)
    }
}

/// Stablecoin whose mint reports failure without reverting
pub struct SoftFailMintStablecoin {
    pub inner: Rc<InMemoryStablecoin>,
}

impl Transactional for SoftFailMintStablecoin {
    fn begin(&self) {
        self.inner.begin();
    }

    fn commit(&self) {
        self.inner.commit();
    }

    fn rollback(&self) {
        self.inner.rollback();
    }
}

impl Stablecoin for SoftFailMintStablecoin {
    fn address(&self) -> Address {
        self.inner.address()
    }

    fn owner(&self) -> Address {
        self.inner.owner()
    }

    fn balance_of(&self, owner: &Address) -> U256 {
        self.inner.balance_of(owner)
    }

    fn total_supply(&self) -> U256 {
        self.inner.total_supply()
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> U256 {
        self.inner.allowance(owner, spender)
    }

    fn approve(&self, owner: &Address, spender: &Address, amount: U256) -> Result<bool, TokenError> {
        self.inner.approve(owner, spender, amount)
    }

    fn transfer(&self, from: &Address, to: &Address, amount: U256) -> Result<bool, TokenError> {
        self.inner.transfer(from, to, amount)
    }

    fn transfer_from(
        &self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<bool, TokenError> {
        self.inner.transfer_from(spender, from, to, amount)
    }

    fn mint(&self, _caller: &Address, _to: &Address, _amount: U256) -> Result<bool, TokenError> {
        Ok(false)
    }

    fn burn(&self, caller: &Address, amount: U256) -> Result<(), TokenError> {
        self.inner.burn(caller, amount)
    }

    fn transfer_ownership(&self, caller: &Address, new_owner: &Address) -> Result<(), TokenError> {
        self.inner.transfer_ownership(caller, new_owner)
    }
}

/// Stablecoin that calls back into the engine from mint, pull and burn
pub struct ReentrantStablecoin {
    pub inner: Rc<InMemoryStablecoin>,
    pub trap: Trap,
}

impl ReentrantStablecoin {
    pub fn new(inner: Rc<InMemoryStablecoin>) -> Self {
        Self {
            inner,
            trap: Trap::default(),
        }
    }
}

impl Transactional for ReentrantStablecoin {
    fn begin(&self) {
        self.inner.begin();
    }

    fn commit(&self) {
        self.inner.commit();
    }

    fn rollback(&self) {
        self.inner.rollback();
    }
}

impl Stablecoin for ReentrantStablecoin {
    fn address(&self) -> Address {
        self.inner.address()
    }

    fn owner(&self) -> Address {
        self.inner.owner()
    }

    fn balance_of(&self, owner: &Address) -> U256 {
        self.inner.balance_of(owner)
    }

    fn total_supply(&self) -> U256 {
        self.inner.total_supply()
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> U256 {
        self.inner.allowance(owner, spender)
    }

    fn approve(&self, owner: &Address, spender: &Address, amount: U256) -> Result<bool, TokenError> {
        self.inner.approve(owner, spender, amount)
    }

    fn transfer(&self, from: &Address, to: &Address, amount: U256) -> Result<bool, TokenError> {
        self.inner.transfer(from, to, amount)
    }

    fn transfer_from(
        &self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<bool, TokenError> {
        self.trap.strike();
        self.inner.transfer_from(spender, from, to, amount)
    }

    fn mint(&self, caller: &Address, to: &Address, amount: U256) -> Result<bool, TokenError> {
        self.trap.strike();
        self.inner.mint(caller, to, amount)
    }

    fn burn(&self, caller: &Address, amount: U256) -> Result<(), TokenError> {
        self.trap.strike();
        self.inner.burn(caller, amount)
    }

    fn transfer_ownership(&self, caller: &Address, new_owner: &Address) -> Result<(), TokenError> {
        self.inner.transfer_ownership(caller, new_owner)
    }
}
