//! The issued stablecoin.
//!
//! [`Stablecoin`] is the asset the engine mints against collateral and burns on
//! repayment. Minting and burning are gated on the owner, which in a deployed
//! system is the engine itself.

use primitive_types::U256;

use crate::token::erc20::Erc20Balances;
use crate::token::transaction::{Journal, Transactional};
use crate::token::TokenError;
use crate::utils::address::Address;
use crate::utils::constants::{DSC_NAME, DSC_SYMBOL};

/// Owner-gated, burnable fungible token
pub trait Stablecoin: Transactional {
    /// Token address
    fn address(&self) -> Address;

    /// Account allowed to mint and burn
    fn owner(&self) -> Address;

    /// Balance of `owner`
    fn balance_of(&self, owner: &Address) -> U256;

    /// Total issued supply
    fn total_supply(&self) -> U256;

    /// Remaining allowance of `spender` over `owner`'s balance
    fn allowance(&self, owner: &Address, spender: &Address) -> U256;

    /// Let `spender` move up to `amount` of `owner`'s balance
    fn approve(&self, owner: &Address, spender: &Address, amount: U256) -> Result<bool, TokenError>;

    /// Move `amount` from `from` to `to`, called by `from`
    fn transfer(&self, from: &Address, to: &Address, amount: U256) -> Result<bool, TokenError>;

    /// Move `amount` from `from` to `to` using `spender`'s allowance
    fn transfer_from(
        &self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<bool, TokenError>;

    /// Issue `amount` to `to`. Only the owner may mint.
    fn mint(&self, caller: &Address, to: &Address, amount: U256) -> Result<bool, TokenError>;

    /// Destroy `amount` of the caller's own balance. Only the owner may burn.
    fn burn(&self, caller: &Address, amount: U256) -> Result<(), TokenError>;

    /// Hand minting rights to `new_owner`
    fn transfer_ownership(&self, caller: &Address, new_owner: &Address) -> Result<(), TokenError>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// IN-MEMORY STABLECOIN
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
struct StablecoinState {
    balances: Erc20Balances,
    owner: Address,
}

/// In-memory stablecoin with owner-gated issuance
#[derive(Debug)]
pub struct InMemoryStablecoin {
    address: Address,
    state: Journal<StablecoinState>,
}

impl InMemoryStablecoin {
    /// Create a stablecoin owned by `owner`
    pub fn new(address: Address, owner: Address) -> Self {
        Self {
            address,
            state: Journal::new(StablecoinState {
                balances: Erc20Balances::new(),
                owner,
            }),
        }
    }

    /// Token name
    pub fn name(&self) -> &'static str {
        DSC_NAME
    }

    /// Token symbol
    pub fn symbol(&self) -> &'static str {
        DSC_SYMBOL
    }

    /// Check supply equals the sum of balances
    pub fn verify_supply_invariant(&self) -> bool {
        self.state.read().balances.verify_supply_invariant()
    }

    fn only_owner(&self, caller: &Address) -> Result<(), TokenError> {
        if *caller != self.state.read().owner {
            return Err(TokenError::NotOwner(*caller));
        }
        Ok(())
    }
}

impl Transactional for InMemoryStablecoin {
    fn begin(&self) {
        self.state.begin();
    }

    fn commit(&self) {
        self.state.commit();
    }

    fn rollback(&self) {
        self.state.rollback();
    }
}

impl Stablecoin for InMemoryStablecoin {
    fn address(&self) -> Address {
        self.address
    }

    fn owner(&self) -> Address {
        self.state.read().owner
    }

    fn balance_of(&self, owner: &Address) -> U256 {
        self.state.read().balances.balance_of(owner)
    }

    fn total_supply(&self) -> U256 {
        self.state.read().balances.total_supply()
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> U256 {
        self.state.read().balances.allowance(owner, spender)
    }

    fn approve(&self, owner: &Address, spender: &Address, amount: U256) -> Result<bool, TokenError> {
        self.state.write().balances.approve(owner, spender, amount);
        Ok(true)
    }

    fn transfer(&self, from: &Address, to: &Address, amount: U256) -> Result<bool, TokenError> {
        self.state.write().balances.transfer(from, to, amount)?;
        Ok(true)
    }

    fn transfer_from(
        &self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<bool, TokenError> {
        self.state
            .write()
            .balances
            .transfer_from(spender, from, to, amount)?;
        Ok(true)
    }

    fn mint(&self, caller: &Address, to: &Address, amount: U256) -> Result<bool, TokenError> {
        self.only_owner(caller)?;
        if to.is_zero() {
            return Err(TokenError::NotZeroAddress);
        }
        if amount.is_zero() {
            return Err(TokenError::MustBeMoreThanZero);
        }

        self.state.write().balances.mint(to, amount)?;
        tracing::debug!(to = %to, amount = %amount, "stablecoin minted");
        Ok(true)
    }

    fn burn(&self, caller: &Address, amount: U256) -> Result<(), TokenError> {
        self.only_owner(caller)?;
        if amount.is_zero() {
            return Err(TokenError::MustBeMoreThanZero);
        }

        self.state.write().balances.burn(caller, amount)?;
        tracing::debug!(amount = %amount, "stablecoin burned");
        Ok(())
    }

    fn transfer_ownership(&self, caller: &Address, new_owner: &Address) -> Result<(), TokenError> {
        self.only_owner(caller)?;
        if new_owner.is_zero() {
            return Err(TokenError::NotZeroAddress);
        }
        self.state.write().owner = *new_owner;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (InMemoryStablecoin, Address) {
        let owner = Address::from_label("owner");
        (InMemoryStablecoin::new(Address::from_label("dsc"), owner), owner)
    }

    #[test]
    fn test_mint_requires_owner() {
        let (dsc, owner) = setup();
        let user = Address::from_label("user");

        assert_eq!(
            dsc.mint(&user, &user, U256::one()).unwrap_err(),
            TokenError::NotOwner(user)
        );
        assert!(dsc.mint(&owner, &user, U256::from(100u64)).unwrap());
        assert_eq!(dsc.balance_of(&user), U256::from(100u64));
        assert_eq!(dsc.total_supply(), U256::from(100u64));
    }

    #[test]
    fn test_mint_rejects_zero_amount_and_zero_address() {
        let (dsc, owner) = setup();
        assert_eq!(
            dsc.mint(&owner, &owner, U256::zero()).unwrap_err(),
            TokenError::MustBeMoreThanZero
        );
        assert_eq!(
            dsc.mint(&owner, &Address::ZERO, U256::one()).unwrap_err(),
            TokenError::NotZeroAddress
        );
    }

    #[test]
    fn test_burn_own_balance_only() {
        let (dsc, owner) = setup();
        dsc.mint(&owner, &owner, U256::from(10u64)).unwrap();

        assert_eq!(
            dsc.burn(&owner, U256::from(11u64)).unwrap_err(),
            TokenError::BurnAmountExceedsBalance
        );
        dsc.burn(&owner, U256::from(4u64)).unwrap();
        assert_eq!(dsc.total_supply(), U256::from(6u64));
        assert!(dsc.verify_supply_invariant());
    }

    #[test]
    fn test_transfer_ownership() {
        let (dsc, owner) = setup();
        let engine = Address::from_label("engine");
        dsc.transfer_ownership(&owner, &engine).unwrap();

        assert_eq!(dsc.owner(), engine);
        assert!(dsc.mint(&owner, &owner, U256::one()).is_err());
        assert!(dsc.mint(&engine, &owner, U256::one()).unwrap());
    }

    #[test]
    fn test_rollback_restores_supply() {
        let (dsc, owner) = setup();
        dsc.begin();
        dsc.mint(&owner, &owner, U256::from(5u64)).unwrap();
        dsc.rollback();

        assert_eq!(dsc.total_supply(), U256::zero());
        assert_eq!(dsc.balance_of(&owner), U256::zero());
    }
}
