//! Engine events for external indexers.
//!
//! Every committed state change is recorded as an [`EngineEvent`]. Events are
//! informational only: the engine never reads them back for control flow. An
//! operation that fails leaves no events behind.

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::utils::address::Address;

// ═══════════════════════════════════════════════════════════════════════════════
// EVENT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// All engine event types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// Collateral moved into custody
    CollateralDeposited(CollateralDepositedEvent),
    /// Collateral moved out of custody
    CollateralRedeemed(CollateralRedeemedEvent),
    /// Stablecoin issued against collateral
    DscMinted(DscMintedEvent),
    /// Stablecoin burned against debt
    DscBurned(DscBurnedEvent),
    /// Undercollateralized position liquidated
    Liquidated(LiquidatedEvent),
}

impl EngineEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::CollateralDeposited(_) => "CollateralDeposited",
            Self::CollateralRedeemed(_) => "CollateralRedeemed",
            Self::DscMinted(_) => "DscMinted",
            Self::DscBurned(_) => "DscBurned",
            Self::Liquidated(_) => "Liquidated",
        }
    }

    /// Check if `account` appears in the event
    pub fn involves(&self, account: &Address) -> bool {
        match self {
            Self::CollateralDeposited(e) => e.depositor == *account,
            Self::CollateralRedeemed(e) => e.from == *account || e.to == *account,
            Self::DscMinted(e) => e.minter == *account,
            Self::DscBurned(e) => e.payer == *account || e.on_behalf_of == *account,
            Self::Liquidated(e) => e.liquidator == *account || e.target == *account,
        }
    }
}

/// Collateral deposited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollateralDepositedEvent {
    /// Account credited
    pub depositor: Address,
    /// Collateral token
    pub token: Address,
    /// Amount deposited
    pub amount: U256,
}

/// Collateral redeemed. `from` and `to` differ when a liquidator seizes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollateralRedeemedEvent {
    /// Position debited
    pub from: Address,
    /// Recipient of the tokens
    pub to: Address,
    /// Collateral token
    pub token: Address,
    /// Amount redeemed
    pub amount: U256,
}

/// Stablecoin minted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DscMintedEvent {
    /// Account whose debt grew
    pub minter: Address,
    /// Amount minted
    pub amount: U256,
}

/// Stablecoin burned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DscBurnedEvent {
    /// Account that supplied the stablecoin
    pub payer: Address,
    /// Account whose debt shrank
    pub on_behalf_of: Address,
    /// Amount burned
    pub amount: U256,
}

/// Position liquidated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidatedEvent {
    /// Account that repaid the debt
    pub liquidator: Address,
    /// Account liquidated
    pub target: Address,
    /// Collateral token seized
    pub token: Address,
    /// Debt repaid
    pub debt_covered: U256,
    /// Collateral paid out, bonus included
    pub collateral_seized: U256,
}

// ═══════════════════════════════════════════════════════════════════════════════
// EVENT LOG
// ═══════════════════════════════════════════════════════════════════════════════

/// Append-only event log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<EngineEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn push(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    /// Get all events
    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    /// Get events of a specific type
    pub fn filter_by_type(&self, event_type: &str) -> Vec<&EngineEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events involving an account
    pub fn involving(&self, account: &Address) -> Vec<&EngineEvent> {
        self.events.iter().filter(|e| e.involves(account)).collect()
    }

    /// Get the number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop every event after the first `len`
    pub fn truncate(&mut self, len: usize) {
        self.events.truncate(len);
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deposit(depositor: Address) -> EngineEvent {
        EngineEvent::CollateralDeposited(CollateralDepositedEvent {
            depositor,
            token: Address::from_label("weth"),
            amount: U256::from(1u64),
        })
    }

    #[test]
    fn test_event_types() {
        let alice = Address::from_label("alice");
        assert_eq!(deposit(alice).event_type(), "CollateralDeposited");

        let event = EngineEvent::DscMinted(DscMintedEvent { minter: alice, amount: U256::one() });
        assert_eq!(event.event_type(), "DscMinted");
    }

    #[test]
    fn test_redeem_involves_both_sides() {
        let target = Address::from_label("target");
        let liquidator = Address::from_label("liquidator");
        let event = EngineEvent::CollateralRedeemed(CollateralRedeemedEvent {
            from: target,
            to: liquidator,
            token: Address::from_label("weth"),
            amount: U256::one(),
        });

        assert!(event.involves(&target));
        assert!(event.involves(&liquidator));
        assert!(!event.involves(&Address::from_label("bystander")));
    }

    #[test]
    fn test_event_log_filter_and_truncate() {
        let alice = Address::from_label("alice");
        let bob = Address::from_label("bob");
        let mut log = EventLog::new();
        log.push(deposit(alice));
        log.push(deposit(bob));
        log.push(EngineEvent::DscMinted(DscMintedEvent { minter: bob, amount: U256::one() }));

        assert_eq!(log.filter_by_type("CollateralDeposited").len(), 2);
        assert_eq!(log.involving(&bob).len(), 2);

        log.truncate(1);
        assert_eq!(log.len(), 1);
        assert_eq!(log.events()[0], deposit(alice));
    }
}
