//! Collateral token registry.
//!
//! The set of accepted collateral tokens and their price feeds is fixed when
//! the engine is constructed. Lookups resolve a token to its feed once per
//! call; nothing is dispatched dynamically.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::utils::address::Address;
use crate::utils::validation::validate_address;

/// A registered collateral token and its price feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollateralToken {
    /// Token address
    pub token: Address,
    /// Price feed answering in 8-decimal USD
    pub price_feed: Address,
}

/// Static token → feed registry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollateralRegistry {
    /// Tokens in registration order
    tokens: Vec<Address>,
    /// Token → feed
    feeds: HashMap<Address, Address>,
}

impl CollateralRegistry {
    /// Build a registry from parallel token and feed lists
    pub fn new(token_addresses: &[Address], price_feed_addresses: &[Address]) -> Result<Self> {
        if token_addresses.len() != price_feed_addresses.len() {
            return Err(Error::LengthMismatch {
                tokens: token_addresses.len(),
                feeds: price_feed_addresses.len(),
            });
        }

        let mut registry = Self::default();
        for (token, feed) in token_addresses.iter().zip(price_feed_addresses) {
            validate_address(token, "token")?;
            validate_address(feed, "price_feed")?;

            if registry.feeds.insert(*token, *feed).is_some() {
                return Err(Error::InvalidParameter {
                    name: "token".into(),
                    reason: format!("{} registered twice", token),
                });
            }
            registry.tokens.push(*token);
        }

        Ok(registry)
    }

    /// Resolve the price feed of a registered token
    pub fn price_feed(&self, token: &Address) -> Result<Address> {
        self.feeds
            .get(token)
            .copied()
            .ok_or(Error::TokenNotAllowed(*token))
    }

    /// Check if a token is registered
    pub fn is_allowed(&self, token: &Address) -> bool {
        self.feeds.contains_key(token)
    }

    /// Registered tokens in registration order
    pub fn tokens(&self) -> &[Address] {
        &self.tokens
    }

    /// Registered tokens with their feeds
    pub fn entries(&self) -> Vec<CollateralToken> {
        self.tokens
            .iter()
            .map(|token| CollateralToken {
                token: *token,
                price_feed: self.feeds[token],
            })
            .collect()
    }

    /// Number of registered tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if no token is registered
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(label: &str) -> Address {
        Address::from_label(label)
    }

    #[test]
    fn test_registry_preserves_order() {
        let registry = CollateralRegistry::new(
            &[addr("weth"), addr("wbtc")],
            &[addr("eth-usd"), addr("btc-usd")],
        )
        .unwrap();

        assert_eq!(registry.tokens(), &[addr("weth"), addr("wbtc")]);
        assert_eq!(registry.price_feed(&addr("wbtc")).unwrap(), addr("btc-usd"));
        assert_eq!(registry.entries()[0].price_feed, addr("eth-usd"));
    }

    #[test]
    fn test_length_mismatch() {
        let result = CollateralRegistry::new(&[addr("weth"), addr("wbtc")], &[addr("eth-usd")]);
        assert_eq!(result.unwrap_err(), Error::LengthMismatch { tokens: 2, feeds: 1 });
    }

    #[test]
    fn test_unregistered_token() {
        let registry = CollateralRegistry::new(&[addr("weth")], &[addr("eth-usd")]).unwrap();
        assert!(!registry.is_allowed(&addr("doge")));
        assert_eq!(
            registry.price_feed(&addr("doge")).unwrap_err(),
            Error::TokenNotAllowed(addr("doge"))
        );
    }

    #[test]
    fn test_duplicate_and_zero_rejected() {
        assert!(CollateralRegistry::new(&[addr("weth"), addr("weth")], &[addr("a"), addr("b")]).is_err());
        assert!(CollateralRegistry::new(&[Address::ZERO], &[addr("a")]).is_err());
        assert!(CollateralRegistry::new(&[addr("weth")], &[Address::ZERO]).is_err());
    }

    #[test]
    fn test_empty_registry_is_valid() {
        let registry = CollateralRegistry::new(&[], &[]).unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }
}
