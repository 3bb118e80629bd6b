//! Round-based price feeds.
//!
//! A feed answers with the latest round: an 8-decimal signed USD price plus the
//! round bookkeeping of an aggregator. The engine never trusts a round blindly;
//! see [`crate::oracle::adapter`] for the staleness gate applied on top.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::utils::address::Address;
use crate::utils::constants::FEED_DECIMALS;

// ═══════════════════════════════════════════════════════════════════════════════
// ROUND DATA
// ═══════════════════════════════════════════════════════════════════════════════

/// Latest round reported by a feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoundData {
    /// Round identifier
    pub round_id: u64,
    /// Price, 8-decimal USD
    pub answer: i128,
    /// Unix timestamp the round started
    pub started_at: u64,
    /// Unix timestamp the answer was last updated
    pub updated_at: u64,
    /// Round in which the answer was computed
    pub answered_in_round: u64,
}

impl RoundData {
    /// Seconds elapsed since the answer was updated
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.updated_at)
    }
}

/// Source of price rounds, keyed by feed address
pub trait PriceOracle {
    /// Latest round of `feed`
    fn latest_round_data(&self, feed: &Address) -> Result<RoundData>;

    /// Decimals of the feed answers
    fn decimals(&self) -> u8 {
        FEED_DECIMALS
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// IN-MEMORY ORACLE
// ═══════════════════════════════════════════════════════════════════════════════

/// Settable feeds for tests and simulations.
///
/// Every [`update_answer`](Self::update_answer) opens a new round, the way an
/// aggregator does.
#[derive(Debug, Default)]
pub struct InMemoryPriceOracle {
    rounds: RefCell<HashMap<Address, RoundData>>,
}

impl InMemoryPriceOracle {
    /// Create an oracle without feeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `answer` on `feed` at time `now`, opening a new round
    pub fn update_answer(&self, feed: &Address, answer: i128, now: u64) {
        let mut rounds = self.rounds.borrow_mut();
        let round = rounds.entry(*feed).or_default();
        let round_id = round.round_id + 1;
        *round = RoundData {
            round_id,
            answer,
            started_at: now,
            updated_at: now,
            answered_in_round: round_id,
        };
        tracing::debug!(feed = %feed, answer, round_id, "feed answer updated");
    }

    /// Overwrite the latest round of `feed` verbatim
    pub fn update_round_data(&self, feed: &Address, round: RoundData) {
        self.rounds.borrow_mut().insert(*feed, round);
    }

    /// Check if `feed` has published at least once
    pub fn has_feed(&self, feed: &Address) -> bool {
        self.rounds.borrow().contains_key(feed)
    }
}

impl PriceOracle for InMemoryPriceOracle {
    fn latest_round_data(&self, feed: &Address) -> Result<RoundData> {
        self.rounds
            .borrow()
            .get(feed)
            .copied()
            .ok_or_else(|| Error::InvalidParameter {
                name: "price_feed".into(),
                reason: format!("feed {} has no rounds", feed),
            })
    }
}
