//! Staleness gate over a price oracle.
//!
//! Price-dependent code never reads a feed directly. It goes through
//! [`OracleAdapter::latest_price`], which refuses readings older than the
//! configured timeout and answers that are not strictly positive. A frozen
//! engine is preferred over one acting on an untrusted price.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::oracle::feed::{PriceOracle, RoundData};
use crate::utils::address::Address;
use crate::utils::time::Clock;

/// A price that passed the staleness gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceReading {
    /// Feed that answered
    pub feed: Address,
    /// Price, 8-decimal USD, strictly positive
    pub price: U256,
    /// Unix timestamp of the answer
    pub updated_at: u64,
    /// Round that produced the answer
    pub round_id: u64,
}

/// Fetches feed rounds and rejects stale or unusable ones
#[derive(Clone)]
pub struct OracleAdapter {
    oracle: Rc<dyn PriceOracle>,
    clock: Rc<dyn Clock>,
    timeout_secs: u64,
}

impl OracleAdapter {
    /// Wrap an oracle with a staleness timeout
    pub fn new(oracle: Rc<dyn PriceOracle>, clock: Rc<dyn Clock>, timeout_secs: u64) -> Self {
        Self {
            oracle,
            clock,
            timeout_secs,
        }
    }

    /// Latest round of `feed`, failing with [`Error::StaleData`] when it is
    /// older than the timeout
    pub fn stale_checked_round_data(&self, feed: &Address) -> Result<RoundData> {
        let round = self.oracle.latest_round_data(feed)?;
        let age = round.age(self.clock.now());

        if age > self.timeout_secs {
            tracing::warn!(feed = %feed, age, max_age = self.timeout_secs, "stale price rejected");
            return Err(Error::StaleData {
                feed: *feed,
                age,
                max_age: self.timeout_secs,
            });
        }

        Ok(round)
    }

    /// Latest fresh, positive price of `feed`
    pub fn latest_price(&self, feed: &Address) -> Result<PriceReading> {
        let round = self.stale_checked_round_data(feed)?;
        if round.answer <= 0 {
            return Err(Error::InvalidPrice {
                feed: *feed,
                answer: round.answer,
            });
        }

        Ok(PriceReading {
            feed: *feed,
            price: U256::from(round.answer as u128),
            updated_at: round.updated_at,
            round_id: round.round_id,
        })
    }

    /// Maximum accepted age in seconds
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// Current time of the underlying clock
    pub fn now(&self) -> u64 {
        self.clock.now()
    }
}

impl std::fmt::Debug for OracleAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleAdapter")
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}
