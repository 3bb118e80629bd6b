//! # DSC Engine
//!
//! A collateralized-debt engine issuing a USD-pegged stablecoin against
//! over-collateralized crypto deposits.
//!
//! ## Architecture
//!
//! - **Core**: Configuration, collateral registry, ledgers and the health factor
//! - **Oracle**: Round-based price feeds behind a staleness gate
//! - **Token**: Collateral bank and stablecoin collaborators
//! - **Engine**: Deposit, mint, redeem, burn and liquidation, each atomic and
//!   guarded against reentry
//! - **Events**: Record of committed state changes
//!
//! ## Example
//!
//! ```rust,ignore
//! use dsc::prelude::*;
//!
//! let engine = DscEngine::new(address, &[weth], &[eth_usd], collaborators, EngineConfig::default())?;
//! engine.deposit_collateral_and_mint_dsc(&alice, &weth, wad(10), wad(8_000))?;
//! assert!(engine.health_factor(&alice)?.is_healthy(engine.config().min_health()));
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    trivial_casts,
    unused_lifetimes,
    unused_qualifications
)]

pub mod cli;
pub mod core;
pub mod engine;
pub mod error;
pub mod events;
pub mod oracle;
pub mod token;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        config::EngineConfig,
        health::HealthFactor,
        registry::{CollateralRegistry, CollateralToken},
    };
    pub use crate::engine::{
        dsc_engine::{Collaborators, DscEngine},
        liquidation::LiquidationOutcome,
        queries::{AccountInformation, SolvencyReport},
    };
    pub use crate::error::{Error, Result};
    pub use crate::events::{EngineEvent, EventLog};
    pub use crate::oracle::feed::{InMemoryPriceOracle, PriceOracle, RoundData};
    pub use crate::token::{
        bank::{InMemoryTokenBank, TokenBank},
        stablecoin::{InMemoryStablecoin, Stablecoin},
        transaction::Transactional,
        TokenError,
    };
    pub use crate::utils::{
        address::Address,
        math::{format_wad, wad},
        time::{Clock, ManualClock, SystemClock},
    };
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Protocol name
pub const PROTOCOL_NAME: &str = "DSC";
