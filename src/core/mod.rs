//! Core modules for the DSC engine.
//!
//! This module contains the fundamental building blocks:
//! - Configuration and risk parameters
//! - Collateral token registry
//! - Collateral and debt ledgers
//! - Health factor calculation

pub mod collateral;
pub mod config;
pub mod debt;
pub mod health;
pub mod registry;

pub use collateral::*;
pub use config::*;
pub use debt::*;
pub use health::*;
pub use registry::*;
