//! Price oracle.
//!
//! - [`feed`]: round-based feeds and the [`PriceOracle`] collaborator trait
//! - [`adapter`]: the staleness gate every price read goes through

pub mod adapter;
pub mod feed;

pub use adapter::*;
pub use feed::*;
