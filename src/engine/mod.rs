//! The collateralized-debt engine.
//!
//! - [`dsc_engine`]: construction, the transaction boundary and the
//!   deposit/mint/redeem/burn operations
//! - [`liquidation`]: seizure of undercollateralized positions
//! - [`queries`]: read-only views
//! - [`conversion`]: token ↔ USD arithmetic
//! - [`guard`]: the engine-wide reentrancy lock

pub mod conversion;
pub mod dsc_engine;
pub mod guard;
pub mod liquidation;
pub mod queries;

pub use conversion::*;
pub use dsc_engine::*;
pub use guard::*;
pub use liquidation::*;
pub use queries::*;
