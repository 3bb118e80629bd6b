//! Utility modules for the DSC engine.
//!
//! Shared building blocks used across the engine:
//! - Addresses
//! - Fixed-point arithmetic
//! - Validation helpers
//! - Clock
//! - Constants

pub mod address;
pub mod constants;
pub mod math;
pub mod time;
pub mod validation;

pub use address::*;
pub use constants::*;
pub use math::*;
pub use time::*;
pub use validation::*;
