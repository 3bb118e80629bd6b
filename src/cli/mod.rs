//! DSC command line support.
//!
//! Scenario simulation and output formatting used by the `dsc` binary.

pub mod output;
pub mod scenario;

pub use output::*;
pub use scenario::*;
