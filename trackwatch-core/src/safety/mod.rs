//! Fault severity policy
//!
//! Turns a classification into the fault state shown on the dashboard:
//! an active flag, a fault percentage and a severity tier.

pub mod fault;
pub mod severity;

pub use fault::FaultState;
pub use severity::{PercentBand, Severity, SeverityBands, SeverityPolicy};
