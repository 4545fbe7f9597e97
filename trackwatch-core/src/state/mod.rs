//! Monitor state and the decisions taken on it
//!
//! The poll loop owns a single [`MonitorState`]. User commands go through
//! the command arbiter, classifications through the severity policy, and
//! outputs are derived from the result on every iteration.

pub mod actuation;
pub mod command;
pub mod monitor;

pub use actuation::actuate;
pub use command::{resolve, Command, CommandRequest, ControlHighlight, Resolution, MAX_ECHO_LEN};
pub use monitor::{MonitorState, StatusSnapshot};
