//! Monitor configuration
//!
//! Types with shipped defaults plus the parser for `monitor.toml`.

pub mod parse;
pub mod types;

pub use parse::parse_config;
pub use types::*;
