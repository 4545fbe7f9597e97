//! Hardware driver implementations
//!
//! Concrete implementations of the traits defined in trackwatch-core,
//! written against `embedded-hal` 1.0 digital pins:
//!
//! - IR sensor pair (track sensing)
//! - H-bridge motor (two drive lines)
//! - Buzzer and heartbeat LED
//! - [`TrainDriver`], which bundles the outputs into `TrainOutputs`

#![no_std]
#![deny(unsafe_code)]

pub mod indicator;
pub mod motor;
pub mod pin;
pub mod sensor;
pub mod train;

pub use pin::PinError;
pub use train::TrainDriver;
