//! Hardware abstraction traits
//!
//! These traits define the interface between the monitor logic
//! and board-specific implementations.

pub mod sensor;
pub mod train;

pub use sensor::{SensorError, TrackSensors};
pub use train::{ActuatorOutputs, DriveDirection, OutputError, TrainOutputs};
