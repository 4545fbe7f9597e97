//! Train output traits
//!
//! The train is driven through two H-bridge lines and a buzzer. A
//! heartbeat indicator shows that the control loop is alive.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Motor drive direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DriveDirection {
    /// Both lines low
    #[default]
    Stopped,
    /// Positive line high, negative line low
    Forward,
    /// Positive line low, negative line high
    Reverse,
}

impl DriveDirection {
    /// Drive line levels as `(positive, negative)`
    pub const fn line_levels(&self) -> (bool, bool) {
        match self {
            DriveDirection::Stopped => (false, false),
            DriveDirection::Forward => (true, false),
            DriveDirection::Reverse => (false, true),
        }
    }

    /// Check if the train is being driven
    pub const fn is_moving(&self) -> bool {
        !matches!(self, DriveDirection::Stopped)
    }
}

/// Output levels applied to the train every loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActuatorOutputs {
    /// Motor direction
    pub drive: DriveDirection,
    /// Buzzer on
    pub buzzer: bool,
}

impl ActuatorOutputs {
    /// Motor stopped, buzzer silent
    pub const fn idle() -> Self {
        Self {
            drive: DriveDirection::Stopped,
            buzzer: false,
        }
    }

    /// Motor stopped, buzzer sounding
    pub const fn alarm() -> Self {
        Self {
            drive: DriveDirection::Stopped,
            buzzer: true,
        }
    }
}

/// Errors that can occur when driving outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// A motor drive line could not be set
    DriveLine,
    /// The buzzer pin could not be set
    Buzzer,
    /// The heartbeat indicator could not be set
    Heartbeat,
}

/// Sink for actuator outputs
pub trait TrainOutputs {
    /// Apply motor and buzzer levels
    fn write(&mut self, outputs: &ActuatorOutputs) -> Result<(), OutputError>;

    /// Set the heartbeat indicator
    fn set_heartbeat(&mut self, on: bool) -> Result<(), OutputError>;
}
