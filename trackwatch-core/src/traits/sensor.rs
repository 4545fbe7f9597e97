//! Track sensor traits

use crate::classifier::FeatureVector;

/// Errors that can occur while reading the track sensors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Left sensor input could not be read
    LeftUnreadable,
    /// Right sensor input could not be read
    RightUnreadable,
}

/// Source of the two IR track sensor bits
///
/// Implementations sample both sensors and report them already
/// normalised so that `true` means "tripped".
pub trait TrackSensors {
    /// Sample both sensors
    ///
    /// Takes `&mut self` because pin reads typically require mutable access.
    fn read(&mut self) -> Result<FeatureVector, SensorError>;
}
