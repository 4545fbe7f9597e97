//! IR reflective sensor pair
//!
//! One digital IR module looks down at each rail. A module output that is
//! asserted means the beam is not reflected back: the rail surface is
//! missing or broken under that sensor.
//!
//! Many cheap modules pull their output low on detection; construct those
//! with `inverted = true`.

use embedded_hal::digital::InputPin;
use trackwatch_core::classifier::FeatureVector;
use trackwatch_core::traits::{SensorError, TrackSensors};

use crate::pin::sense;

/// Left and right IR sensors read as one feature vector
pub struct IrSensorPair<L, R> {
    left: L,
    right: R,
    /// Left asserted output = pin LOW
    left_inverted: bool,
    /// Right asserted output = pin LOW
    right_inverted: bool,
}

impl<L: InputPin, R: InputPin> IrSensorPair<L, R> {
    /// Create a sensor pair of matching modules
    pub fn new(left: L, right: R, inverted: bool) -> Self {
        Self::with_inversion(left, right, inverted, inverted)
    }

    /// Create a sensor pair with per-side polarity
    pub fn with_inversion(left: L, right: R, left_inverted: bool, right_inverted: bool) -> Self {
        Self {
            left,
            right,
            left_inverted,
            right_inverted,
        }
    }
}

impl<L: InputPin, R: InputPin> TrackSensors for IrSensorPair<L, R> {
    fn read(&mut self) -> Result<FeatureVector, SensorError> {
        let left =
            sense(&mut self.left, self.left_inverted).map_err(|_| SensorError::LeftUnreadable)?;
        let right =
            sense(&mut self.right, self.right_inverted).map_err(|_| SensorError::RightUnreadable)?;
        Ok(FeatureVector::new(left, right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::mock::{BrokenPin, MockPin};
    use trackwatch_core::classifier::{classify, FaultClass};

    #[test]
    fn test_active_high_pair() {
        let mut left = MockPin::new();
        left.high = true;
        let mut sensors = IrSensorPair::new(left, MockPin::new(), false);

        let reading = sensors.read().unwrap();
        assert_eq!(reading, FeatureVector::new(true, false));
        assert_eq!(classify(reading), FaultClass::CrackLeft);
    }

    #[test]
    fn test_active_low_pair() {
        let mut right = MockPin::new();
        right.high = true;
        let mut sensors = IrSensorPair::new(MockPin::new(), right, true);

        // Left pin low = tripped, right pin high = clear
        let reading = sensors.read().unwrap();
        assert_eq!(reading, FeatureVector::new(true, false));
    }

    #[test]
    fn test_mixed_polarity() {
        // Left module active-low and idle (high), right active-high and tripped
        let mut left = MockPin::new();
        let mut right = MockPin::new();
        left.high = true;
        right.high = true;
        let mut sensors = IrSensorPair::with_inversion(left, right, true, false);
        assert_eq!(sensors.read().unwrap(), FeatureVector::new(false, true));
    }

    #[test]
    fn test_both_tripped_is_break() {
        let mut left = MockPin::new();
        let mut right = MockPin::new();
        left.high = true;
        right.high = true;
        let mut sensors = IrSensorPair::new(left, right, false);
        assert_eq!(classify(sensors.read().unwrap()), FaultClass::Break);
    }

    #[test]
    fn test_read_errors_name_the_side() {
        let mut sensors = IrSensorPair::new(BrokenPin, MockPin::new(), false);
        assert_eq!(sensors.read(), Err(SensorError::LeftUnreadable));

        let mut sensors = IrSensorPair::new(MockPin::new(), BrokenPin, false);
        assert_eq!(sensors.read(), Err(SensorError::RightUnreadable));
    }
}
