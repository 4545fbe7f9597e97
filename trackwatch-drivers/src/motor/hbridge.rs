//! Two-line H-bridge motor driver
//!
//! The train motor is driven at full speed in either direction through
//! an L298-style bridge: one line high drives, both low coasts to a stop.
//! Both lines high is never written.

use embedded_hal::digital::OutputPin;
use trackwatch_core::traits::DriveDirection;

use crate::pin::{drive, PinError};

/// H-bridge with positive and negative drive lines
pub struct HBridgeMotor<P, N> {
    positive: P,
    negative: N,
    /// Line polarity as `(positive, negative)`, true = active-low
    inverted: (bool, bool),
    /// Last direction fully written; `None` after a failed write
    direction: Option<DriveDirection>,
}

impl<P: OutputPin, N: OutputPin> HBridgeMotor<P, N> {
    /// Create a motor driver with active-high lines, starting stopped
    pub fn new(positive: P, negative: N) -> Result<Self, PinError> {
        Self::with_inversion(positive, negative, false, false)
    }

    /// Create a motor driver with per-line polarity, starting stopped
    pub fn with_inversion(
        positive: P,
        negative: N,
        positive_inverted: bool,
        negative_inverted: bool,
    ) -> Result<Self, PinError> {
        let mut motor = Self {
            positive,
            negative,
            inverted: (positive_inverted, negative_inverted),
            direction: None,
        };
        motor.apply(DriveDirection::Stopped)?;
        Ok(motor)
    }

    /// Current direction
    ///
    /// After a failed write the lines have been released as far as
    /// possible and this reports `Stopped`.
    pub fn direction(&self) -> DriveDirection {
        self.direction.unwrap_or(DriveDirection::Stopped)
    }

    /// Drive in a direction
    ///
    /// The line being released is written first so both lines are
    /// never high together, even transiently.
    pub fn set_direction(&mut self, direction: DriveDirection) -> Result<(), PinError> {
        if self.direction == Some(direction) {
            return Ok(());
        }
        self.apply(direction)
    }

    /// Write both lines; on failure release them and forget the direction
    /// so the next call writes again
    fn apply(&mut self, direction: DriveDirection) -> Result<(), PinError> {
        self.direction = None;
        if let Err(e) = self.write_lines(direction) {
            let _ = self.write_lines(DriveDirection::Stopped);
            return Err(e);
        }
        self.direction = Some(direction);
        Ok(())
    }

    fn write_lines(&mut self, direction: DriveDirection) -> Result<(), PinError> {
        let (positive, negative) = direction.line_levels();
        let (pos_inv, neg_inv) = self.inverted;
        if positive {
            drive(&mut self.negative, negative, neg_inv)?;
            drive(&mut self.positive, positive, pos_inv)
        } else {
            drive(&mut self.positive, positive, pos_inv)?;
            drive(&mut self.negative, negative, neg_inv)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::mock::{BrokenPin, FusePin, MockPin};

    #[test]
    fn test_starts_stopped() {
        let motor = HBridgeMotor::new(MockPin::new(), MockPin::new()).unwrap();
        assert_eq!(motor.direction(), DriveDirection::Stopped);
        assert!(!motor.positive.high);
        assert!(!motor.negative.high);
    }

    #[test]
    fn test_direction_levels() {
        let mut motor = HBridgeMotor::new(MockPin::new(), MockPin::new()).unwrap();

        motor.set_direction(DriveDirection::Forward).unwrap();
        assert!(motor.positive.high);
        assert!(!motor.negative.high);

        motor.set_direction(DriveDirection::Reverse).unwrap();
        assert!(!motor.positive.high);
        assert!(motor.negative.high);

        motor.set_direction(DriveDirection::Stopped).unwrap();
        assert!(!motor.positive.high);
        assert!(!motor.negative.high);
    }

    #[test]
    fn test_unchanged_direction_skips_writes() {
        let mut motor = HBridgeMotor::new(MockPin::new(), MockPin::new()).unwrap();
        motor.set_direction(DriveDirection::Forward).unwrap();
        let writes = motor.positive.writes + motor.negative.writes;

        motor.set_direction(DriveDirection::Forward).unwrap();
        assert_eq!(motor.positive.writes + motor.negative.writes, writes);
    }

    #[test]
    fn test_active_low_line() {
        let mut motor =
            HBridgeMotor::with_inversion(MockPin::new(), MockPin::new(), false, true).unwrap();
        assert!(motor.negative.high);

        motor.set_direction(DriveDirection::Reverse).unwrap();
        assert!(!motor.positive.high);
        assert!(!motor.negative.high);
    }

    #[test]
    fn test_partial_write_forces_rewrite() {
        // Construction and Forward use both negative-line writes
        let mut motor = HBridgeMotor::new(MockPin::new(), FusePin { writes_left: 2 }).unwrap();
        motor.set_direction(DriveDirection::Forward).unwrap();

        // Positive line is released, then the negative line fails
        assert_eq!(motor.set_direction(DriveDirection::Reverse), Err(PinError::Write));
        assert!(!motor.positive.high);
        assert_eq!(motor.direction(), DriveDirection::Stopped);

        // Line works again: Forward must be written, not skipped
        motor.negative.writes_left = 4;
        motor.set_direction(DriveDirection::Forward).unwrap();
        assert!(motor.positive.high);
        assert_eq!(motor.direction(), DriveDirection::Forward);
    }

    #[test]
    fn test_write_failure() {
        assert_eq!(
            HBridgeMotor::new(BrokenPin, MockPin::new()).err(),
            Some(PinError::Write)
        );
    }
}
