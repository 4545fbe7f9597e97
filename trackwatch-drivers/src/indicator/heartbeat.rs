//! Heartbeat LED

use embedded_hal::digital::OutputPin;

use crate::pin::{drive, PinError};

/// Status LED toggled by the poll loop
pub struct HeartbeatLed<P> {
    pin: P,
    inverted: bool,
    on: bool,
}

impl<P: OutputPin> HeartbeatLed<P> {
    /// Create a heartbeat LED, starting off
    pub fn new(pin: P, inverted: bool) -> Result<Self, PinError> {
        let mut led = Self {
            pin,
            inverted,
            on: false,
        };
        led.set(false)?;
        Ok(led)
    }

    /// Set the LED
    pub fn set(&mut self, on: bool) -> Result<(), PinError> {
        drive(&mut self.pin, on, self.inverted)?;
        self.on = on;
        Ok(())
    }

    /// Check if the LED is lit
    pub fn is_on(&self) -> bool {
        self.on
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::mock::MockPin;

    #[test]
    fn test_set() {
        let mut led = HeartbeatLed::new(MockPin::new(), false).unwrap();
        assert!(!led.is_on());
        led.set(true).unwrap();
        assert!(led.is_on());
        assert!(led.pin.high);
        led.set(false).unwrap();
        assert!(!led.pin.high);
    }

    #[test]
    fn test_inverted() {
        let mut led = HeartbeatLed::new(MockPin::new(), true).unwrap();
        assert!(led.pin.high);
        led.set(true).unwrap();
        assert!(!led.pin.high);
    }
}
