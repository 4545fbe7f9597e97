//! GPIO buzzer output
//!
//! Drives an active buzzer (built-in oscillator) directly or through a
//! transistor. The pin can be active-high (default) or active-low.

use embedded_hal::digital::OutputPin;

use crate::pin::{drive, PinError};

/// GPIO buzzer
pub struct GpioBuzzer<P> {
    pin: P,
    /// If true, buzzer ON = pin LOW
    inverted: bool,
    /// Current logical state (true = sounding)
    on: bool,
}

impl<P: OutputPin> GpioBuzzer<P> {
    /// Create a buzzer output, starting silent
    pub fn new(pin: P, inverted: bool) -> Result<Self, PinError> {
        let mut buzzer = Self {
            pin,
            inverted,
            on: true,
        };
        buzzer.set_on(false)?;
        Ok(buzzer)
    }

    /// Create an active-high buzzer
    pub fn new_active_high(pin: P) -> Result<Self, PinError> {
        Self::new(pin, false)
    }

    /// Create an active-low buzzer
    pub fn new_active_low(pin: P) -> Result<Self, PinError> {
        Self::new(pin, true)
    }

    /// Switch the buzzer on or off
    pub fn set_on(&mut self, on: bool) -> Result<(), PinError> {
        if on == self.on {
            return Ok(());
        }
        drive(&mut self.pin, on, self.inverted)?;
        self.on = on;
        Ok(())
    }

    /// Check if the buzzer is sounding
    pub fn is_on(&self) -> bool {
        self.on
    }
}
