//! Pin helpers shared by the drivers

use embedded_hal::digital::{InputPin, OutputPin, PinState};

/// GPIO failure, by direction
///
/// The underlying `embedded-hal` error is dropped: on the RP2040 pins
/// are infallible and the caller only needs to know which side failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Input level could not be read
    Read,
    /// Output level could not be set
    Write,
}

/// Pin level for a logical state, honouring inversion
pub(crate) fn level(active: bool, inverted: bool) -> PinState {
    PinState::from(active != inverted)
}

/// Drive an output pin to a logical state
pub(crate) fn drive<P: OutputPin>(pin: &mut P, active: bool, inverted: bool) -> Result<(), PinError> {
    pin.set_state(level(active, inverted))
        .map_err(|_| PinError::Write)
}

/// Read the logical state of an input pin
pub(crate) fn sense<P: InputPin>(pin: &mut P, inverted: bool) -> Result<bool, PinError> {
    let high = pin.is_high().map_err(|_| PinError::Read)?;
    Ok(high != inverted)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_inversion() {
        assert_eq!(level(true, false), PinState::High);
        assert_eq!(level(false, false), PinState::Low);
        assert_eq!(level(true, true), PinState::Low);
        assert_eq!(level(false, true), PinState::High);
    }

    #[test]
    fn test_drive_reports_error() {
        let mut pin = mock::BrokenPin;
        assert_eq!(drive(&mut pin, true, false), Err(PinError::Write));
        assert_eq!(sense(&mut pin, false), Err(PinError::Read));
    }

    #[test]
    fn test_sense_inversion() {
        let mut pin = mock::MockPin::new();
        assert!(!sense(&mut pin, false).unwrap());
        assert!(sense(&mut pin, true).unwrap());
        pin.high = true;
        assert!(sense(&mut pin, false).unwrap());
    }
}
