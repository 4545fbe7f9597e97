//! Pico W pin bank
//!
//! Hands out GPIOs by number so pin assignments can come from the
//! configuration file. GPIO23, 24, 25 and 29 drive the CYW43 Wi-Fi chip
//! and are never in the bank.

use embassy_rp::gpio::{AnyPin, Input, Level, Output, Pull};
use embassy_rp::Peri;

use trackwatch_core::config::{PinConfig, GPIO_COUNT};

/// User GPIOs not yet claimed
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT as usize],
}

/// Pin requested twice or not available on this board
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct PinUnavailable(pub u8);

impl PinBank {
    /// Create an empty bank
    pub fn new() -> Self {
        Self {
            pins: [const { None }; GPIO_COUNT as usize],
        }
    }

    /// Add a pin under its GPIO number
    pub fn add(&mut self, number: u8, pin: Peri<'static, AnyPin>) {
        if let Some(slot) = self.pins.get_mut(number as usize) {
            *slot = Some(pin);
        }
    }

    fn take(&mut self, config: PinConfig) -> Result<Peri<'static, AnyPin>, PinUnavailable> {
        self.pins
            .get_mut(config.pin as usize)
            .and_then(Option::take)
            .ok_or(PinUnavailable(config.pin))
    }

    /// Claim a pin as an input
    pub fn input(&mut self, config: PinConfig) -> Result<Input<'static>, PinUnavailable> {
        let pull = if config.pull_up { Pull::Up } else { Pull::None };
        Ok(Input::new(self.take(config)?, pull))
    }

    /// Claim a pin as an output, driven to its inactive level
    pub fn output(&mut self, config: PinConfig) -> Result<Output<'static>, PinUnavailable> {
        let level = if config.inverted { Level::High } else { Level::Low };
        Ok(Output::new(self.take(config)?, level))
    }
}
