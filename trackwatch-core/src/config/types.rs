//! Configuration type definitions
//!
//! Defaults reproduce the shipped monitor: 1 s classification cadence,
//! 500 ms heartbeat, an open access point at 192.168.1.1.

use heapless::String;

use crate::safety::SeverityBands;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum SSID length (802.11)
pub const MAX_SSID_LEN: usize = 32;

/// Maximum WPA2 passphrase length
pub const MAX_PASSWORD_LEN: usize = 63;

/// Minimum WPA2 passphrase length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Number of user GPIO pins on the RP2040
pub const GPIO_COUNT: u8 = 30;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Line is neither a section header nor `key = value`
    Syntax {
        /// 1-based line number
        line: u16,
    },
    /// Unknown section header
    UnknownSection {
        /// 1-based line number
        line: u16,
    },
    /// Key not valid in its section
    UnknownKey {
        /// 1-based line number
        line: u16,
    },
    /// Value has the wrong type or is out of range
    InvalidValue {
        /// 1-based line number
        line: u16,
    },
    /// Pin string is not `gpioN` with optional `!`/`^` modifiers
    InvalidPin {
        /// 1-based line number
        line: u16,
    },
    /// A percentage band is empty or exceeds 100
    InvalidBand,
    /// An interval is zero
    ZeroInterval,
    /// SSID empty or too long
    InvalidSsid,
    /// Passphrase neither empty nor 8-63 bytes
    InvalidPassword,
    /// Two outputs/inputs share a pin, or a pin is out of range
    PinConflict,
}

/// Loop timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimingConfig {
    /// Minimum time between classification cycles (ms)
    pub classify_interval_ms: u32,
    /// Heartbeat toggle period (ms)
    pub heartbeat_interval_ms: u32,
    /// Delay between loop iterations (ms)
    pub poll_interval_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            classify_interval_ms: 1000,
            heartbeat_interval_ms: 500,
            poll_interval_ms: 10,
        }
    }
}

/// Wi-Fi access point and dashboard server
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AccessPointConfig {
    /// Network name
    pub ssid: String<MAX_SSID_LEN>,
    /// WPA2 passphrase, empty for an open network
    pub password: String<MAX_PASSWORD_LEN>,
    /// Static IPv4 address of the monitor
    pub address: [u8; 4],
    /// Network prefix length
    pub prefix_len: u8,
    /// Wi-Fi channel
    pub channel: u8,
    /// HTTP port
    pub port: u16,
}

impl Default for AccessPointConfig {
    fn default() -> Self {
        let mut ssid = String::new();
        let _ = ssid.push_str("trackwatch-rail");
        Self {
            ssid,
            password: String::new(),
            address: [192, 168, 1, 1],
            prefix_len: 24,
            channel: 6,
            port: 80,
        }
    }
}

impl AccessPointConfig {
    /// Check if the network is open (no passphrase)
    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// GPIO pin number (0-29 for RP2040)
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: false,
        }
    }
}

/// Board pin assignments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinAssignments {
    /// Left IR sensor input
    pub ir_left: PinConfig,
    /// Right IR sensor input
    pub ir_right: PinConfig,
    /// Motor drive line, positive side
    pub motor_positive: PinConfig,
    /// Motor drive line, negative side
    pub motor_negative: PinConfig,
    /// Buzzer output
    pub buzzer: PinConfig,
    /// Heartbeat LED output
    pub heartbeat: PinConfig,
}

impl Default for PinAssignments {
    fn default() -> Self {
        Self {
            ir_left: PinConfig::new(2),
            ir_right: PinConfig::new(3),
            motor_positive: PinConfig::new(4),
            motor_negative: PinConfig::new(5),
            buzzer: PinConfig::new(6),
            heartbeat: PinConfig::new(15),
        }
    }
}

impl PinAssignments {
    /// All pins in a fixed order
    pub fn all(&self) -> [PinConfig; 6] {
        [
            self.ir_left,
            self.ir_right,
            self.motor_positive,
            self.motor_negative,
            self.buzzer,
            self.heartbeat,
        ]
    }
}

/// Complete monitor configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MonitorConfig {
    /// Loop timing
    pub timing: TimingConfig,
    /// Fault percentage bands
    pub severity: SeverityBands,
    /// Access point and server
    pub access_point: AccessPointConfig,
    /// Pin assignments
    pub pins: PinAssignments,
}

impl MonitorConfig {
    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.severity.is_valid() {
            return Err(ConfigError::InvalidBand);
        }

        let timing = &self.timing;
        if timing.classify_interval_ms == 0
            || timing.heartbeat_interval_ms == 0
            || timing.poll_interval_ms == 0
        {
            return Err(ConfigError::ZeroInterval);
        }

        let ap = &self.access_point;
        if ap.ssid.is_empty() {
            return Err(ConfigError::InvalidSsid);
        }
        if !ap.is_open() && ap.password.len() < MIN_PASSWORD_LEN {
            return Err(ConfigError::InvalidPassword);
        }
        if ap.prefix_len > 32 {
            return Err(ConfigError::InvalidValue { line: 0 });
        }

        let pins = self.pins.all();
        for (i, a) in pins.iter().enumerate() {
            if a.pin >= GPIO_COUNT {
                return Err(ConfigError::PinConflict);
            }
            if pins[i + 1..].iter().any(|b| b.pin == a.pin) {
                return Err(ConfigError::PinConflict);
            }
        }

        Ok(())
    }
}
