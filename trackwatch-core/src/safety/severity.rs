//! Severity policy with percentage hysteresis
//!
//! Rules applied once per classification cycle:
//!
//! - `Normal`: fault cleared, percent drawn from the normal band, `Safe`
//! - fault, previously inactive: percent drawn from the crack or break band
//! - fault, previously active: percent held from the previous cycle
//!
//! An active crack is `Moderate`, an active break is `Critical`.

use rand_core::RngCore;

use super::fault::FaultState;
use crate::classifier::FaultClass;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Severity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Severity {
    /// No fault
    #[default]
    Safe,
    /// Crack on one side
    Moderate,
    /// Rail break
    Critical,
}

impl Severity {
    /// Severity tier for a classification
    pub const fn for_class(class: FaultClass) -> Self {
        match class {
            FaultClass::Normal => Severity::Safe,
            FaultClass::CrackLeft | FaultClass::CrackRight => Severity::Moderate,
            FaultClass::Break => Severity::Critical,
        }
    }

    /// Dashboard label
    pub const fn label(&self) -> &'static str {
        match self {
            Severity::Safe => "Safe",
            Severity::Moderate => "Moderate",
            Severity::Critical => "Critical",
        }
    }

    /// Dashboard style class
    pub const fn style_class(&self) -> &'static str {
        match self {
            Severity::Safe => "success",
            Severity::Moderate => "warning",
            Severity::Critical => "danger",
        }
    }
}

/// Half-open percentage band `[low, high)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PercentBand {
    /// Inclusive lower bound
    pub low: u8,
    /// Exclusive upper bound
    pub high: u8,
}

impl PercentBand {
    /// Create a band
    pub const fn new(low: u8, high: u8) -> Self {
        Self { low, high }
    }

    /// Check the band is non-empty and within 0-100
    pub const fn is_valid(&self) -> bool {
        self.low < self.high && self.high <= 100
    }

    /// Check if a value lies in the band
    pub const fn contains(&self, value: u8) -> bool {
        value >= self.low && value < self.high
    }

    /// Draw a value uniformly from the band
    ///
    /// An empty band yields `low`.
    pub fn sample<R: RngCore>(&self, rng: &mut R) -> u8 {
        let span = self.high.saturating_sub(self.low) as u32;
        if span == 0 {
            return self.low;
        }
        self.low + (rng.next_u32() % span) as u8
    }
}

/// Percentage bands used by the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeverityBands {
    /// Band for a clear track
    pub normal: PercentBand,
    /// Band for a left or right crack
    pub crack: PercentBand,
    /// Band for a break
    pub rail_break: PercentBand,
}

impl Default for SeverityBands {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl SeverityBands {
    /// Bands used by the shipped firmware
    pub const DEFAULT: Self = Self {
        normal: PercentBand::new(1, 10),
        crack: PercentBand::new(45, 75),
        rail_break: PercentBand::new(85, 100),
    };

    /// Band for a given class
    pub const fn band_for(&self, class: FaultClass) -> PercentBand {
        match class {
            FaultClass::Normal => self.normal,
            FaultClass::CrackLeft | FaultClass::CrackRight => self.crack,
            FaultClass::Break => self.rail_break,
        }
    }

    /// Check every band is valid
    pub const fn is_valid(&self) -> bool {
        self.normal.is_valid() && self.crack.is_valid() && self.rail_break.is_valid()
    }
}

/// Severity policy
#[derive(Debug, Clone, Default)]
pub struct SeverityPolicy {
    bands: SeverityBands,
}

impl SeverityPolicy {
    /// Create a policy with the given bands
    pub const fn new(bands: SeverityBands) -> Self {
        Self { bands }
    }

    /// Get the configured bands
    pub fn bands(&self) -> &SeverityBands {
        &self.bands
    }

    /// Compute the next fault state from a classification
    pub fn update<R: RngCore>(
        &self,
        class: FaultClass,
        prev: &FaultState,
        rng: &mut R,
    ) -> FaultState {
        if !class.is_fault() {
            return FaultState {
                is_active: false,
                percent: self.bands.normal.sample(rng),
                severity: Severity::Safe,
                last_class: Some(class),
            };
        }

        // Sample only on the inactive -> active edge
        let percent = if prev.is_active {
            prev.percent
        } else {
            self.bands.band_for(class).sample(rng)
        };

        FaultState {
            is_active: true,
            percent,
            severity: Severity::for_class(class),
            last_class: Some(class),
        }
    }
}
