//! Cross-cycle fault state

use super::severity::Severity;
use crate::classifier::FaultClass;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fault percentage reported before the first classification
pub const INITIAL_PERCENT: u8 = 5;

/// Label reported before the first classification
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Fault state carried from one classification cycle to the next
///
/// `percent` is sampled only when a fault becomes active; while the same
/// fault stays active the value is held so the dashboard does not flicker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FaultState {
    /// A fault is active and the train is held
    pub is_active: bool,
    /// Estimated fault percentage (0-100)
    pub percent: u8,
    /// Severity tier
    pub severity: Severity,
    /// Class from the most recent classification
    pub last_class: Option<FaultClass>,
}

impl Default for FaultState {
    fn default() -> Self {
        Self::new()
    }
}

impl FaultState {
    /// Power-on state: inactive, no classification yet
    pub const fn new() -> Self {
        Self {
            is_active: false,
            percent: INITIAL_PERCENT,
            severity: Severity::Safe,
            last_class: None,
        }
    }

    /// Label of the last classification, or "Unknown" before the first one
    pub fn status_label(&self) -> &'static str {
        match self.last_class {
            Some(class) => class.label(),
            None => UNKNOWN_LABEL,
        }
    }

    /// Check if at least one classification has run
    pub fn is_classified(&self) -> bool {
        self.last_class.is_some()
    }

    /// Clear the active flag after a manual override
    ///
    /// Percent, severity and label are left as they are; the next
    /// classification decides whether the fault comes back.
    pub fn clear_override(&mut self) {
        self.is_active = false;
    }
}
