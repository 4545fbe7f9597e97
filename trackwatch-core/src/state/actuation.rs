//! Output derivation
//!
//! An active fault always wins over the standing command: the train is
//! held and the buzzer sounds. Otherwise the motor follows the last
//! command the arbiter resolved.

use crate::safety::FaultState;
use crate::traits::{ActuatorOutputs, DriveDirection};

/// Derive motor and buzzer levels from the fault state and standing command
pub fn actuate(fault: &FaultState, commanded: DriveDirection) -> ActuatorOutputs {
    if fault.is_active {
        ActuatorOutputs::alarm()
    } else {
        ActuatorOutputs {
            drive: commanded,
            buzzer: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::FaultClass;
    use crate::safety::Severity;

    fn break_fault() -> FaultState {
        FaultState {
            is_active: true,
            percent: 90,
            severity: Severity::Critical,
            last_class: Some(FaultClass::Break),
        }
    }

    #[test]
    fn test_active_fault_overrides_command() {
        for commanded in [
            DriveDirection::Forward,
            DriveDirection::Reverse,
            DriveDirection::Stopped,
        ] {
            let outputs = actuate(&break_fault(), commanded);
            assert_eq!(outputs.drive, DriveDirection::Stopped);
            assert!(outputs.buzzer);
        }
    }

    #[test]
    fn test_inactive_follows_command() {
        let fault = FaultState::new();
        let outputs = actuate(&fault, DriveDirection::Reverse);
        assert_eq!(outputs.drive, DriveDirection::Reverse);
        assert!(!outputs.buzzer);
    }
}
