//! User commands and the command arbiter
//!
//! Forward and Back are manual overrides: they clear an active fault so
//! the train can be moved off the damaged section. Stop never needs an
//! override and leaves the fault flag alone.

use heapless::String;

use crate::safety::FaultState;
use crate::traits::{ActuatorOutputs, DriveDirection};

use super::actuation::actuate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum length of the echoed command text
pub const MAX_ECHO_LEN: usize = 16;

/// Directional commands from the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Command {
    /// Drive forward
    Forward,
    /// Stop the train
    Stop,
    /// Drive in reverse
    Back,
}

impl Command {
    /// All commands in dashboard order
    pub const ALL: [Command; 3] = [Command::Forward, Command::Stop, Command::Back];

    /// Drive direction requested by this command
    pub const fn drive(&self) -> DriveDirection {
        match self {
            Command::Forward => DriveDirection::Forward,
            Command::Stop => DriveDirection::Stopped,
            Command::Back => DriveDirection::Reverse,
        }
    }

    /// Check if this command clears an active fault
    pub const fn overrides_fault(&self) -> bool {
        matches!(self, Command::Forward | Command::Back)
    }

    /// Button label
    pub const fn label(&self) -> &'static str {
        match self {
            Command::Forward => "FORWARD",
            Command::Stop => "STOP",
            Command::Back => "BACK",
        }
    }
}

/// A command as received from the dashboard, with the value it carried
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    /// Requested command
    pub command: Command,
    /// Free text sent with the button (truncated)
    pub echo: String<MAX_ECHO_LEN>,
}

impl CommandRequest {
    /// Create a request with no echo text
    pub fn new(command: Command) -> Self {
        Self {
            command,
            echo: String::new(),
        }
    }

    /// Create a request, truncating the echo text to fit
    pub fn with_echo(command: Command, echo: &str) -> Self {
        let mut text = String::new();
        for c in echo.chars() {
            if text.push(c).is_err() {
                break;
            }
        }
        Self {
            command,
            echo: text,
        }
    }
}

/// Which dashboard control is shown as active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlHighlight(Option<Command>);

impl ControlHighlight {
    /// No control highlighted
    pub const NONE: Self = Self(None);

    /// Highlight a control
    pub const fn on(command: Command) -> Self {
        Self(Some(command))
    }

    /// Currently highlighted control
    pub const fn active(&self) -> Option<Command> {
        self.0
    }

    /// Dashboard style class for a button
    pub fn class_for(&self, button: Command) -> &'static str {
        if self.0 == Some(button) {
            "danger"
        } else {
            "success"
        }
    }
}

/// Outcome of applying one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Resolution {
    /// Drive direction now standing
    pub drive: DriveDirection,
    /// Fault state after any override
    pub fault: FaultState,
    /// Control to highlight
    pub highlight: ControlHighlight,
}

impl Command {
    /// Apply this command to the current fault state
    pub fn resolve(&self, fault: &FaultState) -> Resolution {
        let mut fault = *fault;
        if self.overrides_fault() {
            fault.clear_override();
        }
        Resolution {
            drive: self.drive(),
            fault,
            highlight: ControlHighlight::on(*self),
        }
    }
}

/// Resolve an optional pending command into outputs and the next fault state
///
/// `None` leaves everything as it was: the standing drive is re-derived
/// against the unchanged fault state.
///
/// This is the pure form of one arbiter step. [`MonitorState`] applies
/// the same rules and additionally latches the standing command to stop
/// while a fault is active, so its outputs match this function for every
/// command but its remembered drive may differ.
///
/// [`MonitorState`]: super::MonitorState
pub fn resolve(
    cmd: Option<Command>,
    commanded: DriveDirection,
    fault: &FaultState,
) -> (ActuatorOutputs, FaultState) {
    match cmd {
        Some(cmd) => {
            let resolution = cmd.resolve(fault);
            (actuate(&resolution.fault, resolution.drive), resolution.fault)
        }
        None => (actuate(fault, commanded), *fault),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::FaultClass;
    use crate::safety::Severity;

    fn crack_fault() -> FaultState {
        FaultState {
            is_active: true,
            percent: 62,
            severity: Severity::Moderate,
            last_class: Some(FaultClass::CrackLeft),
        }
    }

    #[test]
    fn test_forward_overrides_fault() {
        let (outputs, fault) = resolve(Some(Command::Forward), DriveDirection::Stopped, &crack_fault());
        assert!(!fault.is_active);
        assert_eq!(outputs.drive, DriveDirection::Forward);
        assert!(!outputs.buzzer);
        // Percent is left for the next classification to decide
        assert_eq!(fault.percent, 62);
    }

    #[test]
    fn test_back_overrides_fault() {
        let (outputs, fault) = resolve(Some(Command::Back), DriveDirection::Stopped, &crack_fault());
        assert!(!fault.is_active);
        assert_eq!(outputs.drive, DriveDirection::Reverse);
    }

    #[test]
    fn test_stop_keeps_fault() {
        let (outputs, fault) = resolve(Some(Command::Stop), DriveDirection::Forward, &crack_fault());
        assert!(fault.is_active);
        assert_eq!(outputs.drive, DriveDirection::Stopped);
        assert!(outputs.buzzer);
    }

    #[test]
    fn test_back_while_inactive() {
        let (outputs, fault) = resolve(Some(Command::Back), DriveDirection::Stopped, &FaultState::new());
        assert_eq!(outputs.drive, DriveDirection::Reverse);
        assert!(!fault.is_active);
    }

    #[test]
    fn test_none_is_noop() {
        let prev = FaultState::new();
        let (outputs, fault) = resolve(None, DriveDirection::Forward, &prev);
        assert_eq!(fault, prev);
        assert_eq!(outputs.drive, DriveDirection::Forward);
    }

    #[test]
    fn test_highlight_classes() {
        let highlight = Command::Back.resolve(&FaultState::new()).highlight;
        assert_eq!(highlight.class_for(Command::Forward), "success");
        assert_eq!(highlight.class_for(Command::Stop), "success");
        assert_eq!(highlight.class_for(Command::Back), "danger");
        assert_eq!(ControlHighlight::NONE.class_for(Command::Stop), "success");
    }

    #[test]
    fn test_echo_truncated() {
        let req = CommandRequest::with_echo(Command::Forward, "a very long echo value here");
        assert_eq!(req.echo.len(), MAX_ECHO_LEN);
        assert_eq!(req.echo.as_str(), "a very long echo");
    }

    #[test]
    fn test_labels() {
        let labels: [&str; 3] = Command::ALL.map(|c| c.label());
        assert_eq!(labels, ["FORWARD", "STOP", "BACK"]);
    }
}
