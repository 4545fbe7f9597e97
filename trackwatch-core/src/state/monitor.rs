//! Monitor state owned by the poll loop

use crate::classifier::FeatureVector;
use crate::safety::FaultState;
use crate::traits::{ActuatorOutputs, DriveDirection};

use super::actuation::actuate;
use super::command::{Command, ControlHighlight};

/// All mutable state of the monitor
///
/// Touched only from the poll loop. The network side sees it through
/// [`StatusSnapshot`] copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorState {
    /// Fault state from the severity policy
    fault: FaultState,
    /// Last drive direction resolved by the command arbiter
    commanded: DriveDirection,
    /// Dashboard control highlight
    highlight: ControlHighlight,
    /// Outputs applied on the last iteration
    outputs: ActuatorOutputs,
    /// Most recent sensor reading
    reading: Option<FeatureVector>,
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorState {
    /// Power-on state: train stopped, no fault, nothing classified yet
    pub const fn new() -> Self {
        Self {
            fault: FaultState::new(),
            commanded: DriveDirection::Stopped,
            highlight: ControlHighlight::NONE,
            outputs: ActuatorOutputs::idle(),
            reading: None,
        }
    }

    /// Current fault state
    pub fn fault(&self) -> &FaultState {
        &self.fault
    }

    /// Standing drive command
    pub fn commanded(&self) -> DriveDirection {
        self.commanded
    }

    /// Current control highlight
    pub fn highlight(&self) -> ControlHighlight {
        self.highlight
    }

    /// Outputs applied on the last iteration
    pub fn outputs(&self) -> ActuatorOutputs {
        self.outputs
    }

    /// Most recent sensor reading
    pub fn reading(&self) -> Option<FeatureVector> {
        self.reading
    }

    /// Apply a user command through the arbiter
    pub fn apply_command(&mut self, command: Command) {
        let resolution = command.resolve(&self.fault);
        self.fault = resolution.fault;
        self.commanded = resolution.drive;
        self.highlight = resolution.highlight;
    }

    /// Store the result of a classification cycle
    ///
    /// Returns true if a fault became active on this cycle.
    pub fn apply_classification(&mut self, reading: FeatureVector, fault: FaultState) -> bool {
        let raised = fault.is_active && !self.fault.is_active;
        self.reading = Some(reading);
        self.fault = fault;
        raised
    }

    /// Derive outputs for this iteration
    ///
    /// An active fault latches the standing command to stop, so the
    /// train does not pull away on its own once the track reads clear.
    pub fn actuate(&mut self) -> ActuatorOutputs {
        if self.fault.is_active {
            self.commanded = DriveDirection::Stopped;
            self.highlight = ControlHighlight::on(Command::Stop);
        }
        self.outputs = actuate(&self.fault, self.commanded);
        self.outputs
    }

    /// Copy of the state for the dashboard
    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            fault: self.fault,
            reading: self.reading,
            highlight: self.highlight,
            outputs: self.outputs,
        }
    }
}

/// Read-only view of the monitor published to the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusSnapshot {
    /// Fault state
    pub fault: FaultState,
    /// Most recent sensor reading
    pub reading: Option<FeatureVector>,
    /// Control highlight
    pub highlight: ControlHighlight,
    /// Outputs applied
    pub outputs: ActuatorOutputs,
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self::boot()
    }
}

impl StatusSnapshot {
    /// Snapshot of the power-on state
    pub const fn boot() -> Self {
        Self {
            fault: FaultState::new(),
            reading: None,
            highlight: ControlHighlight::NONE,
            outputs: ActuatorOutputs::idle(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::FaultClass;
    use crate::safety::Severity;
    use crate::state::command::resolve;

    fn break_fault() -> FaultState {
        FaultState {
            is_active: true,
            percent: 88,
            severity: Severity::Critical,
            last_class: Some(FaultClass::Break),
        }
    }

    #[test]
    fn test_boot_state() {
        let mut state = MonitorState::new();
        assert_eq!(state.actuate(), ActuatorOutputs::idle());
        assert_eq!(state.snapshot(), StatusSnapshot::boot());
    }

    #[test]
    fn test_command_drives_train() {
        let mut state = MonitorState::new();
        state.apply_command(Command::Forward);
        let outputs = state.actuate();
        assert_eq!(outputs.drive, DriveDirection::Forward);
        assert_eq!(state.highlight().active(), Some(Command::Forward));
    }

    #[test]
    fn test_fault_latches_stop() {
        let mut state = MonitorState::new();
        state.apply_command(Command::Forward);
        state.actuate();

        let raised = state.apply_classification(FeatureVector::new(true, true), break_fault());
        assert!(raised);

        let outputs = state.actuate();
        assert_eq!(outputs, ActuatorOutputs::alarm());
        assert_eq!(state.commanded(), DriveDirection::Stopped);
        assert_eq!(state.highlight().active(), Some(Command::Stop));

        // Track reads clear again: train stays stopped until commanded
        state.apply_classification(FeatureVector::new(false, false), FaultState::new());
        assert_eq!(state.actuate(), ActuatorOutputs::idle());
    }

    #[test]
    fn test_raise_only_on_edge() {
        let mut state = MonitorState::new();
        assert!(state.apply_classification(FeatureVector::new(true, true), break_fault()));
        assert!(!state.apply_classification(FeatureVector::new(true, true), break_fault()));
    }

    #[test]
    fn test_override_then_drive() {
        let mut state = MonitorState::new();
        state.apply_classification(FeatureVector::new(true, true), break_fault());
        state.actuate();

        state.apply_command(Command::Back);
        let outputs = state.actuate();
        assert!(!state.fault().is_active);
        assert_eq!(outputs.drive, DriveDirection::Reverse);
        assert!(!outputs.buzzer);
    }

    #[test]
    fn test_outputs_agree_with_pure_resolve() {
        for fault in [FaultState::new(), break_fault()] {
            for cmd in [None, Some(Command::Forward), Some(Command::Stop), Some(Command::Back)] {
                let mut state = MonitorState::new();
                state.apply_classification(FeatureVector::new(true, true), fault);
                if let Some(cmd) = cmd {
                    state.apply_command(cmd);
                }
                let (outputs, next) = resolve(cmd, DriveDirection::Stopped, &fault);
                assert_eq!(state.actuate(), outputs);
                assert_eq!(*state.fault(), next);
            }
        }
    }

    #[test]
    fn test_snapshot_copies_reading() {
        let mut state = MonitorState::new();
        let reading = FeatureVector::new(true, false);
        state.apply_classification(reading, FaultState::new());
        assert_eq!(state.snapshot().reading, Some(reading));
    }
}
