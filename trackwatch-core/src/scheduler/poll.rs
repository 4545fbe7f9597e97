//! Monitor poll loop
//!
//! One call to [`PollLoop::poll`] is one iteration of the control loop:
//!
//! 1. toggle the heartbeat when its interval has elapsed
//! 2. apply at most one pending user command
//! 3. classify the track when the classification interval has elapsed
//! 4. derive and write the outputs
//!
//! Nothing here blocks. The caller decides how often to iterate. A
//! failed heartbeat write is reported and does not hold up the rest of
//! the iteration.

use rand_core::RngCore;

use crate::classifier::{classify, FaultClass, FeatureVector};
use crate::config::TimingConfig;
use crate::safety::{FaultState, SeverityBands, SeverityPolicy};
use crate::state::{Command, MonitorState, StatusSnapshot};
use crate::traits::{ActuatorOutputs, OutputError, SensorError, TrackSensors, TrainOutputs};

use super::interval::Interval;

/// Result of a classification cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Classification {
    /// Sensor reading that was classified
    pub reading: FeatureVector,
    /// Class produced
    pub class: FaultClass,
    /// Fault state after the severity policy
    pub fault: FaultState,
    /// A fault became active on this cycle
    pub raised: bool,
}

/// What happened during one iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// New heartbeat level, if it toggled
    pub heartbeat: Option<bool>,
    /// Heartbeat write failure on a due toggle
    pub heartbeat_error: Option<OutputError>,
    /// Command applied, if any
    pub command: Option<Command>,
    /// Classification cycle, if one ran
    pub classification: Option<Classification>,
    /// Sensor read failure on a due classification cycle
    pub sensor_error: Option<SensorError>,
    /// Outputs written
    pub outputs: ActuatorOutputs,
}

/// Cooperative monitor loop
pub struct PollLoop {
    state: MonitorState,
    policy: SeverityPolicy,
    classify: Interval,
    heartbeat: Interval,
    heartbeat_on: bool,
}

impl PollLoop {
    /// Create a poll loop starting at `start_ms`
    pub fn new(timing: &TimingConfig, bands: SeverityBands, start_ms: u32) -> Self {
        Self {
            state: MonitorState::new(),
            policy: SeverityPolicy::new(bands),
            classify: Interval::new(timing.classify_interval_ms, start_ms),
            heartbeat: Interval::new(timing.heartbeat_interval_ms, start_ms),
            heartbeat_on: false,
        }
    }

    /// Current monitor state
    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    /// Snapshot for the dashboard
    pub fn snapshot(&self) -> StatusSnapshot {
        self.state.snapshot()
    }

    /// Current heartbeat level
    pub fn heartbeat_on(&self) -> bool {
        self.heartbeat_on
    }

    /// Run one iteration
    ///
    /// A sensor read failure skips the classification for this cycle
    /// and is reported; outputs are still derived from the last fault
    /// state. A heartbeat failure is reported the same way. Only a failed
    /// motor or buzzer write is returned as an error.
    pub fn poll<S, O, R>(
        &mut self,
        now_ms: u32,
        pending: Option<Command>,
        sensors: &mut S,
        outputs: &mut O,
        rng: &mut R,
    ) -> Result<TickReport, OutputError>
    where
        S: TrackSensors,
        O: TrainOutputs,
        R: RngCore,
    {
        let mut report = TickReport {
            heartbeat: None,
            heartbeat_error: None,
            command: None,
            classification: None,
            sensor_error: None,
            outputs: self.state.outputs(),
        };

        if self.heartbeat.poll(now_ms) {
            let next = !self.heartbeat_on;
            match outputs.set_heartbeat(next) {
                Ok(()) => {
                    self.heartbeat_on = next;
                    report.heartbeat = Some(next);
                }
                Err(e) => report.heartbeat_error = Some(e),
            }
        }

        if let Some(command) = pending {
            self.state.apply_command(command);
            report.command = Some(command);
        }

        if self.classify.poll(now_ms) {
            match sensors.read() {
                Ok(reading) => {
                    report.classification = Some(self.run_classification(reading, rng));
                }
                Err(e) => report.sensor_error = Some(e),
            }
        }

        let applied = self.state.actuate();
        outputs.write(&applied)?;
        report.outputs = applied;

        Ok(report)
    }

    /// Classify a reading and update the fault state
    fn run_classification<R: RngCore>(&mut self, reading: FeatureVector, rng: &mut R) -> Classification {
        let class = classify(reading);
        let fault = self.policy.update(class, self.state.fault(), rng);
        let raised = self.state.apply_classification(reading, fault);
        Classification {
            reading,
            class,
            fault,
            raised,
        }
    }
}
