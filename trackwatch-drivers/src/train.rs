//! Combined train outputs
//!
//! Bundles the motor, buzzer and heartbeat LED behind the core
//! [`TrainOutputs`] trait so the poll loop can drive them in one call.

use embedded_hal::digital::OutputPin;
use trackwatch_core::traits::{ActuatorOutputs, OutputError, TrainOutputs};

use crate::indicator::{GpioBuzzer, HeartbeatLed};
use crate::motor::HBridgeMotor;

/// Motor, buzzer and heartbeat LED
pub struct TrainDriver<P, N, B, H> {
    motor: HBridgeMotor<P, N>,
    buzzer: GpioBuzzer<B>,
    heartbeat: HeartbeatLed<H>,
}

impl<P, N, B, H> TrainDriver<P, N, B, H>
where
    P: OutputPin,
    N: OutputPin,
    B: OutputPin,
    H: OutputPin,
{
    /// Combine the output drivers
    pub fn new(motor: HBridgeMotor<P, N>, buzzer: GpioBuzzer<B>, heartbeat: HeartbeatLed<H>) -> Self {
        Self {
            motor,
            buzzer,
            heartbeat,
        }
    }

    /// Outputs currently applied
    pub fn applied(&self) -> ActuatorOutputs {
        ActuatorOutputs {
            drive: self.motor.direction(),
            buzzer: self.buzzer.is_on(),
        }
    }
}

impl<P, N, B, H> TrainOutputs for TrainDriver<P, N, B, H>
where
    P: OutputPin,
    N: OutputPin,
    B: OutputPin,
    H: OutputPin,
{
    fn write(&mut self, outputs: &ActuatorOutputs) -> Result<(), OutputError> {
        // Motor first: stopping the train matters more than the alarm
        self.motor
            .set_direction(outputs.drive)
            .map_err(|_| OutputError::DriveLine)?;
        self.buzzer
            .set_on(outputs.buzzer)
            .map_err(|_| OutputError::Buzzer)
    }

    fn set_heartbeat(&mut self, on: bool) -> Result<(), OutputError> {
        self.heartbeat.set(on).map_err(|_| OutputError::Heartbeat)
    }
}
