//! Buzzer and heartbeat LED

pub mod buzzer;
pub mod heartbeat;

pub use buzzer::GpioBuzzer;
pub use heartbeat::HeartbeatLed;
