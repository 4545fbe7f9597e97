//! Poll loop scheduling
//!
//! The monitor runs as one cooperative loop. Periodic work is gated by
//! deadline checks against a monotonic millisecond clock, not by timers.

pub mod interval;
pub mod poll;

pub use interval::Interval;
pub use poll::{Classification, PollLoop, TickReport};
