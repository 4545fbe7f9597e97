//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod http;
pub mod monitor;
pub mod wifi;

pub use http::http_task;
pub use monitor::{monitor_task, Sensors, Train};
pub use wifi::{cyw43_task, net_task};
