//! Dashboard HTTP protocol
//!
//! The monitor serves a single-page dashboard over its own Wi-Fi access
//! point. The page polls the monitor for status and sends button presses
//! as query parameters:
//!
//! ```text
//! GET /                         dashboard page
//! GET /data.json                status document
//! GET /act?btn_fwd=1            command, answered with the status document
//! anything else                 302 to /
//! ```
//!
//! Everything here is allocation-free and works on fixed buffers, so the
//! same code runs in the firmware HTTP task and in host tests.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod request;
pub mod response;
pub mod route;
pub mod status;

pub use request::{Method, Request, RequestError, RequestParser, MAX_REQUEST_SIZE};
pub use response::{ContentType, ResponseHead, StatusCode};
pub use route::{parse_command, route, Route};
pub use status::{StatusDocument, WriteError};
