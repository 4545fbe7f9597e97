//! Board-agnostic core logic for the railway track fault monitor
//!
//! Everything here runs on the host as well as the target:
//!
//! - Rule-based classifier over the IR sensor pair
//! - Severity policy with percentage hysteresis
//! - Command arbiter and actuation rules
//! - Cooperative poll loop with millisecond intervals
//! - Hardware abstraction traits for sensors and train outputs
//! - Configuration types and the config file parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod classifier;
pub mod config;
pub mod safety;
pub mod scheduler;
pub mod state;
pub mod traits;

#[cfg(test)]
pub(crate) mod test_support {
    use rand_core::{impls, RngCore};

    /// Deterministic generator yielding `start, start + 1, ...`
    pub struct SequenceRng {
        next: u32,
    }

    impl SequenceRng {
        pub fn new(start: u32) -> Self {
            Self { next: start }
        }
    }

    impl RngCore for SequenceRng {
        fn next_u32(&mut self) -> u32 {
            let value = self.next;
            self.next = self.next.wrapping_add(1);
            value
        }

        fn next_u64(&mut self) -> u64 {
            impls::next_u64_via_u32(self)
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            impls::fill_bytes_via_next(self, dest)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }
}
