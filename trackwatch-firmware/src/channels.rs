//! Inter-task communication
//!
//! The monitor task is the only writer of train state. The HTTP task
//! hands it button presses through [`COMMAND_SLOT`] and reads back the
//! last published [`StatusSnapshot`].

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;

use trackwatch_core::state::{CommandRequest, StatusSnapshot};

/// Pending dashboard command (single slot, last write wins)
pub static COMMAND_SLOT: Signal<CriticalSectionRawMutex, CommandRequest> = Signal::new();

/// Most recent monitor state, published after every iteration
static STATUS: Mutex<CriticalSectionRawMutex, Cell<StatusSnapshot>> =
    Mutex::new(Cell::new(StatusSnapshot::boot()));

/// Publish a new snapshot
pub fn publish_status(snapshot: StatusSnapshot) {
    STATUS.lock(|status| status.set(snapshot));
}

/// Read the last published snapshot
pub fn current_status() -> StatusSnapshot {
    STATUS.lock(|status| status.get())
}
