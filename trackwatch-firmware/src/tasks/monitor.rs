//! Monitor task
//!
//! Runs the poll loop: heartbeat, dashboard commands, track
//! classification and train outputs. A command wakes the loop at once
//! instead of waiting for the next tick.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::clocks::RoscRng;
use embassy_rp::gpio::{Input, Output};
use embassy_time::{Duration, Instant, Ticker};

use trackwatch_core::config::TimingConfig;
use trackwatch_core::safety::SeverityBands;
use trackwatch_core::scheduler::{PollLoop, TickReport};
use trackwatch_drivers::sensor::IrSensorPair;
use trackwatch_drivers::TrainDriver;
use trackwatch_protocol::StatusDocument;

use crate::channels::{publish_status, COMMAND_SLOT};

/// IR sensor pair on RP2040 inputs
pub type Sensors = IrSensorPair<Input<'static>, Input<'static>>;

/// Motor, buzzer and heartbeat on RP2040 outputs
pub type Train = TrainDriver<Output<'static>, Output<'static>, Output<'static>, Output<'static>>;

/// Monitor task - sole owner of the sensors and train outputs
#[embassy_executor::task]
pub async fn monitor_task(
    mut sensors: Sensors,
    mut train: Train,
    timing: TimingConfig,
    bands: SeverityBands,
) {
    info!("Monitor task started");

    let mut rng = RoscRng;
    let start = Instant::now();
    let mut poll = PollLoop::new(&timing, bands, 0);
    let mut ticker = Ticker::every(Duration::from_millis(timing.poll_interval_ms as u64));

    loop {
        let pending = match select(ticker.next(), COMMAND_SLOT.wait()).await {
            Either::First(()) => None,
            Either::Second(request) => {
                info!(
                    "Command {} (value \"{}\")",
                    request.command.label(),
                    request.echo.as_str()
                );
                Some(request.command)
            }
        };

        // Wraps after ~49 days; intervals use wrapping arithmetic
        let now_ms = start.elapsed().as_millis() as u32;

        match poll.poll(now_ms, pending, &mut sensors, &mut train, &mut rng) {
            Ok(report) => log_report(&report, &poll),
            Err(e) => warn!("Output write failed: {}, outputs now {}", e, train.applied()),
        }

        publish_status(poll.snapshot());
    }
}

fn log_report(report: &TickReport, poll: &PollLoop) {
    if let Some(e) = report.sensor_error {
        warn!("Track sensor read failed: {}", e);
    }
    if let Some(e) = report.heartbeat_error {
        warn!("Heartbeat write failed: {}", e);
    }

    let Some(classification) = report.classification else {
        return;
    };

    if classification.raised {
        warn!(
            "Fault raised: {} ({}%), train stopped",
            classification.class.label(),
            classification.fault.percent
        );
    }

    let doc = StatusDocument::from_snapshot(&poll.snapshot());
    info!("{=str}", doc.message());
}
