//! Trackwatch - Railway Track Fault Monitor Firmware
//!
//! Firmware for a Raspberry Pi Pico W riding on a model train. Two IR
//! sensors watch the rails; a rule-based classifier flags cracks and
//! breaks, stops the train and sounds the buzzer. The Pico W runs its
//! own access point and serves a live dashboard with manual controls.

#![no_std]
#![no_main]

use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};
use defmt::*;
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Ipv4Address, Ipv4Cidr, StackResources, StaticConfigV4};
use embassy_rp::bind_interrupts;
use embassy_rp::clocks::RoscRng;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use heapless::Vec;
use rand_core::RngCore;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use trackwatch_core::config::AccessPointConfig;
use trackwatch_drivers::indicator::{GpioBuzzer, HeartbeatLed};
use trackwatch_drivers::motor::HBridgeMotor;
use trackwatch_drivers::sensor::IrSensorPair;
use trackwatch_drivers::TrainDriver;

use crate::board::PinBank;

mod board;
mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

/// CYW43 firmware, flashed separately at fixed addresses:
///
/// ```text
/// probe-rs download 43439A0.bin --binary-format bin --chip RP2040 --base-address 0x10100000
/// probe-rs download 43439A0_clm.bin --binary-format bin --chip RP2040 --base-address 0x10140000
/// ```
const CYW43_FW_ADDR: usize = 0x1010_0000;
const CYW43_FW_LEN: usize = 230_321;
const CYW43_CLM_ADDR: usize = 0x1014_0000;
const CYW43_CLM_LEN: usize = 4_752;

/// Move GPIO singletons into a [`PinBank`] under their numbers
macro_rules! pin_bank {
    ($p:ident; $($pin:ident = $n:literal),* $(,)?) => {{
        let mut bank = PinBank::new();
        $(bank.add($n, $p.$pin.into());)*
        bank
    }};
}

static CYW43_STATE: StaticCell<cyw43::State> = StaticCell::new();
static NET_RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Trackwatch firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load_config();

    // Wi-Fi chip: power on GPIO23, SPI over PIO0 on GPIO24/25/29
    // SAFETY: the blobs are flashed outside the program region reserved in
    // memory.x and XIP flash is mapped read-only for the program lifetime.
    let (fw, clm) = unsafe {
        (
            core::slice::from_raw_parts(CYW43_FW_ADDR as *const u8, CYW43_FW_LEN),
            core::slice::from_raw_parts(CYW43_CLM_ADDR as *const u8, CYW43_CLM_LEN),
        )
    };

    let pwr = Output::new(p.PIN_23, Level::Low);
    let cs = Output::new(p.PIN_25, Level::High);
    let mut pio = Pio::new(p.PIO0, Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        p.PIN_24,
        p.PIN_29,
        p.DMA_CH0,
    );

    let state = CYW43_STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;
    spawner.spawn(unwrap!(tasks::cyw43_task(runner)));

    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;
    info!("CYW43 initialized");

    // Network stack with a static address; clients configure themselves
    let ap = &config.access_point;
    let net_config = NetConfig::ipv4_static(StaticConfigV4 {
        address: Ipv4Cidr::new(ipv4(ap), ap.prefix_len),
        dns_servers: Vec::new(),
        gateway: None,
    });

    let seed = RoscRng.next_u64();
    let (stack, net_runner) = embassy_net::new(
        net_device,
        net_config,
        NET_RESOURCES.init(StackResources::new()),
        seed,
    );
    spawner.spawn(unwrap!(tasks::net_task(net_runner)));

    start_access_point(&mut control, ap).await;

    // Track sensors and train outputs
    let pins = config.pins;
    let mut bank = pin_bank!(p;
        PIN_0 = 0, PIN_1 = 1, PIN_2 = 2, PIN_3 = 3, PIN_4 = 4, PIN_5 = 5, PIN_6 = 6,
        PIN_7 = 7, PIN_8 = 8, PIN_9 = 9, PIN_10 = 10, PIN_11 = 11, PIN_12 = 12,
        PIN_13 = 13, PIN_14 = 14, PIN_15 = 15, PIN_16 = 16, PIN_17 = 17, PIN_18 = 18,
        PIN_19 = 19, PIN_20 = 20, PIN_21 = 21, PIN_22 = 22, PIN_26 = 26, PIN_27 = 27,
        PIN_28 = 28,
    );

    let sensors = IrSensorPair::with_inversion(
        unwrap!(bank.input(pins.ir_left)),
        unwrap!(bank.input(pins.ir_right)),
        pins.ir_left.inverted,
        pins.ir_right.inverted,
    );

    let motor = unwrap!(HBridgeMotor::with_inversion(
        unwrap!(bank.output(pins.motor_positive)),
        unwrap!(bank.output(pins.motor_negative)),
        pins.motor_positive.inverted,
        pins.motor_negative.inverted,
    ));
    let buzzer = unwrap!(GpioBuzzer::new(
        unwrap!(bank.output(pins.buzzer)),
        pins.buzzer.inverted,
    ));
    let heartbeat = unwrap!(HeartbeatLed::new(
        unwrap!(bank.output(pins.heartbeat)),
        pins.heartbeat.inverted,
    ));
    let train = TrainDriver::new(motor, buzzer, heartbeat);
    info!("Sensors and outputs initialized");

    spawner.spawn(unwrap!(tasks::monitor_task(
        sensors,
        train,
        config.timing,
        config.severity,
    )));
    spawner.spawn(unwrap!(tasks::http_task(stack, ap.port)));

    info!("All tasks spawned");
}

fn ipv4(ap: &AccessPointConfig) -> Ipv4Address {
    let [a, b, c, d] = ap.address;
    Ipv4Address::new(a, b, c, d)
}

async fn start_access_point(control: &mut cyw43::Control<'static>, ap: &AccessPointConfig) {
    let ssid = ap.ssid.as_str();
    if ap.is_open() {
        warn!("Starting open access point \"{=str}\" on channel {}", ssid, ap.channel);
        control.start_ap_open(ssid, ap.channel).await;
    } else {
        info!("Starting WPA2 access point \"{=str}\" on channel {}", ssid, ap.channel);
        control
            .start_ap_wpa2(ssid, ap.password.as_str(), ap.channel)
            .await;
    }
    let [a, b, c, d] = ap.address;
    info!("Dashboard at http://{}.{}.{}.{}:{}/", a, b, c, d, ap.port);
}
