//! Act as the on-board computer: scan the bus, then read the EPS telemetry registers.
//!
//! Usage: `cargo run --example obdh_emulator [I2C bus number]`. Set `RUST_LOG=debug` to see the raw frames.

use std::env;

use inquire::Select;
use rppal::{hal::Delay, i2c::I2c};
use sl_eps2::{eps::Eps2, register::EPS2_I2C_ADDRESS, types::Reading};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

// Configuration constants - adjust these for your setup
const BUS_CLOCK_HZ: u32 = 100_000;

fn integrity_note<T>(reading: &Reading<T>) -> &'static str {
    if reading.integrity.is_valid() {
        ""
    } else {
        " (CRC mismatch, value untrusted)"
    }
}

/// List the I2C buses exposed by the kernel as `/dev/i2c-N`.
fn available_buses() -> Vec<u8> {
    let mut buses: Vec<u8> = std::fs::read_dir("/dev")
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| {
                    entry
                        .file_name()
                        .to_str()
                        .and_then(|name| name.strip_prefix("i2c-"))
                        .and_then(|number| number.parse().ok())
                })
                .collect()
        })
        .unwrap_or_default();
    buses.sort_unstable();
    buses
}

fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Get I2C bus from command line arg or interactive selection
    let bus = env::args()
        .nth(1)
        .map(|arg| arg.parse::<u8>().expect("Bus number must be 0-255"))
        .unwrap_or_else(|| {
            let buses = available_buses();

            if buses.is_empty() {
                error!("No I2C buses found!");
                std::process::exit(1);
            }

            Select::new("Select an I2C bus:", buses)
                .prompt()
                .expect("Failed to select bus")
        });

    info!("Using /dev/i2c-{}", bus);

    let mut i2c = I2c::with_bus(bus).expect("Failed to open I2C bus");
    if let Ok(clock) = i2c.clock_speed() {
        if clock != BUS_CLOCK_HZ {
            warn!("Bus runs at {} Hz, the EPS is specified for {} Hz", clock, BUS_CLOCK_HZ);
        }
    }

    let mut eps = Eps2::new(i2c, Delay::new());

    // A failed scan is logged by the driver, we carry on regardless.
    if let Some(devices) = eps.scan_bus() {
        if !devices.contains(&EPS2_I2C_ADDRESS) {
            warn!("Nothing answered at the EPS address 0x{:02X}", EPS2_I2C_ADDRESS);
        }
    }

    // Identity and checksum problems are logged by the driver, the values are printed either way.
    println!();
    println!("START: Fetch Telemetry");
    let telemetry = eps.read_telemetry().expect("Failed to read telemetry");

    println!(
        "Device ID: 0x{:02X}{}",
        telemetry.identity.value.device_id(),
        integrity_note(&telemetry.identity)
    );

    let temp_c = telemetry.temperature_c();
    println!(
        "Temperature: {:.2} K / {:.2} °C{}",
        telemetry.temperature_k.value,
        temp_c.value,
        integrity_note(&telemetry.temperature_k)
    );

    println!(
        "Last Reset Cause: 0x{:02X}{}",
        telemetry.last_reset_cause.value,
        integrity_note(&telemetry.last_reset_cause)
    );

    println!(
        "Reset Count: {}{}",
        telemetry.reset_count.value,
        integrity_note(&telemetry.reset_count)
    );

    println!(
        "Main Power Bus Voltage: {} mV{}",
        telemetry.main_bus_voltage_mv.value,
        integrity_note(&telemetry.main_bus_voltage_mv)
    );

    println!();
    println!("START: Fetch Uptime");
    let uptime = eps.read_time_counter().expect("Failed to read time counter");
    println!(
        "Uptime: {} s{}",
        uptime.value.to_secs(),
        integrity_note(&uptime)
    );
}
