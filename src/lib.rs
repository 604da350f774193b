//! Climate Node firmware core
//!
//! Firmware for an environmental sensor node: a collector task samples a
//! BME280 (temperature, humidity, pressure) and hands readings through a
//! bounded FIFO channel to a reporter task, which prints one JSON line per
//! reading on the serial link and accepts `{"rate":<ms>}` commands to change
//! the sampling interval at runtime. If the sensor cannot be initialized the
//! node fail-stops, blinking an indicator until reset.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ Domain: Reading entity                                   │
//! ├──────────────────────────────────────────────────────────┤
//! │ Core: protocol codec, sampling interval, task loops      │
//! │   collector ──(bounded channel, cap 4)──▶ reporter       │
//! ├──────────────────────────────────────────────────────────┤
//! │ Ports (traits): SensorPort / SerialPort / IndicatorPort  │
//! ├──────────────────────────────────────────────────────────┤
//! │ Adapters (rp2350): BME280 i2c / buffered UART / LED      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The core is hardware-free and runs on the host under `cargo test` with
//! mock adapters; the `rp2350` feature pulls in the real ones and the
//! firmware binary.

#![no_std]

#[cfg(test)]
extern crate std;

/// Domain layer - pure entities
pub mod domain;

/// Ports - traits defining boundaries
pub mod ports;

/// Wire protocol for the host serial link
pub mod protocol;

/// Core task loops and shared state
pub mod app;

/// Adapters - hardware implementations of the ports
#[cfg(feature = "rp2350")]
pub mod adapters;

pub use app::{AppState, SamplingInterval, DEFAULT_SAMPLE_INTERVAL_MS, QUEUE_DEPTH};
pub use domain::Reading;
pub use ports::{IndicatorPort, SensorPort, SerialPort};
pub use protocol::{Command, CommandParseError};

#[cfg(feature = "rp2350")]
pub use adapters::{Bme280Sensor, LedIndicator, UartSerial};
