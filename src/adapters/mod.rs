//! Adapters - concrete implementations of the ports
//!
//! Each adapter binds one port trait to real hardware:
//!
//! - **bme280**: BME280 environmental sensor via I2C
//! - **uart_serial**: line framing over a buffered UART byte stream
//! - **led**: GPIO LED fault indicator

pub mod bme280;
pub mod led;
pub mod uart_serial;

pub use bme280::{Bme280Sensor, BME280_PRIMARY_ADDRESS, BME280_SECONDARY_ADDRESS};
pub use led::LedIndicator;
pub use uart_serial::UartSerial;
