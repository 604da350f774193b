//! Ports (traits) defining the boundaries of the application
//!
//! Ports are traits that define how the core interacts with the outside
//! world. They allow the collector/reporter loops to remain independent of
//! specific hardware:
//!
//! - **SensorPort**: how readings are acquired (I2C BME280, mock)
//! - **SerialPort**: how lines cross the host link (UART, USB CDC, mock)
//! - **IndicatorPort**: how the fault indicator is driven (GPIO, mock)

pub mod indicator;
pub mod sensor;
pub mod serial;

pub use indicator::IndicatorPort;
pub use sensor::{SensorError, SensorPort};
pub use serial::{CommandLine, SerialError, SerialPort, MAX_COMMAND_LINE};
