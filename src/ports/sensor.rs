//! Sensor port - abstraction for the environmental sensor
//!
//! This trait allows the collector to sample without knowing the specific
//! hardware implementation (I2C, SPI, mock, etc.)

use crate::domain::Reading;

/// Error type for sensor initialization
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Sensor not found / not addressable on the bus
    NotFound,
    /// Bus transaction failed
    Bus,
    /// Operation attempted before successful initialization
    NotInitialized,
}

/// Port for the environmental sensor
///
/// Initialization can fail (and the system then enters its fault state);
/// sampling cannot. `read` has no error channel: the adapter is expected to
/// return a best-effort value, serving the last good measurement if the
/// underlying transaction fails.
pub trait SensorPort {
    /// Probe and configure the sensor at the given bus address
    fn initialize(
        &mut self,
        address: u8,
    ) -> impl core::future::Future<Output = Result<(), SensorError>>;

    /// Sample the sensor once
    fn read(&mut self) -> impl core::future::Future<Output = Reading>;
}
