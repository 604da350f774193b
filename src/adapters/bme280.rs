//! BME280 environmental sensor adapter
//!
//! Implements the SensorPort trait for a Bosch BME280 on I2C, using the
//! `bme280` driver crate. Bus reads are blocking; a sampling cycle is slow
//! enough that this never starves the executor.

use bme280::i2c::BME280;
use embassy_time::Delay;
use embedded_hal::i2c::I2c;

use crate::domain::Reading;
use crate::ports::sensor::{SensorError, SensorPort};

/// Conventional primary I2C address of the BME280
pub const BME280_PRIMARY_ADDRESS: u8 = 0x76;

/// Alternate address (SDO pulled high)
pub const BME280_SECONDARY_ADDRESS: u8 = 0x77;

/// BME280-over-I2C sensor adapter
///
/// Holds the bus until `initialize` binds it to a concrete address. After
/// that, `read` serves the last good measurement whenever a bus transaction
/// fails, honoring the port's "no error channel on read" contract.
pub struct Bme280Sensor<I2C> {
    i2c: Option<I2C>,
    driver: Option<BME280<I2C>>,
    delay: Delay,
    last: Reading,
}

impl<I2C: I2c> Bme280Sensor<I2C> {
    /// Create an adapter over an exclusive I2C bus
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c: Some(i2c),
            driver: None,
            delay: Delay,
            last: Reading::new(0.0, 0.0, 0.0),
        }
    }
}

impl<I2C: I2c> SensorPort for Bme280Sensor<I2C> {
    async fn initialize(&mut self, address: u8) -> Result<(), SensorError> {
        let i2c = self.i2c.take().ok_or(SensorError::NotInitialized)?;
        let mut driver = BME280::new(i2c, address);
        driver
            .init(&mut self.delay)
            .map_err(|_| SensorError::NotFound)?;
        self.driver = Some(driver);
        Ok(())
    }

    async fn read(&mut self) -> Reading {
        if let Some(driver) = self.driver.as_mut() {
            if let Ok(m) = driver.measure(&mut self.delay) {
                // Driver reports pascals; the wire format carries hPa
                self.last = Reading::new(m.temperature, m.humidity, m.pressure / 100.0);
            }
        }
        self.last
    }
}
