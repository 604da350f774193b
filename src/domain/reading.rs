//! Sensor reading domain entity
//!
//! This module defines the core domain entity for environmental readings.
//! It has no knowledge of how readings are transported or serialized.

/// One sampled environmental measurement.
///
/// Produced by the collector each sampling cycle and consumed by the
/// reporter after serialization; never mutated in between.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Temperature in degrees Celsius
    pub temperature_c: f32,
    /// Relative humidity in percent
    pub humidity_pct: f32,
    /// Barometric pressure in hectopascals
    pub pressure_hpa: f32,
}

impl Reading {
    /// Create a new reading
    pub const fn new(temperature_c: f32, humidity_pct: f32, pressure_hpa: f32) -> Self {
        Self {
            temperature_c,
            humidity_pct,
            pressure_hpa,
        }
    }
}
