//! Indicator port - abstraction for the fault indicator output
//!
//! A single binary output line (typically the on-board LED) toggled when the
//! system is in its fault state.

/// Port for a binary-state indicator output
pub trait IndicatorPort {
    /// Drive the indicator on or off
    fn set(&mut self, on: bool);
}
