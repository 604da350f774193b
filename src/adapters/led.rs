//! GPIO LED fault indicator adapter

use embassy_rp::gpio::Output;

use crate::ports::indicator::IndicatorPort;

/// On-board LED as the fault indicator
pub struct LedIndicator<'a> {
    pin: Output<'a>,
}

impl<'a> LedIndicator<'a> {
    /// Wrap a GPIO output driving the LED
    pub fn new(pin: Output<'a>) -> Self {
        Self { pin }
    }
}

impl IndicatorPort for LedIndicator<'_> {
    fn set(&mut self, on: bool) {
        if on {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }
}
