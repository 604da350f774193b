//! Climate node firmware for the RP2350
//!
//! Wiring (reference board):
//! - BME280 on I2C0: SDA = GP4, SCL = GP5, address 0x77
//! - Host serial on UART0: TX = GP0, RX = GP1
//! - Fault indicator: on-board LED (GP25)
//!
//! The collector task samples the sensor and hands readings through the
//! bounded queue; the reporter runs in the main context, printing one JSON
//! line per reading and applying `{"rate":<ms>}` commands. If the sensor is
//! not reachable at boot the node blinks the LED forever instead.

#![no_std]
#![no_main]

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C0, UART0};
use embassy_rp::uart::{self, BufferedInterruptHandler, BufferedUart};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use climate_node::adapters::{
    Bme280Sensor, LedIndicator, UartSerial, BME280_SECONDARY_ADDRESS,
};
use climate_node::app::{
    self, AppState, SamplingInterval, DEFAULT_SAMPLE_INTERVAL_MS, FAULT_BLINK_HALF_PERIOD_MS,
    QUEUE_DEPTH,
};
use climate_node::domain::Reading;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// Hand-off queue between collector and reporter
static READINGS: Channel<CriticalSectionRawMutex, Reading, QUEUE_DEPTH> = Channel::new();

/// Sampling interval, rewritten by rate commands from the host
static SAMPLE_INTERVAL: SamplingInterval = SamplingInterval::new(DEFAULT_SAMPLE_INTERVAL_MS);

type SensorBus = I2c<'static, I2C0, i2c::Blocking>;

#[embassy_executor::task]
async fn collector_task(sensor: Bme280Sensor<SensorBus>) -> ! {
    app::run_collector(sensor, READINGS.sender(), &SAMPLE_INTERVAL, Delay).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c::Config::default());
    let mut sensor = Bme280Sensor::new(i2c);

    match app::initialize(&mut sensor, BME280_SECONDARY_ADDRESS).await {
        AppState::Running => {
            info!("sensor up, sampling every {} ms", SAMPLE_INTERVAL.millis());

            static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
            static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
            let uart = BufferedUart::new(
                p.UART0,
                p.PIN_0,
                p.PIN_1,
                Irqs,
                TX_BUF.init([0u8; 256]),
                RX_BUF.init([0u8; 256]),
                uart::Config::default(),
            );

            spawner.must_spawn(collector_task(sensor));

            // Reporter runs in the main context, like the collector forever
            app::run_reporter(
                UartSerial::new(uart),
                READINGS.receiver(),
                &SAMPLE_INTERVAL,
            )
            .await
        }
        AppState::Faulted(e) => {
            warn!("sensor init failed: {:?}, entering fail-stop", e);
            let led = LedIndicator::new(Output::new(p.PIN_25, Level::Low));
            app::run_fault_indicator(led, Delay, FAULT_BLINK_HALF_PERIOD_MS).await
        }
    }
}
