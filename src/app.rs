//! Core application logic: the collector/reporter task pair, the shared
//! sampling interval, and the Init -> Running | Faulted state machine.
//!
//! The loops here are generic over the port traits and the channel mutex so
//! they run unchanged on the target (embassy executor, hardware adapters)
//! and on the host (mock adapters in the test modules).

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Receiver, Sender};
use embedded_hal_async::delay::DelayNs;

use crate::domain::Reading;
use crate::ports::{IndicatorPort, SensorError, SensorPort, SerialPort};
use crate::protocol::{self, Command};

/// Capacity of the reading hand-off queue between collector and reporter
pub const QUEUE_DEPTH: usize = 4;

/// Sampling interval at boot, in milliseconds
pub const DEFAULT_SAMPLE_INTERVAL_MS: u32 = 1000;

/// Half-period of the fault indicator blink, in milliseconds
pub const FAULT_BLINK_HALF_PERIOD_MS: u32 = 1000;

/// Sampling interval shared between the reporter (sole writer after boot)
/// and the collector (sole reader).
///
/// A relaxed atomic: the collector may observe a stale value for one cycle,
/// which is tolerated. The value is always positive; writes of zero are
/// ignored so a bad command can never stall the collector.
pub struct SamplingInterval(AtomicU32);

impl SamplingInterval {
    /// Create an interval holding `ms` milliseconds (must be > 0)
    pub const fn new(ms: u32) -> Self {
        assert!(ms > 0, "sampling interval must be positive");
        Self(AtomicU32::new(ms))
    }

    /// Current interval in milliseconds
    pub fn millis(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }

    /// Replace the interval; zero is ignored
    pub fn set(&self, ms: u32) {
        if ms > 0 {
            self.0.store(ms, Ordering::Relaxed);
        }
    }
}

/// Outcome of one-shot system initialization
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppState {
    /// Sensor is up; collector and reporter may start
    Running,
    /// Sensor initialization failed; terminal until external reset
    Faulted(SensorError),
}

/// Attempt sensor initialization once.
///
/// Run before any task starts. On `Faulted` the sampling and reporting loops
/// must never be entered; the caller hands control to
/// [`run_fault_indicator`] instead.
pub async fn initialize<S: SensorPort>(sensor: &mut S, address: u8) -> AppState {
    match sensor.initialize(address).await {
        Ok(()) => AppState::Running,
        Err(e) => AppState::Faulted(e),
    }
}

/// Sampling loop: sample, hand off, sleep, repeat.
///
/// The send suspends while the queue is full (backpressure - readings are
/// never dropped). The interval is re-read every cycle so a rate command
/// takes effect on the next sleep. The sleep itself comes in through the
/// `DelayNs` trait (`embassy_time::Delay` on the target), so the loop runs
/// on any executor.
pub async fn run_collector<S, M, D, const N: usize>(
    mut sensor: S,
    queue: Sender<'_, M, Reading, N>,
    interval: &SamplingInterval,
    mut delay: D,
) -> !
where
    S: SensorPort,
    M: RawMutex,
    D: DelayNs,
{
    loop {
        let reading = sensor.read().await;
        queue.send(reading).await;
        delay.delay_ms(interval.millis()).await;
    }
}

/// Reporting loop: emit one line per reading, then poll for one command.
///
/// The receive blocks until a reading is available, so inbound commands are
/// only examined once per reading; lines arriving in between sit in the
/// transport buffer until the next pass. Malformed lines are dropped without
/// acknowledgment, and a write failure discards that one report - the serial
/// link carries no error signaling in either direction.
pub async fn run_reporter<P, M, const N: usize>(
    mut port: P,
    queue: Receiver<'_, M, Reading, N>,
    interval: &SamplingInterval,
) -> !
where
    P: SerialPort,
    M: RawMutex,
{
    loop {
        let reading = queue.receive().await;
        let line = protocol::encode_report(&reading);
        if port.write_line(&line).await.is_err() {
            // Transport gone; the reading is consumed either way
        }

        match port.poll_line().await {
            Ok(Some(line)) => match protocol::parse_command(&line) {
                Ok(Command::SetRate(ms)) => interval.set(ms),
                Err(_) => {
                    // Malformed command: deliberately ignored, no echo
                }
            },
            Ok(None) | Err(_) => {}
        }
    }
}

/// Fail-stop indicator loop: alternate the output forever.
///
/// Entered only from the `Faulted` state. There is no recovery path; the
/// system requires an external reset to retry initialization.
pub async fn run_fault_indicator<I, D>(
    mut indicator: I,
    mut delay: D,
    half_period_ms: u32,
) -> !
where
    I: IndicatorPort,
    D: DelayNs,
{
    let mut on = false;
    loop {
        on = !on;
        indicator.set(on);
        delay.delay_ms(half_period_ms).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{CommandLine, SensorError, SerialError};

    use core::sync::atomic::AtomicUsize;
    use core::time::Duration as HostDuration;

    use std::collections::VecDeque;
    use std::string::String;
    use std::sync::{Arc, Mutex};
    use std::vec::Vec;

    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use embassy_sync::channel::Channel;
    use tokio::time::timeout;

    type ReadingChannel = Channel<CriticalSectionRawMutex, Reading, QUEUE_DEPTH>;

    /// Host-side sleep so the loops run on the test executor
    struct TokioDelay;

    impl DelayNs for TokioDelay {
        async fn delay_ns(&mut self, ns: u32) {
            tokio::time::sleep(HostDuration::from_nanos(ns as u64)).await;
        }
    }

    /// Sensor producing 1.0, 2.0, ... as temperatures and counting reads
    struct ScriptedSensor {
        fail_init: bool,
        counter: f32,
        reads: Arc<AtomicUsize>,
    }

    impl ScriptedSensor {
        fn new(fail_init: bool) -> (Self, Arc<AtomicUsize>) {
            let reads = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    fail_init,
                    counter: 0.0,
                    reads: reads.clone(),
                },
                reads,
            )
        }
    }

    impl SensorPort for ScriptedSensor {
        async fn initialize(&mut self, _address: u8) -> Result<(), SensorError> {
            if self.fail_init {
                Err(SensorError::NotFound)
            } else {
                Ok(())
            }
        }

        async fn read(&mut self) -> Reading {
            self.reads.fetch_add(1, Ordering::Relaxed);
            self.counter += 1.0;
            Reading::new(self.counter, 50.0, 1000.0)
        }
    }

    /// Serial link capturing outbound lines and replaying scripted inbound ones
    struct ScriptedSerial {
        written: Arc<Mutex<Vec<String>>>,
        inbound: VecDeque<&'static str>,
    }

    impl ScriptedSerial {
        fn new(inbound: &[&'static str]) -> (Self, Arc<Mutex<Vec<String>>>) {
            let written = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    written: written.clone(),
                    inbound: inbound.iter().copied().collect(),
                },
                written,
            )
        }
    }

    impl SerialPort for ScriptedSerial {
        async fn write_line(&mut self, line: &str) -> Result<(), SerialError> {
            self.written.lock().unwrap().push(String::from(line));
            Ok(())
        }

        async fn poll_line(&mut self) -> Result<Option<CommandLine>, SerialError> {
            Ok(self
                .inbound
                .pop_front()
                .map(|s| CommandLine::try_from(s).unwrap()))
        }
    }

    /// Indicator recording every state transition
    struct RecordingIndicator(Arc<Mutex<Vec<bool>>>);

    impl IndicatorPort for RecordingIndicator {
        fn set(&mut self, on: bool) {
            self.0.lock().unwrap().push(on);
        }
    }

    #[test]
    fn interval_rejects_zero() {
        let interval = SamplingInterval::new(DEFAULT_SAMPLE_INTERVAL_MS);
        interval.set(0);
        assert_eq!(interval.millis(), DEFAULT_SAMPLE_INTERVAL_MS);
        interval.set(250);
        assert_eq!(interval.millis(), 250);
    }

    #[tokio::test]
    async fn collector_delivers_readings_in_production_order() {
        let channel = ReadingChannel::new();
        let interval = SamplingInterval::new(1);
        let (sensor, _) = ScriptedSensor::new(false);

        let consumer = async {
            let mut temps = Vec::new();
            for _ in 0..6 {
                temps.push(channel.receive().await.temperature_c);
            }
            temps
        };

        let temps = tokio::select! {
            temps = consumer => temps,
            _ = run_collector(sensor, channel.sender(), &interval, TokioDelay) => unreachable!(),
        };
        assert_eq!(temps, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[tokio::test]
    async fn full_queue_suspends_collector_without_dropping() {
        let channel = ReadingChannel::new();
        let interval = SamplingInterval::new(1);
        let (sensor, reads) = ScriptedSensor::new(false);

        // No consumer: the collector must wedge on the send once the queue
        // holds QUEUE_DEPTH readings, with exactly one more read taken.
        let blocked = timeout(
            HostDuration::from_millis(200),
            run_collector(sensor, channel.sender(), &interval, TokioDelay),
        )
        .await;
        assert!(blocked.is_err());
        assert_eq!(reads.load(Ordering::Relaxed), QUEUE_DEPTH + 1);

        for expected in 1..=QUEUE_DEPTH {
            let reading = channel.try_receive().unwrap();
            assert_eq!(reading.temperature_c, expected as f32);
        }
    }

    #[tokio::test]
    async fn reporter_emits_lines_and_applies_rate_command() {
        let channel = ReadingChannel::new();
        let interval = SamplingInterval::new(DEFAULT_SAMPLE_INTERVAL_MS);
        let (serial, written) = ScriptedSerial::new(&["{\"rate\":2000}"]);

        channel.try_send(Reading::new(23.456, 45.6, 1013.25)).unwrap();
        channel.try_send(Reading::new(24.0, 46.0, 1013.0)).unwrap();

        // The reporter parks on the third receive; the timeout unblocks us.
        let parked = timeout(
            HostDuration::from_millis(200),
            run_reporter(serial, channel.receiver(), &interval),
        )
        .await;
        assert!(parked.is_err());

        let written = written.lock().unwrap();
        assert_eq!(
            written.as_slice(),
            [
                "{\"T\":23.46,\"H\":45.60,\"P\":1013.25}",
                "{\"T\":24.00,\"H\":46.00,\"P\":1013.00}",
            ]
        );
        assert_eq!(interval.millis(), 2000);
    }

    #[tokio::test]
    async fn reporter_ignores_malformed_commands() {
        let channel = ReadingChannel::new();
        let interval = SamplingInterval::new(DEFAULT_SAMPLE_INTERVAL_MS);
        let (serial, written) =
            ScriptedSerial::new(&["{\"rate\":}", "{\"rat\":100}", "rate:100"]);

        for _ in 0..3 {
            channel.try_send(Reading::new(20.0, 40.0, 1000.0)).unwrap();
        }

        let parked = timeout(
            HostDuration::from_millis(200),
            run_reporter(serial, channel.receiver(), &interval),
        )
        .await;
        assert!(parked.is_err());

        // One report per reading and nothing else; interval untouched
        assert_eq!(written.lock().unwrap().len(), 3);
        assert_eq!(interval.millis(), DEFAULT_SAMPLE_INTERVAL_MS);
    }

    #[tokio::test]
    async fn failed_initialization_is_terminal_and_blinks() {
        let (mut sensor, reads) = ScriptedSensor::new(true);
        let state = initialize(&mut sensor, 0x77).await;
        assert_eq!(state, AppState::Faulted(SensorError::NotFound));
        assert_eq!(reads.load(Ordering::Relaxed), 0);

        let states = Arc::new(Mutex::new(Vec::new()));
        let indicator = RecordingIndicator(states.clone());
        let blocked = timeout(
            HostDuration::from_millis(50),
            run_fault_indicator(indicator, TokioDelay, 1),
        )
        .await;
        assert!(blocked.is_err());

        let states = states.lock().unwrap();
        assert!(states.len() >= 4);
        assert!(states.windows(2).all(|w| w[0] != w[1]));
    }
}
