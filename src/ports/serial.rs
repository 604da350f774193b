//! Serial port - abstraction for the host-facing serial link
//!
//! This trait allows the reporter to emit report lines and poll for command
//! lines without knowing the specific transport (UART, USB CDC, mock, etc.)

/// Longest inbound command line the link will buffer, terminator excluded.
///
/// `{"rate":` + 10 digits of a u32 + `}` fits with room to spare.
pub const MAX_COMMAND_LINE: usize = 32;

/// A complete inbound line, terminator stripped
pub type CommandLine = heapless::String<MAX_COMMAND_LINE>;

/// Error type for serial link operations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialError {
    /// Peer no longer connected
    Disconnected,
    /// Failed to write outbound bytes
    WriteFailed,
    /// Failed to read inbound bytes
    ReadFailed,
}

/// Port for the duplex serial link to the host
pub trait SerialPort {
    /// Write one line followed by the line terminator, completing only once
    /// the whole line has been handed to the transport.
    fn write_line(
        &mut self,
        line: &str,
    ) -> impl core::future::Future<Output = Result<(), SerialError>>;

    /// Poll for one complete inbound line.
    ///
    /// Must not wait for input: returns `Ok(None)` immediately when no full
    /// line has arrived yet. The returned line has its terminator (and any
    /// trailing `\r`) stripped.
    fn poll_line(
        &mut self,
    ) -> impl core::future::Future<Output = Result<Option<CommandLine>, SerialError>>;
}
