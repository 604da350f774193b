//! Line-framed serial adapter
//!
//! Implements the SerialPort trait over any async byte stream that can
//! report read readiness (on the target: an embassy-rp buffered UART).
//! Outbound lines get a `\n` appended; inbound bytes are accumulated until
//! `\n`, with overlong lines discarded up to the next terminator.

use embedded_io_async::{Read, ReadReady, Write};

use crate::ports::serial::{CommandLine, SerialError, SerialPort, MAX_COMMAND_LINE};

/// Serial link adapter over an async byte stream
pub struct UartSerial<T> {
    io: T,
    line: heapless::Vec<u8, MAX_COMMAND_LINE>,
    overflowed: bool,
}

impl<T> UartSerial<T> {
    /// Wrap a duplex byte stream
    pub fn new(io: T) -> Self {
        Self {
            io,
            line: heapless::Vec::new(),
            overflowed: false,
        }
    }

    /// Take the accumulated bytes as a complete line, dropping a trailing
    /// `\r` so CRLF hosts work, and dropping the whole line if it held
    /// non-UTF-8 bytes (it could not be a valid command anyway).
    fn finish_line(&mut self) -> Option<CommandLine> {
        let mut bytes = self.line.as_slice();
        if bytes.last() == Some(&b'\r') {
            bytes = &bytes[..bytes.len() - 1];
        }
        let line = core::str::from_utf8(bytes)
            .ok()
            .and_then(|s| CommandLine::try_from(s).ok());
        self.line.clear();
        line
    }
}

impl<T: Read + Write + ReadReady> SerialPort for UartSerial<T> {
    async fn write_line(&mut self, line: &str) -> Result<(), SerialError> {
        self.io
            .write_all(line.as_bytes())
            .await
            .map_err(|_| SerialError::WriteFailed)?;
        self.io
            .write_all(b"\n")
            .await
            .map_err(|_| SerialError::WriteFailed)
    }

    async fn poll_line(&mut self) -> Result<Option<CommandLine>, SerialError> {
        while self
            .io
            .read_ready()
            .map_err(|_| SerialError::ReadFailed)?
        {
            let mut byte = [0u8; 1];
            let n = self
                .io
                .read(&mut byte)
                .await
                .map_err(|_| SerialError::ReadFailed)?;
            if n == 0 {
                return Err(SerialError::Disconnected);
            }

            if byte[0] == b'\n' {
                if self.overflowed {
                    // Tail of a line that no longer fits; resynchronize
                    self.overflowed = false;
                    self.line.clear();
                    continue;
                }
                if let Some(line) = self.finish_line() {
                    return Ok(Some(line));
                }
            } else if !self.overflowed && self.line.push(byte[0]).is_err() {
                self.overflowed = true;
            }
        }
        Ok(None)
    }
}
