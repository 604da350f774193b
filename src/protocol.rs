//! Wire protocol for the host serial link
//!
//! One newline-terminated ASCII line per message, in both directions:
//!
//! - Outbound report: `{"T":12.34,"H":56.78,"P":987.65}` - fixed keys and
//!   punctuation, no whitespace, exactly two decimals per field.
//! - Inbound command: `{"rate":<integer>}` - sets the sampling interval in
//!   milliseconds. The grammar is exact; no internal whitespace is accepted.
//!
//! Line terminators are transport framing and never reach this module; see
//! [`crate::ports::serial`].

use core::fmt::Write;

use crate::domain::Reading;

/// Capacity of an encoded report line.
///
/// Sized for the worst case `core::fmt` rendering of an `f32` at two
/// decimals, so encoding cannot overflow even for nonsense sensor values.
pub const MAX_REPORT_LINE: usize = 160;

/// An encoded outbound report line, terminator excluded
pub type ReportLine = heapless::String<MAX_REPORT_LINE>;

/// A parsed inbound command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Set the sampling interval, in milliseconds (always > 0)
    SetRate(u32),
}

/// Why an inbound line was rejected.
///
/// Rejections are never reported back to the sender; this type exists so the
/// reporter's "ignore malformed input" is an explicit branch rather than a
/// fallthrough.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandParseError {
    /// Line does not start with `{"rate":`
    BadPrefix,
    /// Missing closing brace
    MissingBrace,
    /// Payload is empty, non-numeric, or out of range for a u32
    BadNumber,
    /// Rate of zero would stall the collector
    ZeroRate,
}

/// Serialize a reading as one report line (terminator excluded).
///
/// Numeric fields are rendered with exactly two digits after the decimal
/// point, rounding ties to even per `core::fmt`.
pub fn encode_report(reading: &Reading) -> ReportLine {
    let mut line = ReportLine::new();
    // Cannot overflow: MAX_REPORT_LINE covers three worst-case f32 fields
    let _ = write!(
        line,
        "{{\"T\":{:.2},\"H\":{:.2},\"P\":{:.2}}}",
        reading.temperature_c, reading.humidity_pct, reading.pressure_hpa
    );
    line
}

/// Parse one inbound line (terminator already stripped) as a command.
pub fn parse_command(line: &str) -> Result<Command, CommandParseError> {
    let rest = line
        .strip_prefix("{\"rate\":")
        .ok_or(CommandParseError::BadPrefix)?;
    let digits = rest
        .strip_suffix('}')
        .ok_or(CommandParseError::MissingBrace)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CommandParseError::BadNumber);
    }
    let rate: u32 = digits.parse().map_err(|_| CommandParseError::BadNumber)?;
    if rate == 0 {
        return Err(CommandParseError::ZeroRate);
    }
    Ok(Command::SetRate(rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_renders_two_decimals() {
        let reading = Reading::new(23.456, 45.6, 1013.25);
        let line = encode_report(&reading);
        assert_eq!(line.as_str(), "{\"T\":23.46,\"H\":45.60,\"P\":1013.25}");
    }

    #[test]
    fn report_handles_negative_temperature() {
        // -7.25 is exactly representable, keeping the assertion independent
        // of how a near-tie falls after f32 conversion
        let reading = Reading::new(-7.25, 100.0, 870.0);
        let line = encode_report(&reading);
        assert_eq!(line.as_str(), "{\"T\":-7.25,\"H\":100.00,\"P\":870.00}");
    }

    #[test]
    fn parse_accepts_exact_rate_command() {
        assert_eq!(parse_command("{\"rate\":2000}"), Ok(Command::SetRate(2000)));
        assert_eq!(parse_command("{\"rate\":1}"), Ok(Command::SetRate(1)));
    }

    #[test]
    fn parse_rejects_empty_payload() {
        assert_eq!(
            parse_command("{\"rate\":}"),
            Err(CommandParseError::BadNumber)
        );
    }

    #[test]
    fn parse_rejects_wrong_key() {
        assert_eq!(
            parse_command("{\"rat\":100}"),
            Err(CommandParseError::BadPrefix)
        );
    }

    #[test]
    fn parse_rejects_unframed_line() {
        assert_eq!(parse_command("rate:100"), Err(CommandParseError::BadPrefix));
    }

    #[test]
    fn parse_rejects_missing_brace() {
        assert_eq!(
            parse_command("{\"rate\":100"),
            Err(CommandParseError::MissingBrace)
        );
    }

    #[test]
    fn parse_rejects_whitespace_and_sign() {
        assert_eq!(
            parse_command("{\"rate\": 100}"),
            Err(CommandParseError::BadNumber)
        );
        assert_eq!(
            parse_command("{\"rate\":-100}"),
            Err(CommandParseError::BadNumber)
        );
    }

    #[test]
    fn parse_rejects_zero_rate() {
        assert_eq!(
            parse_command("{\"rate\":0}"),
            Err(CommandParseError::ZeroRate)
        );
    }

    #[test]
    fn parse_rejects_overflowing_rate() {
        assert_eq!(
            parse_command("{\"rate\":99999999999}"),
            Err(CommandParseError::BadNumber)
        );
    }
}
