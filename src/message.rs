//! Device-bound command messages and host-bound replies.

use core::fmt;

use log::trace;

use crate::decode::{Decode, DecodeError, DecodeErrorKind};
use crate::encode::Encode;
use crate::nibble::NibblePacked;
use crate::{MANUFACTURER_ID, SYSEX_END, SYSEX_START};

/// Protocol operation codes.
///
/// The set of codes is open-ended: device firmware may grow new commands
/// independently of this crate, so codes without a symbolic name decode to
/// [`Command::Unknown`] and still round-trip through the wire format.
/// Equality compares raw codes, never variant names.
#[derive(Debug, Clone, Copy)]
pub enum Command {
    /// Read a parameter's current value.
    Get,
    /// Write a parameter's value.
    Set,
    /// Positive acknowledgement of a previous command.
    Ack,
    /// Negative acknowledgement of a previous command.
    Nack,
    /// Persist current settings to device flash.
    Save,
    /// Restore factory defaults.
    Reset,
    /// A code this crate has no symbolic name for.
    Unknown(u16),
}

impl Command {
    pub const fn from_raw(raw: u16) -> Self {
        match raw {
            0x0000 => Self::Get,
            0x0001 => Self::Set,
            0x0002 => Self::Ack,
            0x0003 => Self::Nack,
            0x0004 => Self::Save,
            0x0005 => Self::Reset,
            other => Self::Unknown(other),
        }
    }

    pub const fn into_raw(self) -> u16 {
        match self {
            Self::Get => 0x0000,
            Self::Set => 0x0001,
            Self::Ack => 0x0002,
            Self::Nack => 0x0003,
            Self::Save => 0x0004,
            Self::Reset => 0x0005,
            Self::Unknown(raw) => raw,
        }
    }
}

impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        self.into_raw() == other.into_raw()
    }
}

impl Eq for Command {}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("Get"),
            Self::Set => f.write_str("Set"),
            Self::Ack => f.write_str("Ack"),
            Self::Nack => f.write_str("Nack"),
            Self::Save => f.write_str("Save"),
            Self::Reset => f.write_str("Reset"),
            Self::Unknown(raw) => write!(f, "{raw:#06X}"),
        }
    }
}

impl Encode for Command {
    fn size(&self) -> usize {
        2
    }

    fn encode(&self, data: &mut [u8]) {
        self.into_raw().encode(data)
    }
}

impl Decode for Command {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        Ok(Self::from_raw(u16::decode(data)?))
    }
}

/// Addressable device attributes.
///
/// Open-ended in the same way as [`Command`]: unrecognized codes decode to
/// [`Parameter::Unknown`] and round-trip by raw value.
#[derive(Debug, Clone, Copy)]
pub enum Parameter {
    /// No parameter; used by commands that address the whole device.
    None,
    /// Firmware version, read as text.
    VersionString,
    /// Channel 1 output ceiling in volts, read/written as a little-endian `f32`.
    Ch1MaxVoltage,
    /// Channel 2 output ceiling in volts.
    Ch2MaxVoltage,
    /// A code this crate has no symbolic name for.
    Unknown(u16),
}

impl Parameter {
    pub const fn from_raw(raw: u16) -> Self {
        match raw {
            0x0000 => Self::None,
            0x0001 => Self::VersionString,
            0x0002 => Self::Ch1MaxVoltage,
            0x0003 => Self::Ch2MaxVoltage,
            other => Self::Unknown(other),
        }
    }

    pub const fn into_raw(self) -> u16 {
        match self {
            Self::None => 0x0000,
            Self::VersionString => 0x0001,
            Self::Ch1MaxVoltage => 0x0002,
            Self::Ch2MaxVoltage => 0x0003,
            Self::Unknown(raw) => raw,
        }
    }
}

impl PartialEq for Parameter {
    fn eq(&self, other: &Self) -> bool {
        self.into_raw() == other.into_raw()
    }
}

impl Eq for Parameter {}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::VersionString => f.write_str("VersionString"),
            Self::Ch1MaxVoltage => f.write_str("Ch1MaxVoltage"),
            Self::Ch2MaxVoltage => f.write_str("Ch2MaxVoltage"),
            Self::Unknown(raw) => write!(f, "{raw:#06X}"),
        }
    }
}

impl Encode for Parameter {
    fn size(&self) -> usize {
        2
    }

    fn encode(&self, data: &mut [u8]) {
        self.into_raw().encode(data)
    }
}

impl Decode for Parameter {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        Ok(Self::from_raw(u16::decode(data)?))
    }
}

/// One wire-trace line per codec operation. This is the only operator-visible
/// confirmation that an exchange took place, so both directions always emit it.
fn trace_wire(dir: &str, command: Command, parameter: Parameter, value: &[u8]) {
    if value.is_empty() {
        trace!("{dir} {command}: {parameter}");
    } else {
        let hexes: Vec<String> = value.iter().map(|b| format!("{b:02X}")).collect();
        trace!("{dir} {command}: {parameter}, [{}]", hexes.join(", "));
    }
}

/// Device-bound message carrying a command, a target parameter, and an
/// optional value.
///
/// # Encoding
///
/// | Field       | Size       | Description |
/// |-------------|------------|-------------|
/// | `command`   | 2          | [`Command`] code, big-endian. |
/// | `parameter` | 2          | [`Parameter`] code, big-endian. |
/// | `value`     | 2 per byte | [Nibble-packed](NibblePacked) value bytes. |
///
/// The encoded form is the SysEx payload only: the manufacturer ID and the
/// `F0`/`F7` delimiters are applied at the transport, not here. An encoded
/// message is always exactly `4 + 2 * value.len()` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMessage {
    command: Command,
    parameter: Parameter,
    value: NibblePacked,
}

impl CommandMessage {
    /// Creates a device-bound message with raw value bytes.
    pub fn new(command: Command, parameter: Parameter, value: Vec<u8>) -> Self {
        Self {
            command,
            parameter,
            value: NibblePacked::new(value),
        }
    }

    /// Creates a device-bound message whose value is an IEEE-754
    /// single-precision float in little-endian byte order.
    pub fn with_f32(command: Command, parameter: Parameter, value: f32) -> Self {
        Self::new(command, parameter, value.to_le_bytes().to_vec())
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn parameter(&self) -> Parameter {
        self.parameter
    }

    /// The logical (unpacked) value bytes.
    pub fn value(&self) -> &[u8] {
        self.value.as_bytes()
    }
}

impl Encode for CommandMessage {
    fn size(&self) -> usize {
        4 + self.value.size()
    }

    fn encode(&self, data: &mut [u8]) {
        trace_wire("->", self.command, self.parameter, self.value.as_bytes());

        self.command.encode(&mut data[0..2]);
        self.parameter.encode(&mut data[2..4]);
        self.value.encode(&mut data[4..]);
    }
}

/// Host-bound reply decoded from a received SysEx byte sequence.
///
/// A reply is immutable once decoded and owns its value buffer. The value
/// bytes are semantically opaque; the caller chooses an interpretation
/// through [`as_string`](Reply::as_string) or [`as_f32`](Reply::as_f32),
/// and dispatches on reply type with [`is`](Reply::is).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    command: Command,
    parameter: Parameter,
    value: Vec<u8>,
}

impl Reply {
    pub fn command(&self) -> Command {
        self.command
    }

    pub fn parameter(&self) -> Parameter {
        self.parameter
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// True iff both the command and parameter match exactly (by raw code).
    pub fn is(&self, command: Command, parameter: Parameter) -> bool {
        self.command == command && self.parameter == parameter
    }

    /// Interprets each value byte as one character code point.
    ///
    /// This is a byte-to-code-point mapping, not a UTF-8 decode; bytes at or
    /// above 0x80 map to U+0080..=U+00FF. An empty value yields an empty
    /// string.
    pub fn as_string(&self) -> String {
        self.value.iter().map(|&b| b as char).collect()
    }

    /// Interprets the first 4 value bytes as a little-endian IEEE-754
    /// single-precision float (byte 0 least significant).
    ///
    /// With fewer than 4 value bytes, the unread positions of the scratch
    /// buffer stay zero.
    pub fn as_f32(&self) -> f32 {
        let mut scratch = [0u8; 4];
        let len = self.value.len().min(4);
        scratch[..len].copy_from_slice(&self.value[..len]);
        f32::from_le_bytes(scratch)
    }
}

impl Decode for Reply {
    /// Decodes one received message, consuming `data` to its end.
    ///
    /// Both the `F0`/`F7` delimiters and the leading manufacturer ID are
    /// optional: each is stripped when present, so framed transport buffers
    /// and pre-stripped payloads decode identically.
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        let mut raw = *data;

        if raw.first() == Some(&SYSEX_START) && raw.last() == Some(&SYSEX_END) {
            raw = &raw[1..raw.len() - 1];
        }
        if raw.starts_with(&MANUFACTURER_ID) {
            raw = &raw[MANUFACTURER_ID.len()..];
        }

        if raw.len() < 4 {
            return Err(DecodeError::new::<Self>(DecodeErrorKind::TruncatedFrame));
        }

        let command = Command::decode(&mut raw)?;
        let parameter = Parameter::decode(&mut raw)?;
        let value = NibblePacked::decode(&mut raw)?.into_inner();

        *data = &data[data.len()..];

        trace_wire("<-", command, parameter, &value);
        Ok(Self {
            command,
            parameter,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crate::decode::{Decode, DecodeErrorKind};
    use crate::encode::Encode;
    use crate::{MANUFACTURER_ID, SYSEX_END, SYSEX_START};

    use super::{Command, CommandMessage, Parameter, Reply};

    fn decode(mut data: &[u8]) -> Reply {
        let reply = Reply::decode(&mut data).unwrap();
        assert!(data.is_empty());
        reply
    }

    #[test]
    fn set_ch1_max_voltage() {
        let msg = CommandMessage::new(Command::Set, Parameter::Ch1MaxVoltage, vec![0x0A]);
        assert_eq!(
            msg.encode_to_vec(),
            vec![0x00, 0x01, 0x00, 0x02, 0x0A, 0x00]
        );
    }

    #[test]
    fn encoded_size_is_header_plus_nibble_pairs() {
        for len in 0..=64 {
            let msg = CommandMessage::new(Command::Get, Parameter::None, vec![0x5A; len]);
            assert_eq!(msg.size(), 4 + 2 * len);
            assert_eq!(msg.encode_to_vec().len(), 4 + 2 * len);
        }
    }

    #[test]
    fn header_only_reply() {
        let reply = decode(&[0x00, 0x00, 0x00, 0x01]);
        assert!(reply.is(Command::Get, Parameter::VersionString));
        assert!(reply.value().is_empty());
        assert_eq!(reply.as_string(), "");
    }

    #[test]
    fn round_trip() {
        for len in 0..=64usize {
            let value: Vec<u8> = (0..len).map(|i| (i * 37) as u8).collect();
            let msg = CommandMessage::new(Command::Ack, Parameter::Ch2MaxVoltage, value.clone());

            let reply = decode(&msg.encode_to_vec());
            assert!(reply.is(Command::Ack, Parameter::Ch2MaxVoltage));
            assert_eq!(reply.value(), value.as_slice());
        }
    }

    #[test]
    fn unknown_codes_round_trip() {
        let msg = CommandMessage::new(
            Command::Unknown(0x0BAD),
            Parameter::Unknown(0x7FFF),
            vec![0xFE],
        );

        let reply = decode(&msg.encode_to_vec());
        assert!(reply.is(Command::Unknown(0x0BAD), Parameter::Unknown(0x7FFF)));
        assert_eq!(reply.value(), &[0xFE]);
    }

    #[test]
    fn codes_compare_by_raw_value() {
        assert_eq!(Command::Unknown(0x0001), Command::Set);
        assert_eq!(Parameter::Unknown(0x0003), Parameter::Ch2MaxVoltage);
        assert_ne!(Command::Unknown(0x0006), Command::Reset);

        assert_eq!(Command::Unknown(0x0BAD).to_string(), "0x0BAD");
        assert_eq!(Command::Save.to_string(), "Save");
    }

    #[test]
    fn framing_tolerance() {
        let payload = CommandMessage::new(Command::Nack, Parameter::Ch1MaxVoltage, vec![0x42])
            .encode_to_vec();

        let mut framed = vec![SYSEX_START];
        framed.extend_from_slice(&MANUFACTURER_ID);
        framed.extend_from_slice(&payload);
        framed.push(SYSEX_END);

        assert_eq!(decode(&framed), decode(&payload));
    }

    #[test]
    fn float_round_trip_preserves_bits() {
        for f in [0.0f32, -4.25, 5.0, f32::MIN_POSITIVE / 2.0, f32::NAN] {
            let msg = CommandMessage::with_f32(Command::Set, Parameter::Ch2MaxVoltage, f);
            let reply = decode(&msg.encode_to_vec());
            assert_eq!(reply.as_f32().to_bits(), f.to_bits());
        }
    }

    #[test]
    fn string_accessor() {
        let reply = decode(
            &CommandMessage::new(Command::Ack, Parameter::VersionString, vec![0x48, 0x69])
                .encode_to_vec(),
        );
        assert_eq!(reply.as_string(), "Hi");
    }

    #[test]
    fn short_value_reads_as_zero_padded_float() {
        let reply = decode(
            &CommandMessage::new(Command::Ack, Parameter::Ch1MaxVoltage, vec![0x01])
                .encode_to_vec(),
        );
        assert_eq!(reply.as_f32().to_bits(), f32::from_le_bytes([0x01, 0, 0, 0]).to_bits());
    }

    #[test]
    fn truncated_header_rejected() {
        for data in [&[][..], &[0x00][..], &[0x00, 0x01, 0x00][..]] {
            let err = Reply::decode(&mut &*data).unwrap_err();
            assert_eq!(err.kind(), DecodeErrorKind::TruncatedFrame);
        }

        // A bare manufacturer ID leaves nothing to parse either.
        let err = Reply::decode(&mut &MANUFACTURER_ID[..]).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::TruncatedFrame);
    }

    #[test]
    fn odd_payload_rejected() {
        let err = Reply::decode(&mut &[0x00, 0x02, 0x00, 0x00, 0x0F][..]).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::OddPayloadLength);
    }

    struct CapturingLogger(Mutex<Vec<String>>);

    impl log::Log for CapturingLogger {
        fn enabled(&self, _metadata: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            self.0.lock().unwrap().push(record.args().to_string());
        }

        fn flush(&self) {}
    }

    static LOGGER: CapturingLogger = CapturingLogger(Mutex::new(Vec::new()));

    #[test]
    fn every_operation_emits_a_wire_trace() {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(log::LevelFilter::Trace);

        let encoded = CommandMessage::new(Command::Set, Parameter::Ch1MaxVoltage, vec![0x0A])
            .encode_to_vec();
        Reply::decode(&mut encoded.as_slice()).unwrap();

        // A value-less message omits the byte list.
        CommandMessage::new(Command::Get, Parameter::VersionString, Vec::new()).encode_to_vec();

        // Other tests in this binary trace concurrently, so membership rather
        // than exact sequence.
        let lines = LOGGER.0.lock().unwrap();
        for expected in [
            "-> Set: Ch1MaxVoltage, [0A]",
            "<- Set: Ch1MaxVoltage, [0A]",
            "-> Get: VersionString",
        ] {
            assert!(
                lines.iter().any(|line| line == expected),
                "missing trace line {expected:?} in {lines:?}"
            );
        }
    }
}
