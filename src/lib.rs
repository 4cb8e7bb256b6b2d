//! Crate for controlling STM32-based CV voltage generators over MIDI System Exclusive.
//!
//! This crate is structured around two key traits: [`Encode`](encode::Encode) and [`Decode`](decode::Decode).
//! These traits are used to encode messages to be sent to the device and decode messages received from it.
//! A device-bound [`CommandMessage`](message::CommandMessage) implements [`Encode`](encode::Encode);
//! a host-bound [`Reply`](message::Reply) implements [`Decode`](decode::Decode) and offers typed views
//! over its value bytes (text, little-endian `f32`).
//!
//! The codec produces and consumes the SysEx *payload* only. Prepending the
//! manufacturer ID and wrapping the message in `F0`/`F7` delimiters is the
//! transport's job, reached through the [`SysexOutput`](connection::SysexOutput) seam.

pub mod connection;
pub mod decode;
pub mod encode;
pub mod message;
pub mod nibble;

pub use connection::SysexOutput;
pub use decode::{Decode, DecodeError, DecodeErrorKind};
pub use encode::Encode;
pub use message::{Command, CommandMessage, Parameter, Reply};

/// MIDI manufacturer ID identifying this protocol's SysEx traffic.
///
/// Expected immediately after the `F0` start delimiter of a full frame.
pub const MANUFACTURER_ID: [u8; 3] = [0x00, 0x21, 0x73];

/// SysEx start delimiter.
pub const SYSEX_START: u8 = 0xF0;

/// SysEx end delimiter.
pub const SYSEX_END: u8 = 0xF7;

/// Port name the device enumerates under. Callers use this to pick the
/// right MIDI port; port discovery itself is out of scope for this crate.
pub const DEVICE_NAME: &str = "STM32 USB Midi Port 1";
