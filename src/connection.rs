//! The transport seam between the codec and a MIDI output.
//!
//! Connection management, port discovery, and retry/timeout policy all live
//! with the transport; this module only defines the handoff surface.

use crate::encode::Encode;
use crate::message::CommandMessage;
use crate::MANUFACTURER_ID;

/// An open MIDI output capable of transmitting System Exclusive messages.
///
/// Implementors own the SysEx framing: `send_sysex` receives the manufacturer
/// ID and the encoded payload, and is responsible for prepending the ID,
/// wrapping the message in `F0`/`F7` delimiters, and transmitting it while
/// preserving message boundaries and per-connection ordering.
pub trait SysexOutput {
    type Error: std::error::Error;

    /// Frames and transmits one SysEx message.
    fn send_sysex(&mut self, manufacturer_id: [u8; 3], payload: &[u8]) -> Result<(), Self::Error>;
}

impl CommandMessage {
    /// Encodes this message and hands it to `out` under this protocol's
    /// [`MANUFACTURER_ID`].
    pub fn send_to<O: SysexOutput>(&self, out: &mut O) -> Result<(), O::Error> {
        out.send_sysex(MANUFACTURER_ID, &self.encode_to_vec())
    }
}
