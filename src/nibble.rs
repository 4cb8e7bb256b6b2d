use crate::decode::{Decode, DecodeError, DecodeErrorKind};
use crate::encode::Encode;

/// A payload buffer whose bytes travel as nibble pairs on the wire.
///
/// Each logical byte expands to two wire bytes: the low nibble at the even
/// offset, the high nibble at the odd offset. A byte `0xAB` therefore encodes
/// as `0x0B, 0x0A`. Every wire byte stays within `0x00..=0x0F`, well clear of
/// the MIDI status-byte range, at the cost of doubling the payload size.
///
/// # Invariants
///
/// - Encoding always produces exactly `2 * len` wire bytes.
/// - A well-formed wire payload always has an even byte count; decoding an
///   odd-length payload fails with [`DecodeErrorKind::OddPayloadLength`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NibblePacked(Vec<u8>);

impl NibblePacked {
    /// Wraps logical payload bytes for nibble-pair encoding.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The logical payload bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the inner logical byte buffer.
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl Encode for NibblePacked {
    fn size(&self) -> usize {
        self.0.len() * 2
    }

    fn encode(&self, data: &mut [u8]) {
        for (i, &byte) in self.0.iter().enumerate() {
            data[2 * i] = byte & 0x0F;
            data[2 * i + 1] = byte >> 4;
        }
    }
}

impl Decode for NibblePacked {
    /// Consumes the remainder of `data`; the wire format carries no length
    /// field, so the payload runs to the end of the message.
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        if data.len() % 2 != 0 {
            return Err(DecodeError::new::<Self>(DecodeErrorKind::OddPayloadLength));
        }

        let mut bytes = Vec::with_capacity(data.len() / 2);
        while !data.is_empty() {
            let low = u8::decode(data)?;
            let high = u8::decode(data)?;
            bytes.push(((high & 0x0F) << 4) | (low & 0x0F));
        }

        Ok(Self(bytes))
    }
}
