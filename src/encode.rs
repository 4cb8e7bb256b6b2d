/// A type that can be encoded into a sequence of bytes.
pub trait Encode {
    /// Returns the number of bytes this value will take when encoded.
    fn size(&self) -> usize;

    /// Encodes this instance into the provided byte slice.
    ///
    /// `data` must be at least [`size`](Encode::size) bytes long.
    fn encode(&self, data: &mut [u8]);

    /// Encodes this instance into a freshly allocated buffer of exactly
    /// [`size`](Encode::size) bytes.
    fn encode_to_vec(&self) -> Vec<u8> {
        let mut data = vec![0; self.size()];
        self.encode(&mut data);
        data
    }
}

impl Encode for u16 {
    fn size(&self) -> usize {
        size_of::<Self>()
    }

    fn encode(&self, data: &mut [u8]) {
        // Multi-byte protocol integers travel big-endian.
        data[..size_of::<Self>()].copy_from_slice(&self.to_be_bytes());
    }
}
