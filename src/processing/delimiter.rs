//! # Delimiter Protocol
//!
//! The end of the payload is marked by the fixed 16-bit pattern
//! `1111111111111110`. There is no length prefix; the decoder scans bits in
//! embedding order and stops at the first window of 16 bits equal to the
//! pattern.

/// Length of the delimiter in bits.
pub const DELIMITER_LEN: usize = 16;

/// Fifteen 1-bits followed by one 0-bit.
pub const DELIMITER: [u8; DELIMITER_LEN] = [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0];

/// The delimiter as a 16-bit word, first bit in the MSB.
const DELIMITER_WORD: u16 = 0xFFFE;

/// Append the delimiter to an encoded payload.
pub fn append_delimiter(bits: &mut Vec<u8>) {
    bits.extend_from_slice(&DELIMITER);
}

/// Return `bits` without its trailing delimiter, or `None` if it does not end
/// with one.
pub fn strip_delimiter(bits: &[u8]) -> Option<&[u8]> {
    bits.strip_suffix(&DELIMITER[..])
}

/// Incremental matcher for the delimiter.
///
/// Keeps the last 16 bits in a shift register so each step is O(1).
#[derive(Debug, Default, Clone)]
pub struct DelimiterScanner {
    window: u16,
    seen: usize,
}

impl DelimiterScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one bit. Returns `true` once the last 16 bits fed equal the
    /// delimiter.
    pub fn push(&mut self, bit: u8) -> bool {
        self.window = (self.window << 1) | u16::from(bit & 1);
        self.seen += 1;
        self.seen >= DELIMITER_LEN && self.window == DELIMITER_WORD
    }

    /// Number of bits fed so far.
    pub fn seen(&self) -> usize {
        self.seen
    }
}
