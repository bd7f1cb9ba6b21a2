//! # Bit Codec
//!
//! Converts text to a sequence of single-bit values and back. Every character
//! occupies one 8-bit group, most significant bit first, so the codec only
//! accepts code points in `0..=0xFF`.
//!
//! Bits are stored one per `u8` (always `0` or `1`) so they can be OR-ed
//! straight into a cleared sample.

use crate::error::{Result, StegoError};

/// Number of bits used for one character.
pub const BITS_PER_CHAR: usize = 8;

/// Group value that makes [`decode_text`] stop. It is the first half of the
/// delimiter.
const STOP_GROUP: u8 = 0xFF;

/// Split a byte into its bits, MSB first.
pub fn byte_to_bits(byte: u8) -> [u8; 8] {
    let mut bits = [0u8; 8];
    for (i, bit) in bits.iter_mut().enumerate() {
        *bit = (byte >> (7 - i)) & 1;
    }
    bits
}

/// Pack up to 8 bits (MSB first) into a byte. Only the LSB of each entry is used.
pub fn bits_to_byte(bits: &[u8]) -> u8 {
    bits.iter()
        .take(BITS_PER_CHAR)
        .fold(0u8, |acc, bit| (acc << 1) | (bit & 1))
}

/// Encode `text` as 8 bits per character.
///
/// # Errors
/// - [`StegoError::UnsupportedCharacter`] if a code point is above `0xFF`.
///
/// # Example
/// ```
/// use lsb_stego::processing::bits::encode_text;
///
/// let bits = encode_text("H").unwrap();
/// assert_eq!(bits, vec![0, 1, 0, 0, 1, 0, 0, 0]);
/// ```
pub fn encode_text(text: &str) -> Result<Vec<u8>> {
    let mut bits = Vec::with_capacity(text.chars().count() * BITS_PER_CHAR);

    for (position, ch) in text.chars().enumerate() {
        let byte = u8::try_from(u32::from(ch))
            .map_err(|_| StegoError::UnsupportedCharacter { ch, position })?;
        bits.extend_from_slice(&byte_to_bits(byte));
    }

    Ok(bits)
}

/// Decode a bit sequence produced by [`encode_text`].
///
/// A trailing group shorter than 8 bits is ignored. Decoding stops at the
/// first group equal to `11111111` so a leftover delimiter fragment never
/// reaches the output.
pub fn decode_text(bits: &[u8]) -> String {
    bits.chunks_exact(BITS_PER_CHAR)
        .map(bits_to_byte)
        .take_while(|&byte| byte != STOP_GROUP)
        .map(char::from)
        .collect()
}
