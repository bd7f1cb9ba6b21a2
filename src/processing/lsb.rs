//! # LSB Embedding Core
//!
//! Embeds text into, and extracts it from, a flattened buffer of 8-bit
//! samples (row-major, R/G/B interleaved). One payload bit goes into the
//! least significant bit of one sample, in buffer order:
//!
//! ```text
//! bits    = encode_text(payload) ++ 1111111111111110
//! out[i]  = (in[i] & 0xFE) | bits[i]     for i < bits.len()
//! out[i]  = in[i]                        otherwise
//! ```
//!
//! Nothing here does I/O or logs; image loading and saving live in
//! [`super::steganography`].

use super::bits::{decode_text, encode_text, BITS_PER_CHAR};
use super::delimiter::{append_delimiter, strip_delimiter, DelimiterScanner, DELIMITER_LEN};
use crate::error::{Result, StegoError};

/// Code point whose bit group collides with the delimiter's leading ones.
const RESERVED_CHAR: char = '\u{FF}';

/// Number of samples needed to embed `payload`, delimiter included.
pub fn required_samples(payload: &str) -> Result<usize> {
    Ok(payload_bits(payload)?.len())
}

/// Largest number of characters a buffer of `sample_count` samples can hold.
pub fn capacity_chars(sample_count: usize) -> usize {
    sample_count.saturating_sub(DELIMITER_LEN) / BITS_PER_CHAR
}

/// Embed `payload` into a copy of `buffer`.
///
/// The input is only borrowed, so on any error the caller's buffer is
/// untouched and no output exists.
///
/// Accepted payloads use code points `U+0000..=U+00FE`. U+00FF is refused
/// even though it fits in 8 bits: its group `11111111` is where
/// [`extract`] stops reading, and it is the only character that can put the
/// delimiter's run of fifteen 1-bits inside a payload. Refusing it keeps
/// `extract(embed(b, t)) == t` true for every accepted `t`.
///
/// # Errors
/// - [`StegoError::UnsupportedCharacter`] if a code point is above `0xFF`
/// - [`StegoError::ReservedCharacter`] if the payload contains U+00FF
/// - [`StegoError::CapacityExceeded`] if `buffer` has too few samples
///
/// # Example
/// ```
/// use lsb_stego::processing::lsb::{embed, extract};
/// use lsb_stego::StegoError;
///
/// let cover = vec![0u8; 40];
/// let stego = embed(&cover, "Hi").unwrap();
/// assert_eq!(extract(&stego).unwrap(), "Hi");
///
/// assert_eq!(
///     embed(&cover, "\u{FF}"),
///     Err(StegoError::ReservedCharacter { position: 0 })
/// );
/// ```
pub fn embed(buffer: &[u8], payload: &str) -> Result<Vec<u8>> {
    let bits = payload_bits(payload)?;
    check_capacity(bits.len(), buffer.len())?;

    let mut output = buffer.to_vec();
    write_bits(&mut output, &bits)?;
    Ok(output)
}

/// Embed `payload` directly into an owned buffer.
///
/// Accepts the same payloads as [`embed`]; U+00FF is refused.
///
/// Capacity and encoding are checked before the first write, so an error
/// leaves `buffer` byte-identical. Returns the number of samples modified.
pub fn embed_in_place(buffer: &mut [u8], payload: &str) -> Result<usize> {
    let bits = payload_bits(payload)?;
    check_capacity(bits.len(), buffer.len())?;

    write_bits(buffer, &bits)?;
    Ok(bits.len())
}

/// Recover the text embedded in `buffer`.
///
/// Scanning stops at the first occurrence of the delimiter in embedding
/// order. A payload that itself contained the delimiter pattern would be cut
/// short there; [`embed`] refuses such payloads.
///
/// # Errors
/// - [`StegoError::DelimiterNotFound`] if the delimiter never appears
pub fn extract(buffer: &[u8]) -> Result<String> {
    let mut scanner = DelimiterScanner::new();
    let mut bits = Vec::new();

    for &sample in buffer {
        let bit = sample & 1;
        bits.push(bit);
        if scanner.push(bit) {
            let payload = strip_delimiter(&bits).ok_or(StegoError::InvariantViolation {
                index: bits.len() - 1,
                value: sample,
            })?;
            return Ok(decode_text(payload));
        }
    }

    Err(StegoError::DelimiterNotFound {
        scanned: scanner.seen(),
    })
}

fn payload_bits(payload: &str) -> Result<Vec<u8>> {
    let mut bits = encode_text(payload)?;

    if let Some(position) = payload.chars().position(|ch| ch == RESERVED_CHAR) {
        return Err(StegoError::ReservedCharacter { position });
    }

    append_delimiter(&mut bits);
    Ok(bits)
}

fn check_capacity(required: usize, available: usize) -> Result<()> {
    if required > available {
        return Err(StegoError::CapacityExceeded {
            required,
            available,
        });
    }
    Ok(())
}

/// Overwrite the LSB of `samples[i]` with `bits[i]`. Capacity must already
/// be checked.
fn write_bits(samples: &mut [u8], bits: &[u8]) -> Result<()> {
    for (index, (sample, &bit)) in samples.iter_mut().zip(bits).enumerate() {
        let value = (*sample & 0xFE) | bit;

        if value & 0xFE != *sample & 0xFE || value & 1 != bit {
            return Err(StegoError::InvariantViolation { index, value });
        }

        *sample = value;
    }
    Ok(())
}
