//! # Error Types
//!
//! Errors raised by the LSB codec. The image and CLI layers wrap these in
//! `anyhow::Error`; callers that need to branch on the kind can recover them
//! with `downcast_ref::<StegoError>()`.

use thiserror::Error;

/// Failure conditions of the embed/extract core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StegoError {
    /// Payload bits plus the delimiter need more samples than the buffer has.
    #[error("Secret message too large to fit: need {required} samples but only {available} available")]
    CapacityExceeded { required: usize, available: usize },

    /// The buffer was scanned to the end without meeting the delimiter.
    #[error("No embedded message found after scanning {scanned} samples")]
    DelimiterNotFound { scanned: usize },

    /// A computed sample broke the LSB-only mutation rule. Indicates a bug.
    #[error("Internal error: sample {index} computed as {value:#04x} breaks the LSB-only rule")]
    InvariantViolation { index: usize, value: u8 },

    /// Character does not fit in a single 8-bit group.
    #[error("Character {ch:?} at position {position} is outside the 8-bit range")]
    UnsupportedCharacter { ch: char, position: usize },

    /// U+00FF encodes as `11111111`, which the decoder treats as end of text.
    #[error("Character U+00FF at position {position} is reserved by the delimiter")]
    ReservedCharacter { position: usize },
}

/// Result alias for the codec.
pub type Result<T> = std::result::Result<T, StegoError>;
