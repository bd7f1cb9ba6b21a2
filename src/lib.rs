//! # lsb-stego
//!
//! Hides a text payload in the least significant bits of an image's RGB
//! samples and recovers it later. The end of the payload is marked by the
//! 16-bit delimiter `1111111111111110`, so no length is stored.
//!
//! - [`processing`]: the codec, over sample buffers and over image files
//! - [`common`]: configuration and logging for the binaries
//! - [`error`]: codec error kinds

pub mod common;
pub mod error;
pub mod processing;

pub use error::{Result, StegoError};
pub use processing::{embed, extract};
