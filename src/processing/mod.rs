//! # Payload Processing
//!
//! LSB steganography split into layers:
//!
//! - [`bits`]: text to bits and back, 8 bits per character
//! - [`delimiter`]: the 16-bit end-of-payload marker
//! - [`lsb`]: embed/extract over a flat buffer of samples
//! - [`steganography`]: the same over image files and encoded image bytes

pub mod bits;
pub mod delimiter;
pub mod lsb;
pub mod steganography;

// Re-export main functions for convenience
pub use lsb::{capacity_chars, embed, embed_in_place, extract, required_samples};
pub use steganography::{
    embed_text_bytes, embed_text_file, embed_text_image, extract_text_bytes, extract_text_file,
    extract_text_image, image_capacity, PixelGrid,
};
