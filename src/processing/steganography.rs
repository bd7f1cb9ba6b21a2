//! # Image Steganography
//!
//! Connects the LSB core in [`super::lsb`] to real image files using the
//! `image` crate.
//!
//! ## Encoding Process
//! 1. Decode the cover image and convert it to 8-bit RGB
//! 2. Flatten the pixels row by row into `R, G, B, R, G, B, ...` samples
//! 3. Embed the text plus delimiter into the sample LSBs
//! 4. Rebuild an RGB image of the same size and save it losslessly
//!
//! ## Decoding Process
//! 1. Decode the stego image and convert it to 8-bit RGB
//! 2. Read sample LSBs until the delimiter appears
//! 3. Convert the bits before the delimiter back to text
//!
//! ## Capacity
//! An image holds `(width * height * 3 - 16) / 8` characters.
//! Example: an 800x600 image holds 179 998 characters.
//!
//! Only formats that store 8-bit RGB samples exactly are accepted as outputs
//! (PNG, BMP, TIFF, TGA, QOI, WebP). JPEG recompresses, GIF quantizes to a
//! palette and ICO cannot be read back as RGB, so each would lose the payload.

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat, RgbImage};
use log::debug;
use std::io::Cursor;
use std::path::Path;

use super::lsb;

/// Samples per pixel in the flattened view.
pub const CHANNELS: usize = 3;

/// A decoded image as a flat buffer of RGB samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    pub width: u32,
    pub height: u32,
    /// Row-major, channel-interleaved; `width * height * 3` entries.
    pub samples: Vec<u8>,
}

impl PixelGrid {
    /// Convert any colour model to 8-bit RGB and flatten it. Alpha is dropped.
    pub fn from_image(img: DynamicImage) -> Self {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        Self {
            width,
            height,
            samples: rgb.into_raw(),
        }
    }

    /// Rebuild the RGB image.
    pub fn into_image(self) -> Result<RgbImage> {
        let (width, height) = (self.width, self.height);
        RgbImage::from_raw(width, height, self.samples).with_context(|| {
            format!("Sample buffer does not match a {}x{} RGB image", width, height)
        })
    }

    /// Characters this grid can carry.
    pub fn capacity(&self) -> usize {
        lsb::capacity_chars(self.samples.len())
    }
}

/// Embed text into an encoded image held in memory.
///
/// # Arguments
/// - `image_bytes`: Raw bytes of the cover image (any format the `image` crate reads)
/// - `text`: Payload; every character must be in `U+0000..=U+00FE`
///
/// # Returns
/// - `Ok(Vec<u8>)`: PNG image bytes carrying the payload
///
/// # Errors
/// - Image can't be decoded
/// - Payload is rejected or too large (a [`crate::StegoError`] inside the `anyhow::Error`)
/// - Encoding to PNG fails
///
/// # Example
/// ```ignore
/// let cover = std::fs::read("cover.png")?;
/// let stego = embed_text_bytes(&cover, "Secret message")?;
/// std::fs::write("stego.png", stego)?;
/// ```
pub fn embed_text_bytes(image_bytes: &[u8], text: &str) -> Result<Vec<u8>> {
    let img = image::load_from_memory(image_bytes).context("Failed to decode cover image")?;
    embed_text_image(img, text)
}

/// Embed text into an already decoded image and encode the result as PNG.
///
/// Any error here is about the payload or PNG encoding, never about the
/// input bytes.
pub fn embed_text_image(img: DynamicImage, text: &str) -> Result<Vec<u8>> {
    let grid = embed_into_image(img, text)?;

    let mut output_bytes = Vec::new();
    grid.into_image()?
        .write_to(&mut Cursor::new(&mut output_bytes), ImageFormat::Png)
        .context("Failed to encode stego image as PNG")?;

    Ok(output_bytes)
}

/// Extract the text embedded in an encoded image held in memory.
pub fn extract_text_bytes(image_bytes: &[u8]) -> Result<String> {
    let img = image::load_from_memory(image_bytes).context("Failed to decode stego image")?;
    extract_text_image(img)
}

/// Extract the text embedded in an already decoded image.
pub fn extract_text_image(img: DynamicImage) -> Result<String> {
    let grid = PixelGrid::from_image(img);
    debug!(
        "Scanning {}x{} image ({} samples) for delimiter",
        grid.width,
        grid.height,
        grid.samples.len()
    );

    let text = lsb::extract(&grid.samples)?;
    debug!("Recovered {} characters", text.chars().count());
    Ok(text)
}

/// Embed text into the image at `input` and write the result to `output`.
///
/// The output format follows the extension of `output`. Formats that do not
/// keep every sample exact are rejected before anything is written.
pub fn embed_text_file(input: &Path, text: &str, output: &Path) -> Result<()> {
    let format = ImageFormat::from_path(output)
        .with_context(|| format!("Unsupported output format: {}", output.display()))?;
    if !preserves_samples(format) {
        anyhow::bail!(
            "Output format {:?} does not store RGB samples losslessly and would destroy the embedded message: {}",
            format,
            output.display()
        );
    }

    let img = open(input)?;
    let grid = embed_into_image(img, text)?;

    grid.into_image()?
        .save_with_format(output, format)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    debug!("Stego image saved at {}", output.display());
    Ok(())
}

/// Extract the text embedded in the image at `input`.
pub fn extract_text_file(input: &Path) -> Result<String> {
    extract_text_image(open(input)?)
}

/// Characters that fit in the image at `input`.
pub fn image_capacity(input: &Path) -> Result<usize> {
    Ok(PixelGrid::from_image(open(input)?).capacity())
}

fn open(path: &Path) -> Result<DynamicImage> {
    image::open(path).with_context(|| format!("Failed to open image {}", path.display()))
}

fn embed_into_image(img: DynamicImage, text: &str) -> Result<PixelGrid> {
    let mut grid = PixelGrid::from_image(img);
    debug!(
        "Embedding {} characters into {}x{} image ({} samples)",
        text.chars().count(),
        grid.width,
        grid.height,
        grid.samples.len()
    );

    let written = lsb::embed_in_place(&mut grid.samples, text)?;
    debug!("Modified LSBs of {} samples", written);

    Ok(grid)
}

/// Output formats whose encoders write 8-bit RGB samples back unchanged.
fn preserves_samples(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Png
            | ImageFormat::Bmp
            | ImageFormat::Tiff
            | ImageFormat::Tga
            | ImageFormat::Qoi
            | ImageFormat::WebP
    )
}
