//! PNG encoding for captured frames
//!
//! Frames are encoded losslessly as 8-bit RGB PNG. The encoder is exposed
//! both as free functions and as the [`FrameEncoder`] trait so the service
//! can be handed a different implementation in tests.
//!
//! # Examples
//!
//! ```
//! use msc_core::{capture::Frame, encode::encode_png};
//!
//! let png = encode_png(&Frame::black(100, 100)).unwrap();
//! assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
//! ```

use std::io::Cursor;

use image::{
    ExtendedColorType, ImageEncoder,
    codecs::png::{CompressionType, FilterType, PngEncoder},
};

use crate::{
    capture::Frame,
    error::{MscError, MscResult},
    model::EncodedImage,
};

/// PNG file signature
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Encodes a frame as PNG with default compression
pub fn encode_png(frame: &Frame) -> MscResult<Vec<u8>> {
    encode_png_with_compression(frame, CompressionType::Default)
}

/// Encodes a frame as PNG with the given compression level
///
/// # Examples
///
/// ```
/// use image::codecs::png::CompressionType;
/// use msc_core::{capture::Frame, encode::encode_png_with_compression};
///
/// let frame = Frame::black(64, 64);
/// let fast = encode_png_with_compression(&frame, CompressionType::Fast).unwrap();
/// let best = encode_png_with_compression(&frame, CompressionType::Best).unwrap();
/// assert!(best.len() <= fast.len());
/// ```
pub fn encode_png_with_compression(
    frame: &Frame,
    compression: CompressionType,
) -> MscResult<Vec<u8>> {
    let (width, height) = frame.dimensions();
    if frame.is_empty() {
        return Err(MscError::EncodingFailed {
            format: "png".to_string(),
            reason: format!("frame is empty ({}x{})", width, height),
        });
    }

    let mut output = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(Cursor::new(&mut output), compression, FilterType::Adaptive);

    encoder
        .write_image(frame.as_raw(), width, height, ExtendedColorType::Rgb8)
        .map_err(|e| MscError::EncodingFailed {
            format: "png".to_string(),
            reason: e.to_string(),
        })?;

    Ok(output)
}

/// Turns a captured frame into transportable image bytes
pub trait FrameEncoder: Send + Sync {
    /// Encodes `frame`
    fn encode(&self, frame: &Frame) -> MscResult<EncodedImage>;
}

/// [`FrameEncoder`] producing PNG
#[derive(Debug, Clone, Copy)]
pub struct PngFrameEncoder {
    compression: CompressionType,
}

impl PngFrameEncoder {
    /// Creates an encoder using `compression`
    pub fn new(compression: CompressionType) -> Self {
        Self { compression }
    }
}

impl Default for PngFrameEncoder {
    fn default() -> Self {
        Self::new(CompressionType::Default)
    }
}

impl FrameEncoder for PngFrameEncoder {
    fn encode(&self, frame: &Frame) -> MscResult<EncodedImage> {
        encode_png_with_compression(frame, self.compression).map(EncodedImage::png)
    }
}
