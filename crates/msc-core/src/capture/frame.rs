//! Captured screen frames
//!
//! A [`Frame`] is the pixel grid every backend returns: height x width x 3
//! channels, 8 bits each, row-major RGB.
//!
//! # Examples
//!
//! ```
//! use msc_core::capture::Frame;
//!
//! let frame = Frame::black(100, 100);
//! assert_eq!(frame.dimensions(), (100, 100));
//! assert_eq!(frame.as_raw().len(), 100 * 100 * 3);
//! ```

use image::{DynamicImage, RgbImage};

use crate::error::{MscError, MscResult};

/// RGB8 pixel grid produced by one capture
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    inner: RgbImage,
}

impl Frame {
    /// Wraps an existing RGB image
    pub fn new(image: RgbImage) -> Self {
        Self { inner: image }
    }

    /// Creates an all-black frame
    pub fn black(width: u32, height: u32) -> Self {
        Self::new(RgbImage::new(width, height))
    }

    /// Decodes PNG or JPEG bytes returned by a device helper
    ///
    /// The format is sniffed from the leading bytes. Alpha is dropped.
    pub fn from_encoded(bytes: &[u8]) -> MscResult<Self> {
        if bytes.is_empty() {
            return Err(MscError::DecodeFailed {
                reason: "device returned no data".to_string(),
            });
        }

        let image = image::load_from_memory(bytes).map_err(|e| MscError::DecodeFailed {
            reason: e.to_string(),
        })?;

        Ok(Self::from(image))
    }

    /// Returns `(width, height)`
    pub fn dimensions(&self) -> (u32, u32) {
        self.inner.dimensions()
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// True when the frame has no pixels
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Row-major RGB bytes
    pub fn as_raw(&self) -> &[u8] {
        self.inner.as_raw()
    }

    /// Consumes the frame and returns the underlying image
    pub fn into_inner(self) -> RgbImage {
        self.inner
    }
}

impl From<DynamicImage> for Frame {
    fn from(image: DynamicImage) -> Self {
        Self::new(image.into_rgb8())
    }
}
