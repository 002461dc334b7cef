//! Source image types.
//!
//! This module provides [`SourceImage`], the validated master image every
//! icon in a run is derived from.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::error::{InputError, UndersizedDimension};

/// Smallest accepted width and height of a master image, in pixels.
pub const MINIMUM_SOURCE_SIZE: u32 = 1024;

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if width equals height.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Checks this size against the master image requirements.
    ///
    /// The minimum is checked before squareness so an undersized image
    /// reports which dimension is short. This order is deliberate: a
    /// 1000x2000 image is `TooSmall { Width }`, not `NotSquare`.
    pub fn check_source(&self) -> Result<(), InputError> {
        let narrow = self.width < MINIMUM_SOURCE_SIZE;
        let short = self.height < MINIMUM_SOURCE_SIZE;
        let dimension = match (narrow, short) {
            (true, true) => Some(UndersizedDimension::Both),
            (true, false) => Some(UndersizedDimension::Width),
            (false, true) => Some(UndersizedDimension::Height),
            (false, false) => None,
        };

        if let Some(dimension) = dimension {
            return Err(InputError::TooSmall {
                width: self.width,
                height: self.height,
                minimum: MINIMUM_SOURCE_SIZE,
                dimension,
            });
        }

        if !self.is_square() {
            return Err(InputError::NotSquare {
                width: self.width,
                height: self.height,
            });
        }

        Ok(())
    }
}

/// The master image, validated and immutable.
///
/// A `SourceImage` is always square and at least
/// [`MINIMUM_SOURCE_SIZE`] pixels on each side. The pixel buffer is only
/// reachable through a shared borrow, so every icon of a run is resampled
/// from the same original data.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    pixels: RgbaImage,
}

impl SourceImage {
    /// Decodes a PNG file and validates it as a master image.
    ///
    /// Files that are missing or not valid PNG data are reported as
    /// [`InputError::Unreadable`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        let unreadable = |message: String| InputError::Unreadable {
            path: path.to_path_buf(),
            message,
        };

        let file = File::open(path).map_err(|e| unreadable(e.to_string()))?;
        let decoded = image::load(BufReader::new(file), ImageFormat::Png)
            .map_err(|e| unreadable(e.to_string()))?;

        log::debug!(
            "Decoded {} ({}x{}, {:?})",
            path.display(),
            decoded.width(),
            decoded.height(),
            decoded.color()
        );

        Self::from_rgba(decoded.to_rgba8())
    }

    /// Wraps an already decoded RGBA buffer, validating its dimensions.
    pub fn from_rgba(pixels: RgbaImage) -> Result<Self, InputError> {
        SizePx::new(pixels.width(), pixels.height()).check_source()?;
        Ok(Self { pixels })
    }

    /// Returns the pixel dimensions of the image.
    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.pixels.width(), self.pixels.height())
    }

    /// Returns the edge length of the square image.
    pub fn size(&self) -> u32 {
        self.pixels.width()
    }

    /// Returns the original pixel data.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}
