//! Bicubic resampling with edge sharpening.
//!
//! Icons are downscaled with a Catmull-Rom (bicubic) filter and then passed
//! through an unsharp mask, which restores the edge contrast that plain
//! bicubic smoothing loses at small sizes.
//!
//! Both passes run on premultiplied alpha in `f32`, so the colour stored in
//! fully transparent pixels never bleeds into the visible edge.

use image::imageops::{self, FilterType};
use image::{Rgba, Rgba32FImage, RgbaImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::icon::SourceImage;

/// Errors produced while resampling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResampleError {
    #[error("target size must be greater than zero")]
    ZeroSize,
}

/// Unsharp mask parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharpenSettings {
    /// Standard deviation of the blur the mask is built from.
    pub sigma: f32,

    /// Minimum per-channel difference before a pixel is sharpened.
    pub threshold: i32,
}

impl Default for SharpenSettings {
    fn default() -> Self {
        Self {
            sigma: 0.5,
            threshold: 2,
        }
    }
}

/// Options passed to every [`resize`] call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResampleOptions {
    /// Sharpening applied after the bicubic pass. `None` disables it.
    pub sharpen: Option<SharpenSettings>,
}

impl Default for ResampleOptions {
    fn default() -> Self {
        Self {
            sharpen: Some(SharpenSettings::default()),
        }
    }
}

impl ResampleOptions {
    /// Plain bicubic resampling without the sharpening pass.
    pub fn without_sharpening() -> Self {
        Self { sharpen: None }
    }
}

/// Resizes the master image to a `size x size` icon.
///
/// Always reads the original pixels; the source is never modified.
pub fn resize(
    source: &SourceImage,
    size: u32,
    options: &ResampleOptions,
) -> Result<RgbaImage, ResampleError> {
    resize_rgba(source.pixels(), size, options)
}

/// Resizes an RGBA buffer to `size x size`.
///
/// A buffer that already has the requested dimensions is returned as an
/// unmodified copy, so resizing a result to its own size is a no-op.
pub fn resize_rgba(
    image: &RgbaImage,
    size: u32,
    options: &ResampleOptions,
) -> Result<RgbaImage, ResampleError> {
    if size == 0 {
        return Err(ResampleError::ZeroSize);
    }

    if image.dimensions() == (size, size) {
        return Ok(image.clone());
    }

    let resized = imageops::resize(&premultiply(image), size, size, FilterType::CatmullRom);

    Ok(match options.sharpen {
        Some(settings) => unpremultiply(&sharpen(&resized, &settings)),
        None => unpremultiply(&resized),
    })
}

// ============================================================================
// Premultiplied Alpha
// ============================================================================

fn premultiply(image: &RgbaImage) -> Rgba32FImage {
    Rgba32FImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0.map(|c| c as f32 / 255.0);
        Rgba([r * a, g * a, b * a, a])
    })
}

/// Converts back to straight alpha. Fully transparent pixels become
/// transparent black.
fn unpremultiply(image: &Rgba32FImage) -> RgbaImage {
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = to_u8(a);
        if alpha == 0 {
            return Rgba([0, 0, 0, 0]);
        }
        Rgba([to_u8(r / a), to_u8(g / a), to_u8(b / a), alpha])
    })
}

fn to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Unsharp mask over a premultiplied buffer.
///
/// All four channels get the same correction, so a flat colour keeps its
/// value where only the alpha changes.
fn sharpen(image: &Rgba32FImage, settings: &SharpenSettings) -> Rgba32FImage {
    let blurred = imageops::blur(image, settings.sigma);
    let threshold = settings.threshold as f32 / 255.0;

    let mut sharpened = image.clone();
    for (pixel, soft) in sharpened.pixels_mut().zip(blurred.pixels()) {
        for (channel, &smooth) in pixel.0.iter_mut().zip(soft.0.iter()) {
            let diff = *channel - smooth;
            if diff.abs() > threshold {
                *channel = (*channel + diff).clamp(0.0, 1.0);
            }
        }
        // Premultiplied colour can never exceed alpha.
        let alpha = pixel.0[3];
        for channel in &mut pixel.0[..3] {
            *channel = channel.min(alpha);
        }
    }
    sharpened
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(size: u32) -> RgbaImage {
        RgbaImage::from_fn(size, size, |x, y| {
            if (x / 64 + y / 64) % 2 == 0 {
                Rgba([240, 40, 40, 255])
            } else {
                Rgba([20, 20, 200, 255])
            }
        })
    }

    #[test]
    fn produces_exact_size() {
        let source = SourceImage::from_rgba(checkerboard(1024)).unwrap();
        for size in [29, 36, 107, 600] {
            let icon = resize(&source, size, &ResampleOptions::default()).unwrap();
            assert_eq!(icon.dimensions(), (size, size));
        }
    }

    #[test]
    fn zero_size_is_rejected() {
        let source = SourceImage::from_rgba(checkerboard(1024)).unwrap();
        assert_eq!(
            resize(&source, 0, &ResampleOptions::default()),
            Err(ResampleError::ZeroSize)
        );
    }

    #[test]
    fn does_not_mutate_source() {
        let original = checkerboard(1024);
        let source = SourceImage::from_rgba(original.clone()).unwrap();
        let _ = resize(&source, 64, &ResampleOptions::default()).unwrap();
        assert_eq!(source.pixels(), &original);
    }

    #[test]
    fn deterministic() {
        let source = SourceImage::from_rgba(checkerboard(1024)).unwrap();
        let first = resize(&source, 87, &ResampleOptions::default()).unwrap();
        let second = resize(&source, 87, &ResampleOptions::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn resizing_to_same_size_is_identity() {
        let source = SourceImage::from_rgba(checkerboard(1024)).unwrap();
        let options = ResampleOptions::default();

        let direct = resize(&source, 512, &options).unwrap();
        let twice = resize_rgba(&direct, 512, &options).unwrap();
        assert_eq!(direct, twice);

        let full = resize(&source, 1024, &options).unwrap();
        assert_eq!(&full, source.pixels());
    }

    #[test]
    fn transparent_region_stays_transparent() {
        // Top-left quadrant fully transparent.
        let img = RgbaImage::from_fn(1024, 1024, |x, y| {
            if x < 512 && y < 512 {
                Rgba([0, 0, 0, 0])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let source = SourceImage::from_rgba(img).unwrap();
        let icon = resize(&source, 72, &ResampleOptions::default()).unwrap();

        assert_eq!(icon.get_pixel(4, 4)[3], 0);
        assert_eq!(icon.get_pixel(60, 60)[3], 255);
    }

    #[test]
    fn transparent_edge_keeps_colour() {
        // White on the right, transparent black on the left.
        let img = RgbaImage::from_fn(1024, 1024, |x, _| {
            if x < 500 {
                Rgba([0, 0, 0, 0])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let source = SourceImage::from_rgba(img).unwrap();

        for options in [ResampleOptions::default(), ResampleOptions::without_sharpening()] {
            let icon = resize(&source, 29, &options).unwrap();
            let edge: Vec<_> = icon.pixels().filter(|p| p[3] > 0 && p[3] < 255).collect();
            assert!(!edge.is_empty(), "expected a partially transparent edge");
            for pixel in edge {
                assert!(
                    pixel[0] >= 250 && pixel[1] >= 250 && pixel[2] >= 250,
                    "edge pixel darkened: {pixel:?}"
                );
            }
        }
    }

    #[test]
    fn premultiply_roundtrip_is_exact_for_opaque_pixels() {
        let img = checkerboard(8);
        assert_eq!(unpremultiply(&premultiply(&img)), img);
    }

    #[test]
    fn sharpening_changes_edges() {
        let source = SourceImage::from_rgba(checkerboard(1024)).unwrap();
        let sharp = resize(&source, 100, &ResampleOptions::default()).unwrap();
        let soft = resize(&source, 100, &ResampleOptions::without_sharpening()).unwrap();
        assert_eq!(sharp.dimensions(), soft.dimensions());
        assert_ne!(sharp, soft);
    }

    #[test]
    fn options_json_format() {
        let json = serde_json::to_string(&ResampleOptions::default()).unwrap();
        assert!(json.contains("\"sharpen\""));
        assert!(json.contains("\"sigma\""));

        let restored: ResampleOptions = serde_json::from_str("{\"sharpen\":null}").unwrap();
        assert_eq!(restored, ResampleOptions::without_sharpening());
    }
}
