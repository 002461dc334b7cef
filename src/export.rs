//! PNG export with a fixed output profile.
//!
//! Every icon is written as 8-bit-per-channel RGBA (truecolor with alpha,
//! never palettized). Only the pixel data is encoded, so no text, time,
//! gamma or colour profile chunks end up in the file.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use thiserror::Error;

/// Errors produced while encoding an icon.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("an error occurred while encoding the PNG: {0}")]
    PngEncoding(#[from] image::ImageError),
}

/// Encodes an RGBA image to PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut bytes, CompressionType::Best, FilterType::Adaptive);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    /// Returns the chunk types of a PNG stream in order.
    fn chunk_types(bytes: &[u8]) -> Vec<String> {
        let mut types = Vec::new();
        let mut offset = PNG_SIGNATURE.len();
        while offset + 8 <= bytes.len() {
            let length = u32::from_be_bytes(bytes[offset..offset + 4].try_into().unwrap()) as usize;
            let kind = String::from_utf8_lossy(&bytes[offset + 4..offset + 8]).into_owned();
            types.push(kind);
            offset += 12 + length;
        }
        types
    }

    #[test]
    fn writes_rgba_truecolor() {
        let img = RgbaImage::from_pixel(16, 16, Rgba([1, 2, 3, 128]));
        let bytes = encode_png(&img).unwrap();

        assert_eq!(bytes[..8], PNG_SIGNATURE);
        // IHDR data starts after signature, length and type.
        let ihdr = &bytes[16..29];
        assert_eq!(u32::from_be_bytes(ihdr[0..4].try_into().unwrap()), 16);
        assert_eq!(u32::from_be_bytes(ihdr[4..8].try_into().unwrap()), 16);
        assert_eq!(ihdr[8], 8, "bit depth");
        assert_eq!(ihdr[9], 6, "color type RGBA");
    }

    #[test]
    fn no_metadata_chunks() {
        let img = RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255]));
        let bytes = encode_png(&img).unwrap();
        let types = chunk_types(&bytes);

        assert_eq!(types.first().map(String::as_str), Some("IHDR"));
        assert_eq!(types.last().map(String::as_str), Some("IEND"));
        assert!(
            types.iter().all(|t| matches!(t.as_str(), "IHDR" | "IDAT" | "IEND")),
            "unexpected chunks: {types:?}"
        );
    }

    #[test]
    fn alpha_survives_round_trip() {
        let img = RgbaImage::from_fn(4, 4, |x, _| {
            if x < 2 {
                Rgba([0, 0, 0, 0])
            } else {
                Rgba([10, 200, 30, 255])
            }
        });
        let bytes = encode_png(&img).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, img);
    }
}
