//! Pure Rust decoding backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Format sniffing | `image::ImageReader::with_guessed_format` (magic bytes) |
//! | Identify | `ImageReader::into_dimensions` (header only) |
//! | Decode (PNG, JPEG, GIF, TIFF, WebP) | `image` crate decoders |
//! | Luminance | [`grayscale::to_grayscale`](super::grayscale::to_grayscale) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::grayscale::to_grayscale;
use crate::types::PixelGrid;
use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use std::sync::LazyLock;
use tracing::debug;

/// Formats whose decoders are compiled in. PNG and JPEG are the baseline
/// every caller can rely on.
const DECODER_CANDIDATES: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::Tiff,
    ImageFormat::WebP,
];

static SUPPORTED_FORMATS: LazyLock<Vec<ImageFormat>> = LazyLock::new(|| {
    DECODER_CANDIDATES
        .iter()
        .copied()
        .filter(|fmt| fmt.reading_enabled())
        .collect()
});

/// Returns the set of input formats that have working decoders compiled in.
pub fn supported_input_formats() -> &'static [ImageFormat] {
    &SUPPORTED_FORMATS
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Sniff the format from magic bytes and reject anything we cannot decode.
fn open(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, BackendError> {
    if bytes.is_empty() {
        return Err(BackendError::Empty);
    }
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| BackendError::Decode(e.to_string()))?;

    match reader.format() {
        Some(fmt) if SUPPORTED_FORMATS.contains(&fmt) => Ok(reader),
        Some(fmt) => Err(BackendError::UnsupportedFormat(format!("{fmt:?}"))),
        None => Err(BackendError::UnsupportedFormat(
            "unrecognized image data".to_string(),
        )),
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError> {
        let (width, height) = open(bytes)?
            .into_dimensions()
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(Dimensions { width, height })
    }

    fn decode_luminance(&self, bytes: &[u8]) -> Result<PixelGrid, BackendError> {
        let reader = open(bytes)?;
        let format = reader.format();
        let img = reader
            .decode()
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        debug!(
            ?format,
            width = img.width(),
            height = img.height(),
            "Decoded source image"
        );
        Ok(to_grayscale(&img))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};

    fn encode_png(img: &RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        image::codecs::png::PngEncoder::new(&mut buf)
            .write_image(
                img.as_raw(),
                img.width(),
                img.height(),
                ExtendedColorType::Rgba8,
            )
            .unwrap();
        buf
    }

    fn encode_jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut buf = Vec::new();
        image::codecs::jpeg::JpegEncoder::new(&mut buf)
            .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
            .unwrap();
        buf
    }

    #[test]
    fn baseline_formats_are_supported() {
        let formats = supported_input_formats();
        assert!(formats.contains(&ImageFormat::Png));
        assert!(formats.contains(&ImageFormat::Jpeg));
    }

    #[test]
    fn identify_synthetic_jpeg() {
        let bytes = encode_jpeg(200, 150);
        let dims = RustBackend::new().identify(&bytes).unwrap();
        assert_eq!(dims.width, 200);
        assert_eq!(dims.height, 150);
    }

    #[test]
    fn decode_png_to_luminance() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([255, 255, 255, 255]));
        img.put_pixel(1, 0, image::Rgba([0, 0, 0, 0]));
        let grid = RustBackend::new().decode_luminance(&encode_png(&img)).unwrap();

        assert_eq!((grid.width(), grid.height()), (2, 1));
        assert!((grid.get(0, 0) - 1.0).abs() < 1e-6);
        assert_eq!(grid.get(1, 0), 0.0);
    }

    #[test]
    fn decode_jpeg_keeps_dimensions() {
        let grid = RustBackend::new()
            .decode_luminance(&encode_jpeg(31, 17))
            .unwrap();
        assert_eq!((grid.width(), grid.height()), (31, 17));
    }

    #[test]
    fn empty_input_errors() {
        let err = RustBackend::new().decode_luminance(&[]).unwrap_err();
        assert!(matches!(err, BackendError::Empty));
    }

    #[test]
    fn garbage_input_is_unsupported() {
        let err = RustBackend::new()
            .decode_luminance(b"definitely not an image")
            .unwrap_err();
        assert!(matches!(err, BackendError::UnsupportedFormat(_)));
    }

    #[test]
    fn truncated_png_is_decode_error() {
        let bytes = encode_png(&RgbaImage::new(64, 64));
        let err = RustBackend::new()
            .decode_luminance(&bytes[..bytes.len() / 2])
            .unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)), "got {err:?}");
    }
}
