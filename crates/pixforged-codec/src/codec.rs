//! Codec seam between the converter and the image libraries.
//!
//! Decoding goes through the `image` crate with the format sniffed from the
//! leading bytes, so a file's extension never decides how it is parsed. The
//! decoder expands palette PNGs to direct color, so the palette flag is read
//! from the PNG header before decoding.
//! Encoding to WebP goes through libwebp, which unlike the pure-Rust encoder
//! supports lossy output at a chosen quality.

use image::DynamicImage;
use pixforged_common::TargetFormat;

use crate::error::{Error, Result};
use crate::normalize::{ColorMode, DecodedImage, NormalizedImage};

/// Largest quality value accepted by encoders.
pub const MAX_QUALITY: u8 = 100;

const PNG_SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";

/// Offset of the color type byte: signature, IHDR length and tag, width,
/// height, bit depth.
const PNG_COLOR_TYPE_OFFSET: usize = 25;

const PNG_COLOR_TYPE_INDEXED: u8 = 3;

/// Whether `bytes` start with a PNG whose header declares palette color.
pub fn is_indexed_png(bytes: &[u8]) -> bool {
    bytes.len() > PNG_COLOR_TYPE_OFFSET
        && bytes.starts_with(PNG_SIGNATURE)
        && &bytes[12..16] == b"IHDR"
        && bytes[PNG_COLOR_TYPE_OFFSET] == PNG_COLOR_TYPE_INDEXED
}

/// Decodes arbitrary raster bytes and encodes normalized buffers to one target format.
pub trait ImageCodec: Send + Sync {
    /// The format produced by [`encode`](Self::encode).
    fn target(&self) -> TargetFormat;

    /// Decode raw bytes into a pixel buffer.
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage> {
        if bytes.is_empty() {
            return Err(Error::Decode("input is empty".to_string()));
        }
        let image: DynamicImage = image::load_from_memory(bytes)?;
        Ok(DecodedImage {
            image,
            indexed: is_indexed_png(bytes),
        })
    }

    /// Encode a normalized buffer. `quality` is on a 0-100 scale where higher
    /// favors fidelity over size.
    fn encode(&self, image: &NormalizedImage, quality: u8) -> Result<Vec<u8>>;
}

/// Lossy WebP encoder backed by libwebp.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebpCodec;

impl ImageCodec for WebpCodec {
    fn target(&self) -> TargetFormat {
        TargetFormat::WebP
    }

    fn encode(&self, image: &NormalizedImage, quality: u8) -> Result<Vec<u8>> {
        let expected = image.width as usize * image.height as usize * image.mode.channels();
        if image.pixels.len() != expected {
            return Err(Error::Encode(format!(
                "pixel buffer has {} bytes, expected {} for {}x{} {}",
                image.pixels.len(),
                expected,
                image.width,
                image.height,
                image.mode
            )));
        }

        let encoder = match image.mode {
            ColorMode::Rgb => webp::Encoder::from_rgb(&image.pixels, image.width, image.height),
            ColorMode::Rgba => webp::Encoder::from_rgba(&image.pixels, image.width, image.height),
        };

        let quality = f32::from(quality.min(MAX_QUALITY));
        let memory = encoder
            .encode_simple(false, quality)
            .map_err(|e| Error::Encode(format!("libwebp rejected image: {:?}", e)))?;

        Ok(memory.to_vec())
    }
}

/// Codec producing the given target format.
pub fn codec_for(format: TargetFormat) -> Box<dyn ImageCodec> {
    match format {
        TargetFormat::WebP => Box::new(WebpCodec),
    }
}
