//! Color normalization ahead of encoding.
//!
//! Decoded images come in many layouts (grayscale, 16-bit, float, with or
//! without alpha). The encoder only takes 8-bit RGB or RGBA, so every image is
//! flattened to one of the two. Images that carry alpha or were stored with a
//! palette become RGBA; everything else becomes RGB.

use image::DynamicImage;
use std::fmt;

/// Pixel layout handed to the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// 8-bit red, green, blue.
    Rgb,
    /// 8-bit red, green, blue, alpha.
    Rgba,
}

impl ColorMode {
    /// Bytes per pixel in this layout.
    pub fn channels(&self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb => write!(f, "RGB"),
            Self::Rgba => write!(f, "RGBA"),
        }
    }
}

/// A tightly packed 8-bit pixel buffer in a known color mode.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub mode: ColorMode,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decoder output along with the source layout the decoder expanded away.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub image: DynamicImage,
    /// The source stored palette indices rather than direct color.
    pub indexed: bool,
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

impl From<DynamicImage> for DecodedImage {
    fn from(image: DynamicImage) -> Self {
        Self {
            image,
            indexed: false,
        }
    }
}

/// Convert a decoded image to RGBA if it carries alpha or came from a
/// palette, otherwise to RGB.
pub fn normalize(decoded: impl Into<DecodedImage>) -> NormalizedImage {
    let DecodedImage { image, indexed } = decoded.into();
    let width = image.width();
    let height = image.height();

    if indexed || image.color().has_alpha() {
        NormalizedImage {
            mode: ColorMode::Rgba,
            width,
            height,
            pixels: image.into_rgba8().into_raw(),
        }
    } else {
        NormalizedImage {
            mode: ColorMode::Rgb,
            width,
            height,
            pixels: image.into_rgb8().into_raw(),
        }
    }
}
