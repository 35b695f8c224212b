//! # pixforged-codec
//!
//! Image codec and packaging library for pixforged.
//!
//! This crate provides:
//! - Decoding uploaded bytes into a pixel buffer, sniffing the format from content
//! - Color normalization to RGB or RGBA ahead of encoding, with palette sources kept as RGBA
//! - WebP encoding at a configurable quality
//! - ZIP archive writing with ordered, unique entry names
//!
//! ## Example
//!
//! ```no_run
//! use pixforged_codec::{codec_for, normalize};
//! use pixforged_common::TargetFormat;
//!
//! let bytes = std::fs::read("photo.png")?;
//! let codec = codec_for(TargetFormat::WebP);
//! let image = normalize(codec.decode(&bytes)?);
//! let webp = codec.encode(&image, 90)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod archive;
pub mod codec;
mod error;
pub mod normalize;

pub use archive::ArchiveWriter;
pub use codec::{codec_for, ImageCodec, WebpCodec};
pub use error::{Error, Result};
pub use normalize::{normalize, ColorMode, DecodedImage, NormalizedImage};
