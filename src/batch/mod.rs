//! Batch validation and conversion.
//!
//! A batch is the ordered list of files from one upload. It is handled in
//! three stages, each of which can end the request with an error:
//!
//! - Validation of every filename against the extension allow-list
//! - Conversion of each item, in upload order, aborting on the first failure
//! - Packaging: one item is returned as-is, several go into a ZIP archive

mod converter;
mod validator;

pub use converter::BatchConverter;
pub use validator::Validator;

use bytes::Bytes;
use pixforged_common::{TargetFormat, ARCHIVE_MIME_TYPE};

use crate::config::ConversionConfig;

/// One uploaded file.
#[derive(Debug, Clone)]
pub struct UploadedItem {
    /// Filename as sent by the client.
    pub filename: String,
    /// Raw file contents.
    pub data: Bytes,
}

impl UploadedItem {
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }
}

/// A converted file ready to be sent or archived.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// Original base name with the target extension.
    pub filename: String,
    /// Encoded image bytes.
    pub data: Vec<u8>,
    /// MIME type of `data`.
    pub content_type: &'static str,
}

/// What a successful batch produces.
#[derive(Debug, Clone)]
pub enum BatchOutput {
    /// A batch of one, returned without an archive.
    Single(ConversionResult),
    /// Several converted files packed into one archive.
    Archive {
        filename: String,
        data: Vec<u8>,
        /// Entry names in batch order.
        entries: Vec<String>,
    },
}

impl BatchOutput {
    /// Download name of the payload.
    pub fn filename(&self) -> &str {
        match self {
            Self::Single(result) => &result.filename,
            Self::Archive { filename, .. } => filename,
        }
    }

    /// MIME type of the payload.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Single(result) => result.content_type,
            Self::Archive { .. } => ARCHIVE_MIME_TYPE,
        }
    }

    /// Payload bytes.
    pub fn data(&self) -> &[u8] {
        match self {
            Self::Single(result) => &result.data,
            Self::Archive { data, .. } => data,
        }
    }

    /// Consume the output, returning `(filename, content_type, bytes)`.
    pub fn into_parts(self) -> (String, &'static str, Vec<u8>) {
        match self {
            Self::Single(result) => (result.filename, result.content_type, result.data),
            Self::Archive { filename, data, .. } => (filename, ARCHIVE_MIME_TYPE, data),
        }
    }
}

/// Settings the validator and converter are constructed with.
#[derive(Debug, Clone)]
pub struct ConversionSettings {
    /// Lowercase extensions without a leading dot.
    pub allowed_extensions: Vec<String>,
    pub target_format: TargetFormat,
    /// 0-100, higher favors fidelity.
    pub quality: u8,
    pub archive_filename: String,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self::from(&ConversionConfig::default())
    }
}

impl From<&ConversionConfig> for ConversionSettings {
    fn from(config: &ConversionConfig) -> Self {
        Self {
            allowed_extensions: config.allowed_extensions.clone(),
            target_format: config.target_format,
            quality: config.quality,
            archive_filename: config.archive_filename.clone(),
        }
    }
}
