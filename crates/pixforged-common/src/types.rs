//! Core type definitions for conversion output.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Image format every upload is converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    /// WebP, lossy with an alpha plane when the source carries transparency.
    #[default]
    WebP,
}

impl TargetFormat {
    /// File extension for converted files, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::WebP => "webp",
        }
    }

    /// MIME type used for single-file responses.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::WebP => "image/webp",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for TargetFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "webp" => Ok(Self::WebP),
            other => Err(format!("unsupported target format: {}", other)),
        }
    }
}

/// MIME type of the multi-file archive response.
pub const ARCHIVE_MIME_TYPE: &str = "application/zip";
