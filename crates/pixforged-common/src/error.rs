//! Conversion error taxonomy.
//!
//! Validation errors (`NoFilePart`, `EmptySelection`, `InvalidFormat`) are
//! raised before any image is decoded. `Decode` is reserved for input that is
//! not a readable image so callers can show a specific "corrupted file"
//! message. `Encode` and `Archive` cover every other processing failure.

/// Error raised while validating or converting a batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The request carried no upload field at all.
    #[error("no file part in request")]
    NoFilePart,

    /// The upload field was present but no file was selected.
    #[error("no files selected")]
    EmptySelection,

    /// A filename does not carry an allowed extension.
    #[error("invalid file format: {filename}")]
    InvalidFormat { filename: String },

    /// The bytes of an item are not a recognizable image.
    #[error("failed to decode {filename}: {reason}")]
    Decode { filename: String, reason: String },

    /// Any other failure while converting an item.
    #[error("failed to convert {filename}: {reason}")]
    Encode { filename: String, reason: String },

    /// Writing the output archive failed.
    #[error("failed to build archive: {0}")]
    Archive(String),
}

impl Error {
    /// Create a new InvalidFormat error.
    pub fn invalid_format<S: Into<String>>(filename: S) -> Self {
        Self::InvalidFormat {
            filename: filename.into(),
        }
    }

    /// Create a new Decode error.
    pub fn decode<S: Into<String>, R: Into<String>>(filename: S, reason: R) -> Self {
        Self::Decode {
            filename: filename.into(),
            reason: reason.into(),
        }
    }

    /// Create a new Encode error.
    pub fn encode<S: Into<String>, R: Into<String>>(filename: S, reason: R) -> Self {
        Self::Encode {
            filename: filename.into(),
            reason: reason.into(),
        }
    }

    /// Create a new Archive error.
    pub fn archive<S: Into<String>>(reason: S) -> Self {
        Self::Archive(reason.into())
    }

    /// Message shown to the person who submitted the batch.
    pub fn user_message(&self) -> String {
        match self {
            Self::NoFilePart => "Error: No file part found.".to_string(),
            Self::EmptySelection => "Error: No files selected.".to_string(),
            Self::InvalidFormat { .. } => {
                "Error: Invalid file format. Only JPG and PNG are allowed.".to_string()
            }
            Self::Decode { filename, .. } => format!(
                "Error: '{}' appears to be corrupted or is not a readable image.",
                filename
            ),
            Self::Encode { .. } | Self::Archive(_) => {
                "Error: Unable to process files. Please try again.".to_string()
            }
        }
    }

    /// HTTP status code the error maps to.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::NoFilePart | Self::EmptySelection | Self::InvalidFormat { .. } => 400,
            Self::Decode { .. } => 422,
            Self::Encode { .. } | Self::Archive(_) => 500,
        }
    }

    /// Whether the error was raised by the validator, before any decode.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NoFilePart | Self::EmptySelection | Self::InvalidFormat { .. }
        )
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
