//! Error types for pixforged-codec.

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting or packaging images.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input bytes are not a recognizable image.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The image was recognized but exceeds decoder limits.
    #[error("image exceeds limits: {0}")]
    Limits(String),

    /// The encoder rejected the pixel buffer.
    #[error("encode failed: {0}")]
    Encode(String),

    /// Writing the archive failed.
    #[error("archive error: {0}")]
    Archive(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Limits(e) => Error::Limits(e.to_string()),
            image::ImageError::IoError(e) => Error::Decode(e.to_string()),
            other => Error::Decode(other.to_string()),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Archive(err.to_string())
    }
}
