//! Pixforged-Common: Shared types and utilities.
//!
//! This crate provides functionality used across pixforged:
//!
//! - **Error Handling**: The conversion error taxonomy and its user-facing messages
//! - **Target Formats**: The output format with its extension and MIME type
//! - **Path Utilities**: Extension checks and output filename derivation
//!
//! # Examples
//!
//! ```
//! use pixforged_common::paths::{has_allowed_extension, output_filename};
//! use pixforged_common::TargetFormat;
//!
//! let allowed = ["png", "jpg", "jpeg"];
//! assert!(has_allowed_extension("photo.JPG", &allowed));
//! assert_eq!(output_filename("photo.JPG", TargetFormat::WebP), "photo.webp");
//! ```

pub mod error;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
