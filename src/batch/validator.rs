//! Filename checks run before any conversion.

use pixforged_common::paths::has_allowed_extension;
use pixforged_common::{Error, Result};

use super::UploadedItem;

/// Checks a batch against the extension allow-list.
///
/// Only filenames are inspected; file contents are never read here.
#[derive(Debug, Clone)]
pub struct Validator {
    allowed_extensions: Vec<String>,
}

impl Validator {
    pub fn new(allowed_extensions: Vec<String>) -> Self {
        Self { allowed_extensions }
    }

    /// Validate an upload. `None` means the upload field was missing from
    /// the request entirely.
    pub fn validate(&self, batch: Option<&[UploadedItem]>) -> Result<()> {
        let batch = batch.ok_or(Error::NoFilePart)?;

        match batch.first() {
            None => return Err(Error::EmptySelection),
            Some(first) if first.filename.is_empty() => return Err(Error::EmptySelection),
            Some(_) => {}
        }

        if let Some(item) = batch
            .iter()
            .find(|item| !has_allowed_extension(&item.filename, &self.allowed_extensions))
        {
            tracing::debug!(filename = %item.filename, "Rejected file with disallowed extension");
            return Err(Error::invalid_format(&item.filename));
        }

        Ok(())
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }
}
