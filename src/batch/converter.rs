//! Per-item conversion and batch packaging.

use std::time::Instant;

use pixforged_codec::{codec_for, normalize, ArchiveWriter, ImageCodec};
use pixforged_common::paths::output_filename;
use pixforged_common::{Error, Result};
use tracing::{debug, info, warn};

use super::{BatchOutput, ConversionResult, ConversionSettings, UploadedItem, Validator};

/// Validates and converts batches with a fixed set of settings.
pub struct BatchConverter {
    settings: ConversionSettings,
    validator: Validator,
    codec: Box<dyn ImageCodec>,
}

impl BatchConverter {
    /// Create a converter using the codec for the configured target format.
    pub fn new(settings: ConversionSettings) -> Self {
        let codec = codec_for(settings.target_format);
        Self::with_codec(settings, codec)
    }

    /// Create a converter with an explicit codec.
    pub fn with_codec(settings: ConversionSettings, codec: Box<dyn ImageCodec>) -> Self {
        let validator = Validator::new(settings.allowed_extensions.clone());
        Self {
            settings,
            validator,
            codec,
        }
    }

    pub fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    /// Validate the whole upload, then convert it.
    ///
    /// No item is decoded unless every filename passes validation.
    pub fn process(&self, batch: Option<&[UploadedItem]>) -> Result<BatchOutput> {
        self.validator.validate(batch)?;
        self.convert_batch(batch.unwrap_or_default())
    }

    /// Convert a single item to the target format.
    pub fn convert_one(&self, item: &UploadedItem) -> Result<ConversionResult> {
        let started = Instant::now();

        let decoded = self.codec.decode(&item.data).map_err(|e| match e {
            pixforged_codec::Error::Decode(reason) => Error::decode(&item.filename, reason),
            other => Error::encode(&item.filename, other.to_string()),
        })?;

        let image = normalize(decoded);
        debug!(
            filename = %item.filename,
            width = image.width,
            height = image.height,
            mode = %image.mode,
            "Decoded image"
        );

        let data = self
            .codec
            .encode(&image, self.settings.quality)
            .map_err(|e| Error::encode(&item.filename, e.to_string()))?;

        let target = self.codec.target();
        let filename = output_filename(&item.filename, target);

        debug!(
            source = %item.filename,
            output = %filename,
            input_size = item.data.len(),
            output_size = data.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Converted image"
        );

        Ok(ConversionResult {
            filename,
            data,
            content_type: target.mime_type(),
        })
    }

    /// Convert every item in order and package the results.
    ///
    /// A batch of one is returned directly. Larger batches are archived;
    /// the first failing item aborts the batch and no archive is produced.
    pub fn convert_batch(&self, batch: &[UploadedItem]) -> Result<BatchOutput> {
        match batch {
            [] => Err(Error::EmptySelection),
            [item] => {
                let result = self.convert_one(item).inspect_err(|e| {
                    warn!(filename = %item.filename, error = %e, "Conversion failed");
                })?;
                info!(output = %result.filename, size = result.data.len(), "Converted single image");
                Ok(BatchOutput::Single(result))
            }
            items => {
                let mut archive = ArchiveWriter::new();

                for (index, item) in items.iter().enumerate() {
                    let result = self.convert_one(item).inspect_err(|e| {
                        warn!(
                            filename = %item.filename,
                            index,
                            batch_size = items.len(),
                            error = %e,
                            "Conversion failed, aborting batch"
                        );
                    })?;

                    archive
                        .add(&result.filename, &result.data)
                        .map_err(|e| Error::archive(e.to_string()))?;
                }

                let entries = archive.entries().to_vec();
                let data = archive
                    .finish()
                    .map_err(|e| Error::archive(e.to_string()))?;

                info!(
                    entries = entries.len(),
                    size = data.len(),
                    archive = %self.settings.archive_filename,
                    "Packaged converted images"
                );

                Ok(BatchOutput::Archive {
                    filename: self.settings.archive_filename.clone(),
                    data,
                    entries,
                })
            }
        }
    }
}
