//! In-memory ZIP archive for multi-file batches.
//!
//! Entries are Deflate-compressed and written in the order they are added.
//! Entry names are kept unique: a repeated name gets a `_2`, `_3`, ...
//! suffix before its extension, so every added file ends up in the archive.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use pixforged_common::paths::{extension, file_stem};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;

/// Builds a ZIP archive in memory.
pub struct ArchiveWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    names: HashSet<String>,
    entries: Vec<String>,
}

impl ArchiveWriter {
    /// Create an empty archive.
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .unix_permissions(0o644),
            names: HashSet::new(),
            entries: Vec::new(),
        }
    }

    /// Append a file and return the entry name it was stored under.
    pub fn add(&mut self, name: &str, data: &[u8]) -> Result<String> {
        let entry = self.unique_name(name);

        self.zip.start_file(entry.as_str(), self.options)?;
        self.zip.write_all(data)?;

        tracing::trace!(entry = %entry, size = data.len(), "Added archive entry");

        self.names.insert(entry.clone());
        self.entries.push(entry.clone());
        Ok(entry)
    }

    /// Entry names in insertion order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Finish the archive and return its bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self.zip.finish()?;
        Ok(cursor.into_inner())
    }

    fn unique_name(&self, name: &str) -> String {
        if !self.names.contains(name) {
            return name.to_string();
        }

        let stem = file_stem(name);
        let ext = if stem.len() < name.len() {
            extension(name)
        } else {
            None
        };

        (2..)
            .map(|n| match ext {
                Some(ext) => format!("{}_{}.{}", stem, n, ext),
                None => format!("{}_{}", stem, n),
            })
            .find(|candidate| !self.names.contains(candidate))
            .unwrap_or_else(|| name.to_string())
    }
}

impl Default for ArchiveWriter {
    fn default() -> Self {
        Self::new()
    }
}
