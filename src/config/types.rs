use pixforged_common::paths::default_allowed_extensions;
use pixforged_common::TargetFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub conversion: ConversionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

impl ServerConfig {
    /// Replace host and port with any values given on the command line.
    pub fn apply_overrides(&mut self, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            if port == 0 {
                anyhow::bail!("Server port cannot be 0");
            }
            self.port = port;
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Upload limits and conversion output settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConversionConfig {
    /// Maximum size of a whole upload request in bytes (default: 4 MiB)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Source file extensions accepted by the validator
    #[serde(default = "default_allowed_extensions_owned")]
    pub allowed_extensions: Vec<String>,

    /// Format every upload is converted to
    #[serde(default)]
    pub target_format: TargetFormat,

    /// Encoder quality on a 0-100 scale (default: 90)
    #[serde(default = "default_quality")]
    pub quality: u8,

    /// Name of the repeatable multipart file field
    #[serde(default = "default_upload_field")]
    pub upload_field: String,

    /// Download name for multi-file results
    #[serde(default = "default_archive_filename")]
    pub archive_filename: String,
}

fn default_max_upload_bytes() -> usize {
    4 * 1024 * 1024
}

fn default_allowed_extensions_owned() -> Vec<String> {
    default_allowed_extensions()
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_quality() -> u8 {
    90
}

fn default_upload_field() -> String {
    "images".to_string()
}

fn default_archive_filename() -> String {
    "converted_images.zip".to_string()
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
            allowed_extensions: default_allowed_extensions_owned(),
            target_format: TargetFormat::default(),
            quality: default_quality(),
            upload_field: default_upload_field(),
            archive_filename: default_archive_filename(),
        }
    }
}

impl ConversionConfig {
    /// Upload limit as shown to users, e.g. `"4 MB"` or `"512 KB"`.
    pub fn max_upload_label(&self) -> String {
        format_size(self.max_upload_bytes)
    }
}

/// Human-readable size, rounded down to the largest whole unit that is not zero.
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{} MB", bytes / MB)
    } else if bytes >= KB {
        format!("{} KB", bytes / KB)
    } else {
        format!("{} bytes", bytes)
    }
}
