mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    prepare_extensions(&mut config.conversion.allowed_extensions);

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./pixforged.toml",
        "~/.config/pixforged/config.toml",
        "/etc/pixforged/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    Ok(Config::default())
}

/// Lowercase and strip leading dots so `".PNG"` matches like `"png"`.
fn prepare_extensions(extensions: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    extensions.retain_mut(|ext| {
        *ext = ext.trim().trim_start_matches('.').to_lowercase();
        seen.insert(ext.clone())
    });
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    // Validate server config
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    let conversion = &config.conversion;

    if conversion.max_upload_bytes == 0 {
        anyhow::bail!("max_upload_bytes must be greater than 0");
    }

    if conversion.quality > 100 {
        anyhow::bail!(
            "quality must be between 0 and 100, got {}",
            conversion.quality
        );
    }

    if conversion.allowed_extensions.is_empty() {
        anyhow::bail!("allowed_extensions cannot be empty");
    }

    for ext in &conversion.allowed_extensions {
        if ext.trim().trim_start_matches('.').is_empty() {
            anyhow::bail!("allowed_extensions contains an empty entry");
        }
    }

    if conversion.upload_field.trim().is_empty() {
        anyhow::bail!("upload_field cannot be empty");
    }

    if !conversion.archive_filename.to_lowercase().ends_with(".zip") {
        anyhow::bail!(
            "archive_filename must end in .zip, got '{}'",
            conversion.archive_filename
        );
    }

    Ok(())
}
