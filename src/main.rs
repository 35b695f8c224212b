mod cli;

use pixforged::{
    batch::{BatchConverter, BatchOutput, ConversionSettings, UploadedItem},
    config, server,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    // Load config
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    config.server.apply_overrides(host, port)?;

    tracing::info!("Starting Pixforged server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );
    tracing::info!(
        "Converting {} to {} at quality {} (upload limit {} bytes)",
        config.conversion.allowed_extensions.join("/"),
        config.conversion.target_format,
        config.conversion.quality,
        config.conversion.max_upload_bytes
    );

    server::start_server(config).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "pixforged=trace,pixforged_codec=trace,tower_http=debug".to_string()
        } else {
            "pixforged=debug,pixforged_codec=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            // Create tokio runtime
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Convert { files, output } => {
            convert_files(&files, output.as_deref(), cli.config.as_deref())
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("pixforged {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn convert_files(files: &[PathBuf], output: Option<&Path>, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let mut batch = Vec::with_capacity(files.len());
    for path in files {
        let data =
            std::fs::read(path).with_context(|| format!("Failed to read input file: {:?}", path))?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        batch.push(UploadedItem::new(filename, data));
    }

    let converter = BatchConverter::new(ConversionSettings::from(&config.conversion));
    let result = converter
        .process(Some(batch.as_slice()))
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    let destination = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(result.filename()));

    std::fs::write(&destination, result.data())
        .with_context(|| format!("Failed to write output: {:?}", destination))?;

    match &result {
        BatchOutput::Single(_) => println!("Wrote {}", destination.display()),
        BatchOutput::Archive { entries, .. } => {
            println!("Wrote {} ({} files)", destination.display(), entries.len());
            for entry in entries {
                println!("  {}", entry);
            }
        }
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            print_summary(&config);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            print_summary(&config);
        }
    }

    Ok(())
}

fn print_summary(config: &config::Config) {
    let conversion = &config.conversion;
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Upload field: {}", conversion.upload_field);
    println!("  Upload limit: {} bytes", conversion.max_upload_bytes);
    println!(
        "  Allowed extensions: {}",
        conversion.allowed_extensions.join(", ")
    );
    println!(
        "  Target: {} (quality {})",
        conversion.target_format, conversion.quality
    );
    println!("  Archive name: {}", conversion.archive_filename);
}
