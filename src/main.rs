//! # HEIC Converter - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Merge tra file di configurazione e flag CLI
//! - Avvio del batch e calcolo dell'exit status
//!
//! ## Exit status:
//! - `0`: batch completato (anche con file falliti, salvo `--strict`)
//! - `1`: configurazione non valida, oppure `--strict` con almeno un file fallito
//!
//! ## Esempio di utilizzo:
//! ```bash
//! heic-convert png /path/to/photos --workers 8 --verbose
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use heic_converter::{json_output::JsonMessage, BatchConverter, Config, TargetFormat};

#[derive(Parser)]
#[command(name = "heic-convert")]
#[command(about = "Convert every HEIC file in a directory to JPEG or PNG")]
struct Args {
    /// Output format: jpg (default), jpeg, png
    #[arg(value_parser = parse_format)]
    format: TargetFormat,

    /// Directory containing HEIC files
    directory: PathBuf,

    /// Number of parallel workers [default: 4]
    #[arg(short, long)]
    workers: Option<usize>,

    /// Also convert files in subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Skip files whose output already exists
    #[arg(long)]
    skip_existing: bool,

    /// Emit JSON events on stdout instead of a progress bar
    #[arg(long)]
    json: bool,

    /// Exit with status 1 if any file fails to convert
    #[arg(long)]
    strict: bool,

    /// Path to the ImageMagick binary (magick or convert)
    #[arg(long)]
    tool: Option<PathBuf>,

    /// JSON configuration file; command line flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_format(value: &str) -> Result<TargetFormat, String> {
    value.parse().map_err(|e: heic_converter::ConvertError| e.to_string())
}

async fn load_config(args: &Args) -> Result<Config> {
    let mut config = match args.config {
        Some(ref path) => {
            if !path.is_file() {
                return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
            }
            let config = Config::from_file(path).await?;
            info!("Loaded configuration from {}", path.display());
            config
        }
        None => Config::default(),
    };

    config.target_format = args.format;
    config.input_dir = args.directory.clone();
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(ref tool) = args.tool {
        config.tool_path = Some(tool.clone());
    }
    config.recursive |= args.recursive;
    config.skip_existing |= args.skip_existing;
    config.json_output |= args.json;
    config.strict |= args.strict;

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; stderr keeps stdout free for JSON events
    let default_level = if args.verbose { "debug" } else { "info" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&args).await?;
    let json_output = config.json_output;
    let strict = config.strict;

    let summary = match BatchConverter::new(config) {
        Ok(batch) => batch.run().await?,
        Err(e) => {
            if json_output {
                JsonMessage::error("Invalid configuration".to_string(), Some(e.to_string())).emit();
            }
            return Err(e);
        }
    };

    if strict && summary.failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_without_config_flag_uses_defaults() {
        let args = Args::parse_from(["heic-convert", "png", "/photos"]);
        let config = load_config(&args).await.unwrap();

        assert_eq!(config.target_format, TargetFormat::Png);
        assert_eq!(config.input_dir, PathBuf::from("/photos"));
        assert_eq!(config.workers, Config::default().workers);
        assert!(!config.strict);
        assert!(config.tool_path.is_none());
    }

    #[tokio::test]
    async fn test_cli_flags_override_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        std::fs::write(
            &config_path,
            r#"{ "target_format": "jpeg", "input_dir": "/elsewhere", "workers": 2, "recursive": true, "tool_path": "/opt/magick" }"#,
        )
        .unwrap();

        let args = Args::parse_from([
            "heic-convert".to_string(),
            "PNG".to_string(),
            "/photos".to_string(),
            "--workers".to_string(),
            "6".to_string(),
            "--strict".to_string(),
            "--config".to_string(),
            config_path.display().to_string(),
        ]);
        let config = load_config(&args).await.unwrap();

        assert_eq!(config.target_format, TargetFormat::Png);
        assert_eq!(config.input_dir, PathBuf::from("/photos"));
        assert_eq!(config.workers, 6);
        assert!(config.strict);
        // Values without a CLI counterpart come from the file
        assert!(config.recursive);
        assert_eq!(config.tool_path, Some(PathBuf::from("/opt/magick")));
    }

    #[tokio::test]
    async fn test_missing_config_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("none.json");
        let args = Args::parse_from([
            "heic-convert".to_string(),
            "jpg".to_string(),
            "/photos".to_string(),
            "--config".to_string(),
            missing.display().to_string(),
        ]);
        assert!(load_config(&args).await.is_err());
    }

    #[tokio::test]
    async fn test_malformed_config_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        std::fs::write(&config_path, "{ not json").unwrap();
        let args = Args::parse_from([
            "heic-convert".to_string(),
            "jpg".to_string(),
            "/photos".to_string(),
            "--config".to_string(),
            config_path.display().to_string(),
        ]);
        assert!(load_config(&args).await.is_err());
    }
}
