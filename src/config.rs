//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri del batch
//! - Fornisce validazione dei parametri prima dell'avvio del pool
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! ## Parametri di configurazione:
//! - `target_format`: Formato di output (jpg, jpeg, png; default: jpg)
//! - `input_dir`: Directory contenente i file HEIC
//! - `workers`: Numero di worker paralleli (default: 4)
//! - `recursive`: Cerca anche nelle sottodirectory (default: false)
//! - `skip_existing`: Salta i file il cui output esiste già (default: false)
//! - `json_output`: Eventi JSON su stdout invece della progress bar
//! - `strict`: Exit status non zero se almeno un file fallisce
//! - `tool_path`: Path esplicito del binario ImageMagick
//!
//! ## Validazione:
//! - Controlla che workers sia > 0
//! - Controlla che input_dir esista e sia una directory
//! - Controlla che tool_path, se presente, esista
//!
//! ## Esempio:
//! ```no_run
//! # use heic_converter::{Config, TargetFormat};
//! # fn main() -> anyhow::Result<()> {
//! let config = Config {
//!     target_format: TargetFormat::Png,
//!     workers: 8,
//!     ..Default::default()
//! };
//! config.validate()?;
//! # Ok(())
//! # }
//! ```

use crate::format::TargetFormat;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for one conversion batch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output format
    pub target_format: TargetFormat,
    /// Directory containing the HEIC files
    pub input_dir: PathBuf,
    /// Number of parallel workers
    pub workers: usize,
    /// Descend into subdirectories
    pub recursive: bool,
    /// Skip inputs whose output file already exists
    pub skip_existing: bool,
    /// Output progress and status as JSON for programmatic use
    pub json_output: bool,
    /// Exit with a failure status when any file fails to convert
    pub strict: bool,
    /// Explicit ImageMagick binary (None = search PATH)
    pub tool_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_format: TargetFormat::default(),
            input_dir: PathBuf::from("."),
            workers: 4,
            recursive: false,
            skip_existing: false,
            json_output: false,
            strict: false,
            tool_path: None,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(anyhow::anyhow!("Number of workers must be greater than 0"));
        }

        if !self.input_dir.exists() {
            return Err(anyhow::anyhow!(
                "Directory {} does not exist",
                self.input_dir.display()
            ));
        }
        if !self.input_dir.is_dir() {
            return Err(anyhow::anyhow!(
                "Input path is not a directory: {}",
                self.input_dir.display()
            ));
        }

        if let Some(ref tool_path) = self.tool_path {
            if !tool_path.is_file() {
                return Err(anyhow::anyhow!(
                    "Conversion tool not found: {}",
                    tool_path.display()
                ));
            }
        }

        Ok(())
    }

    /// Load configuration from file; a missing file yields the defaults
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}
