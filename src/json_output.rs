//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON per l'uso programmatico
//! del converter (GUI, script, pipeline).
//!
//! ## Responsabilità:
//! - Emette un messaggio JSON per riga su stdout
//! - Ignora gli errori di scrittura: l'output è solo informativo e non deve
//!   mai interrompere un worker
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio del batch
//! - `progress`: Job completati / totali
//! - `file_failed`: Un job la cui conversione è fallita, con il motivo
//! - `complete`: Fine del batch con il riepilogo
//! - `error`: Errore che impedisce l'avvio del batch

use crate::config::Config;
use crate::format::TargetFormat;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;

/// Tipo di messaggio JSON
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JsonMessage {
    /// Inizio del batch
    Start {
        input_dir: PathBuf,
        total_files: usize,
        config: JsonConfig,
    },

    /// Progresso corrente
    Progress {
        current: usize,
        total: usize,
        percentage: f64,
    },

    /// Conversione di un file fallita
    FileFailed {
        source: PathBuf,
        destination: PathBuf,
        error: String,
    },

    /// Batch completato
    Complete {
        total: usize,
        succeeded: usize,
        failed: usize,
        duration_seconds: f64,
    },

    /// Errore generale
    Error {
        message: String,
        details: Option<String>,
    },
}

/// Configurazione riportata nel messaggio `start`
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonConfig {
    pub target_format: TargetFormat,
    pub workers: usize,
    pub recursive: bool,
    pub skip_existing: bool,
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            let mut stdout = std::io::stdout().lock();
            let _ = writeln!(stdout, "{}", json);
            let _ = stdout.flush();
        }
    }

    pub fn start(input_dir: PathBuf, total_files: usize, config: JsonConfig) -> Self {
        Self::Start {
            input_dir,
            total_files,
            config,
        }
    }

    pub fn progress(current: usize, total: usize) -> Self {
        let percentage = if total > 0 {
            (current as f64 / total as f64) * 100.0
        } else {
            100.0
        };

        Self::Progress {
            current,
            total,
            percentage,
        }
    }

    pub fn file_failed(source: PathBuf, destination: PathBuf, error: String) -> Self {
        Self::FileFailed {
            source,
            destination,
            error,
        }
    }

    pub fn complete(total: usize, succeeded: usize, failed: usize, duration_seconds: f64) -> Self {
        Self::Complete {
            total,
            succeeded,
            failed,
            duration_seconds,
        }
    }

    pub fn error(message: String, details: Option<String>) -> Self {
        Self::Error { message, details }
    }
}

impl From<&Config> for JsonConfig {
    fn from(config: &Config) -> Self {
        Self {
            target_format: config.target_format,
            workers: config.workers,
            recursive: config.recursive,
            skip_existing: config.skip_existing,
        }
    }
}
