//! # HEIC Converter Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione e validazione parametri
//! - `error`: Tipi di errore custom
//! - `format`: Formati di input (HEIC) e di output (jpg, jpeg, png)
//! - `job`: Job di conversione e derivazione del path di output
//! - `file_manager`: Discovery dei file HEIC
//! - `platform`: Ricerca del tool ImageMagick
//! - `converter`: Trait `Converter` e implementazione ImageMagick
//! - `pool`: Coda condivisa, worker pool e progress tracking
//! - `json_output`: Eventi JSON per uso programmatico
//! - `orchestrator`: Orchestratore del batch
//!
//! ## Utilizzo:
//! ```no_run
//! use heic_converter::{BatchConverter, Config};
//!
//! # async fn example() -> anyhow::Result<()> {
//! # let path = std::path::PathBuf::from("/photos");
//! let config = Config { input_dir: path, ..Default::default() };
//! let summary = BatchConverter::new(config)?.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod converter;
pub mod error;
pub mod file_manager;
pub mod format;
pub mod job;
pub mod json_output;
pub mod orchestrator;
pub mod platform;
pub mod pool;

pub use config::Config;
pub use converter::{Converter, MagickConverter};
pub use error::ConvertError;
pub use format::TargetFormat;
pub use job::ConversionJob;
pub use orchestrator::BatchConverter;
pub use pool::{BatchSummary, JobFailure, ProgressTracker, TaskQueue, WorkerPool};
