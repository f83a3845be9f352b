//! # Conversion Job Module
//!
//! Un job è un singolo file di input più il path di output derivato.
//!
//! ## Derivazione del path di output:
//! ```text
//! Input:  /photos/2023/IMG_001.HEIC
//! Format: png
//! Output: /photos/2023/IMG_001.png
//! ```
//! Il path di output viene calcolato una sola volta, al momento della
//! creazione del job, e non viene più modificato.

use crate::format::TargetFormat;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One unit of work: an input file, its derived output and the target format
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ConversionJob {
    source: PathBuf,
    destination: PathBuf,
    target_format: TargetFormat,
}

impl ConversionJob {
    /// Create a job, deriving the destination from the source path
    pub fn new(source: impl Into<PathBuf>, target_format: TargetFormat) -> Self {
        let source = source.into();
        let destination = Self::destination_for(&source, target_format);
        Self {
            source,
            destination,
            target_format,
        }
    }

    /// Replace the extension of `source` with the target's canonical extension
    pub fn destination_for(source: &Path, target_format: TargetFormat) -> PathBuf {
        source.with_extension(target_format.extension())
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn target_format(&self) -> TargetFormat {
        self.target_format
    }

    /// File name of the source, for progress messages
    pub fn display_name(&self) -> String {
        self.source
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

/// Build one job per input, in input order
pub fn build_jobs<I, P>(inputs: I, target_format: TargetFormat) -> Vec<ConversionJob>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    inputs
        .into_iter()
        .map(|input| ConversionJob::new(input, target_format))
        .collect()
}
