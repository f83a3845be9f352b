//! # File Management Module
//!
//! Questo modulo gestisce la discovery dei file di input.
//!
//! ## Responsabilità:
//! - Enumerazione della directory (solo primo livello o ricorsiva)
//! - Filtro per estensione `.heic` (case-insensitive)
//! - Ordinamento stabile dei risultati
//!
//! ## Esempio:
//! ```no_run
//! # use heic_converter::file_manager::FileManager;
//! # use std::path::Path;
//! # fn main() -> anyhow::Result<()> {
//! let files = FileManager::find_heic_files(Path::new("/photos"), false)?;
//! # Ok(())
//! # }
//! ```

use crate::format::SourceFormat;
use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Manages input discovery
pub struct FileManager;

impl FileManager {
    /// Find all HEIC files in a directory, sorted by path
    pub fn find_heic_files(input_dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
        let mut walker = WalkDir::new(input_dir).follow_links(true);
        if !recursive {
            walker = walker.max_depth(1);
        }

        let mut files: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|path| SourceFormat::matches(path))
            .collect();

        files.sort();
        Ok(files)
    }
}
