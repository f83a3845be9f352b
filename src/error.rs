//! # Error Types Module
//!
//! Questo modulo definisce i tipi di errore custom della libreria.
//!
//! ## Responsabilità:
//! - Definisce `ConvertError` per categorizzare gli errori di conversione
//! - Fornisce messaggi di errore descrittivi e strutturati
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori:
//! - `Io`: Errori di I/O (file non trovati, permessi, etc.)
//! - `UnsupportedFormat`: Formato di output non supportato
//! - `MissingDependency`: Tool esterno mancante (magick / convert)
//! - `ToolFailed`: Il tool esterno è terminato con exit status non zero
//! - `Validation`: Errori di validazione input
//! - `Panicked`: Il converter è andato in panic durante un singolo job
//!
//! ## Esempio:
//! ```no_run
//! # use heic_converter::ConvertError;
//! # fn check(tool_exists: bool) -> Result<(), ConvertError> {
//! if !tool_exists {
//!     return Err(ConvertError::MissingDependency("magick".to_string()));
//! }
//! # Ok(())
//! # }
//! # fn main() {}
//! ```

/// Custom error types for HEIC conversion
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("Dependency missing: {0}")]
    MissingDependency(String),

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Converter panicked: {0}")]
    Panicked(String),
}

impl ConvertError {
    /// Build a `Panicked` error from a `catch_unwind` payload
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self::Panicked(message)
    }
}
