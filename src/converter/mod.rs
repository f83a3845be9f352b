//! # Converter Module
//!
//! Capacità esterna che esegue la conversione di un singolo job.
//!
//! - `Converter`: trait invocato dai worker per ogni job
//! - `MagickConverter`: implementazione basata su ImageMagick (`magick` / `convert`)
//!
//! Il pool non ispeziona mai la causa di un errore: gli basta distinguere
//! successo e fallimento.

pub mod magick;

pub use magick::MagickConverter;

use crate::error::ConvertError;
use crate::job::ConversionJob;
use async_trait::async_trait;

/// Performs the format transformation for one job
#[async_trait]
pub trait Converter: Send + Sync {
    async fn convert(&self, job: &ConversionJob) -> Result<(), ConvertError>;
}
