//! # ImageMagick Converter
//!
//! Converte un file HEIC invocando ImageMagick come processo esterno.
//!
//! ## Pipeline per job:
//! 1. Crea un file temporaneo nella directory di destinazione
//! 2. `magick HEIC:<source> <CODER>:<temp>`
//! 3. Se il tool termina con successo, rinomina il temporaneo sulla destinazione
//!
//! In caso di errore il temporaneo viene rimosso automaticamente, quindi non
//! restano mai file di output parziali.

use super::Converter;
use crate::error::ConvertError;
use crate::job::ConversionJob;
use crate::platform::ToolResolver;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

/// Converter backed by the ImageMagick command line
#[derive(Debug, Clone)]
pub struct MagickConverter {
    tool: PathBuf,
}

impl MagickConverter {
    /// Resolve the tool (override or PATH) and build the converter
    pub fn new(tool_override: Option<&Path>) -> Result<Self, ConvertError> {
        let tool = ToolResolver::resolve_magick(tool_override)?;
        Ok(Self { tool })
    }

    /// Use a specific binary without any lookup
    pub fn with_tool(tool: impl Into<PathBuf>) -> Self {
        Self { tool: tool.into() }
    }

    pub fn tool(&self) -> &Path {
        &self.tool
    }

    fn tool_name(&self) -> String {
        self.tool
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

#[async_trait]
impl Converter for MagickConverter {
    async fn convert(&self, job: &ConversionJob) -> Result<(), ConvertError> {
        let destination = job.destination();
        let parent = match destination.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let temp_path = tempfile::Builder::new()
            .prefix(".heic-convert-")
            .suffix(&format!(".{}", job.target_format().extension()))
            .tempfile_in(parent)?
            .into_temp_path();

        let start_time = std::time::Instant::now();
        let output = Command::new(&self.tool)
            .arg(format!("HEIC:{}", job.source().display()))
            .arg(format!(
                "{}:{}",
                job.target_format().magick_coder(),
                temp_path.display()
            ))
            .output()
            .await?;

        if !output.status.success() {
            return Err(ConvertError::ToolFailed {
                tool: self.tool_name(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        temp_path
            .persist(destination)
            .map_err(|e| ConvertError::Io(e.error))?;

        debug!(
            "{} -> {} in {:?}",
            job.source().display(),
            destination.display(),
            start_time.elapsed()
        );
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::format::TargetFormat;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn test_successful_conversion_writes_destination() {
        let temp_dir = TempDir::new().unwrap();
        // Strip the "CODER:" prefix from the output argument
        let tool = write_script(temp_dir.path(), "fake-magick", r#"out="${2#*:}"; echo converted > "$out""#);
        let source = temp_dir.path().join("IMG_001.HEIC");
        std::fs::write(&source, b"heic").unwrap();

        let job = ConversionJob::new(&source, TargetFormat::Png);
        MagickConverter::with_tool(&tool).convert(&job).await.unwrap();

        let written = std::fs::read_to_string(temp_dir.path().join("IMG_001.png")).unwrap();
        assert_eq!(written.trim(), "converted");
    }

    #[tokio::test]
    async fn test_failed_tool_leaves_no_output() {
        let temp_dir = TempDir::new().unwrap();
        let tool = write_script(temp_dir.path(), "broken-magick", "echo 'no decode delegate' >&2; exit 3");
        let source = temp_dir.path().join("bad.heic");
        std::fs::write(&source, b"not really heic").unwrap();

        let job = ConversionJob::new(&source, TargetFormat::Jpg);
        let err = MagickConverter::with_tool(&tool).convert(&job).await.unwrap_err();

        match err {
            ConvertError::ToolFailed { tool, stderr, .. } => {
                assert_eq!(tool, "broken-magick");
                assert_eq!(stderr, "no decode delegate");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!job.destination().exists());
        let leftovers = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".heic-convert-"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn test_missing_tool_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let job = ConversionJob::new(temp_dir.path().join("a.heic"), TargetFormat::Jpg);
        let converter = MagickConverter::with_tool(temp_dir.path().join("nope"));
        assert!(matches!(converter.convert(&job).await, Err(ConvertError::Io(_))));
    }
}
