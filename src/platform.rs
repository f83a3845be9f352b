//! # Platform-specific utilities
//!
//! Ricerca cross-platform del tool esterno di conversione. ImageMagick 7
//! espone il binario `magick`, ImageMagick 6 il vecchio `convert`: si
//! preferisce il primo e si ripiega sul secondo.

use crate::error::ConvertError;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Candidate tool names, in order of preference
pub const MAGICK_TOOLS: &[&str] = &["magick", "convert"];

/// Locates external tools on the system
pub struct ToolResolver;

impl ToolResolver {
    /// Resolve the ImageMagick binary, honouring an explicit override
    pub fn resolve_magick(tool_override: Option<&Path>) -> Result<PathBuf, ConvertError> {
        if let Some(path) = tool_override {
            if path.is_file() {
                debug!("Using configured tool: {}", path.display());
                return Ok(path.to_path_buf());
            }
            return Err(ConvertError::MissingDependency(format!(
                "configured tool not found: {}",
                path.display()
            )));
        }

        MAGICK_TOOLS
            .iter()
            .find_map(|name| Self::find_in_system_path(name))
            .ok_or_else(|| {
                ConvertError::MissingDependency(
                    "ImageMagick (magick or convert) not found in PATH".to_string(),
                )
            })
    }

    /// Find a tool in the system PATH
    pub fn find_in_system_path(tool_name: &str) -> Option<PathBuf> {
        let extension = if cfg!(windows) { ".exe" } else { "" };
        let tool_with_ext = format!("{}{}", tool_name, extension);

        let found = env::split_paths(&env::var_os("PATH")?)
            .map(|dir| dir.join(&tool_with_ext))
            .find(|path| path.is_file());

        if let Some(ref path) = found {
            debug!("Resolved {} -> {}", tool_name, path.display());
        }
        found
    }
}
