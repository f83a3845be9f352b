//! # Formats Module
//!
//! Insieme chiuso dei formati gestiti dal converter.
//!
//! - Input: solo HEIC, riconosciuto dall'estensione (case-insensitive)
//! - Output: `jpg` (default), `jpeg`, `png`

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Source format accepted by the batch
pub struct SourceFormat;

impl SourceFormat {
    pub const EXTENSION: &'static str = "heic";

    /// Check if a path carries the HEIC extension
    pub fn matches(path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(Self::EXTENSION))
            .unwrap_or(false)
    }
}

/// Output format, fixed for the whole batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    #[default]
    Jpg,
    Jpeg,
    Png,
}

impl TargetFormat {
    pub const SUPPORTED: &'static str = "jpg (default), jpeg, png";

    /// Canonical file extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        }
    }

    /// ImageMagick coder used for the output file
    pub fn magick_coder(&self) -> &'static str {
        match self {
            Self::Jpg | Self::Jpeg => "JPEG",
            // PNG00 keeps the bit depth and color type of the source
            Self::Png => "PNG00",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for TargetFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpg" => Ok(Self::Jpg),
            "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            _ => Err(ConvertError::UnsupportedFormat(format!(
                "{} (choose one of: {})",
                s,
                Self::SUPPORTED
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("JPG".parse::<TargetFormat>().unwrap(), TargetFormat::Jpg);
        assert_eq!("jpeg".parse::<TargetFormat>().unwrap(), TargetFormat::Jpeg);
        assert_eq!("Png".parse::<TargetFormat>().unwrap(), TargetFormat::Png);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "webp".parse::<TargetFormat>().unwrap_err();
        assert!(err.to_string().contains("webp"));
        assert!(err.to_string().contains(TargetFormat::SUPPORTED));
    }

    #[test]
    fn test_default_is_jpg() {
        assert_eq!(TargetFormat::default(), TargetFormat::Jpg);
    }

    #[test]
    fn test_source_matches_heic_any_case() {
        assert!(SourceFormat::matches(Path::new("/photos/IMG_001.HEIC")));
        assert!(SourceFormat::matches(Path::new("img.heic")));
        assert!(!SourceFormat::matches(Path::new("img.jpg")));
        assert!(!SourceFormat::matches(Path::new("heic")));
    }

    #[test]
    fn test_png_uses_png00_coder() {
        assert_eq!(TargetFormat::Png.magick_coder(), "PNG00");
        assert_eq!(TargetFormat::Jpeg.magick_coder(), "JPEG");
    }
}
