//! Export image formats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Encodings supported for reconstructed density maps.
///
/// Density maps are single-channel, so all variants are grayscale. 16-bit
/// variants preserve far more of the dynamic range of a reconstruction and
/// are the right choice for quantitative work; 8-bit PNG is for quick
/// visual inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// 8-bit grayscale PNG
    Png8,
    /// 16-bit grayscale PNG
    Png16,
    /// 16-bit grayscale TIFF
    Tiff16,
}

impl ImageFormat {
    /// File extension for this format (without the leading dot).
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png8 | ImageFormat::Png16 => "png",
            ImageFormat::Tiff16 => "tif",
        }
    }

    /// Pick a format from a file extension. 16-bit output is the default
    /// for both container types.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png16),
            "tif" | "tiff" => Some(ImageFormat::Tiff16),
            _ => None,
        }
    }
}

impl Default for ImageFormat {
    fn default() -> Self {
        ImageFormat::Png16
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageFormat::Png8 => "png8",
            ImageFormat::Png16 => "png16",
            ImageFormat::Tiff16 => "tiff16",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png8" => Ok(ImageFormat::Png8),
            "png16" | "png" => Ok(ImageFormat::Png16),
            "tiff16" | "tiff" | "tif" => Ok(ImageFormat::Tiff16),
            other => Err(format!(
                "Unknown image format: {} (expected png8, png16, or tiff16)",
                other
            )),
        }
    }
}
