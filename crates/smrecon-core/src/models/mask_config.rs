//! Configuration for mask-restricted reconstruction.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for `SMReconstructionMasked`.
///
/// A mask is a grayscale image over the camera field of view (for example a
/// segmented cell outline). Localizations are kept only where the
/// binarized mask accepts them; everything else is discarded before
/// rendering, so rejected emitters never contribute density.
///
/// The mask raster shares its origin with the localization coordinate
/// system (top-left of the camera field of view), and
/// `mask_pixel_size_nm` maps nanometre positions onto mask pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskedReconstructionConfig {
    /// Path to the mask image (grayscale or RGB PNG/TIFF)
    pub mask_path: PathBuf,

    /// Binarization threshold on the normalized mask intensity (0.0-1.0).
    /// Pixels at or above the threshold are accepted.
    pub threshold: f32,

    /// Invert the mask after thresholding (keep localizations *outside*
    /// the bright region)
    pub invert: bool,

    /// Grow the accepted region by this many mask pixels (Chebyshev
    /// dilation). Compensates for tight segmentations that would clip
    /// membrane-proximal emitters.
    pub dilate_px: u32,

    /// Physical size of one mask pixel in nanometres. For masks derived
    /// from the raw camera frames this is the camera pixel size
    /// (commonly ~100 nm).
    pub mask_pixel_size_nm: f32,
}

impl Default for MaskedReconstructionConfig {
    fn default() -> Self {
        Self {
            mask_path: PathBuf::new(),
            threshold: 0.5,
            invert: false,
            dilate_px: 0,
            mask_pixel_size_nm: 100.0,
        }
    }
}

impl MaskedReconstructionConfig {
    /// Configuration for a mask image at `path` with default binarization.
    pub fn for_mask<P: AsRef<Path>>(path: P) -> Self {
        Self {
            mask_path: path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.mask_path.as_os_str().is_empty() {
            return Err("Mask path is empty".to_string());
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(format!(
                "Mask threshold must be in 0.0-1.0, got {}",
                self.threshold
            ));
        }
        if !self.mask_pixel_size_nm.is_finite() || self.mask_pixel_size_nm <= 0.0 {
            return Err(format!(
                "Mask pixel size must be positive, got {}",
                self.mask_pixel_size_nm
            ));
        }
        Ok(())
    }
}

/// Load a masked-reconstruction configuration from a YAML file
pub fn load_masked_config<P: AsRef<Path>>(path: P) -> Result<MaskedReconstructionConfig, String> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read mask config file: {}", e))?;

    serde_yaml::from_str(&contents).map_err(|e| format!("Failed to parse mask config YAML: {}", e))
}

/// Save a masked-reconstruction configuration to a YAML file
pub fn save_masked_config<P: AsRef<Path>>(
    config: &MaskedReconstructionConfig,
    path: P,
) -> Result<(), String> {
    let path = path.as_ref();
    let yaml = serde_yaml::to_string(config)
        .map_err(|e| format!("Failed to serialize mask config: {}", e))?;

    std::fs::write(path, yaml).map_err(|e| format!("Failed to write mask config file: {}", e))
}
