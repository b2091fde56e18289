//! Default reconstruction parameter values and their sanitization.

use crate::models::{ImageFormat, ReconstructionOptions, RenderMode};
use serde::Deserialize;

/// On-disk reconstruction defaults.
///
/// Every field is optional in the YAML file; unset fields take the
/// built-in values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReconstructionDefaults {
    /// Pixel size of the rendered grid in nanometres
    pub pixel_size_nm: f32,

    /// Rendering mode (gaussian or histogram)
    pub render_mode: RenderMode,

    /// Sigma for localizations without an uncertainty estimate, nanometres
    pub default_sigma_nm: f32,

    /// Lower clamp on the rendering sigma, nanometres
    pub min_sigma_nm: f32,

    /// Weight localizations by photon count
    pub weight_by_photons: bool,

    /// Percentile mapped to full white when normalizing for export
    pub normalize_percentile: f32,

    /// Export format when none is requested explicitly
    pub export_format: ImageFormat,
}

impl Default for ReconstructionDefaults {
    fn default() -> Self {
        let options = ReconstructionOptions::default();
        Self {
            pixel_size_nm: options.pixel_size_nm,
            render_mode: options.render_mode,
            default_sigma_nm: options.default_sigma_nm,
            min_sigma_nm: options.min_sigma_nm,
            weight_by_photons: options.weight_by_photons,
            normalize_percentile: options.normalize_percentile,
            export_format: ImageFormat::default(),
        }
    }
}

impl ReconstructionDefaults {
    /// Replace out-of-range values with the built-in defaults, reporting
    /// each replacement as a warning.
    pub fn sanitize(mut self) -> (Self, Vec<String>) {
        let reference = Self::default();
        let mut warnings = Vec::new();

        let mut check = |value: &mut f32, fallback: f32, name: &str, allow_zero: bool| {
            let invalid = !value.is_finite() || *value < 0.0 || (*value == 0.0 && !allow_zero);
            if invalid {
                warnings.push(format!(
                    "Config value {} = {} is invalid; using {}",
                    name, value, fallback
                ));
                *value = fallback;
            }
        };

        check(
            &mut self.pixel_size_nm,
            reference.pixel_size_nm,
            "pixel_size_nm",
            false,
        );
        check(
            &mut self.default_sigma_nm,
            reference.default_sigma_nm,
            "default_sigma_nm",
            false,
        );
        check(
            &mut self.min_sigma_nm,
            reference.min_sigma_nm,
            "min_sigma_nm",
            true,
        );

        if !self.normalize_percentile.is_finite()
            || !(0.0..=100.0).contains(&self.normalize_percentile)
        {
            warnings.push(format!(
                "Config value normalize_percentile = {} is invalid; using {}",
                self.normalize_percentile, reference.normalize_percentile
            ));
            self.normalize_percentile = reference.normalize_percentile;
        }

        (self, warnings)
    }

    /// Reconstruction options seeded from these defaults.
    pub fn to_options(&self) -> ReconstructionOptions {
        ReconstructionOptions {
            pixel_size_nm: self.pixel_size_nm,
            render_mode: self.render_mode,
            default_sigma_nm: self.default_sigma_nm,
            min_sigma_nm: self.min_sigma_nm,
            weight_by_photons: self.weight_by_photons,
            normalize_percentile: self.normalize_percentile,
            field_of_view: None,
        }
    }
}
