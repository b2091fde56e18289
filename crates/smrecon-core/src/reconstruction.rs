//! Reconstruction entry points.
//!
//! `SMReconstruction` renders a localization table into a
//! super-resolution density map; `SMReconstructionMasked` does the same
//! after restricting the localizations to a binarized mask.

use std::path::Path;

use crate::exporters::export_density_map;
use crate::loaders::{load_localizations, load_mask_image};
use crate::mask::BinaryMask;
use crate::models::{
    ImageFormat, Localization, MaskedReconstructionConfig, ReconstructionOptions,
};
use crate::render::{normalize_for_export, render, DensityMap};
use crate::verbose_println;

/// Unmasked single-molecule reconstruction.
#[derive(Debug, Clone, Default)]
pub struct SMReconstruction {
    pub options: ReconstructionOptions,
}

impl SMReconstruction {
    pub fn new(options: ReconstructionOptions) -> Self {
        Self { options }
    }

    /// Render localizations into a density map.
    pub fn reconstruct(&self, localizations: &[Localization]) -> Result<DensityMap, String> {
        verbose_println!(
            "Rendering {} localizations at {} nm/px ({:?} mode)",
            localizations.len(),
            self.options.pixel_size_nm,
            self.options.render_mode
        );
        render(localizations, &self.options)
    }

    /// Load a localization table and render it.
    pub fn reconstruct_file<P: AsRef<Path>>(&self, path: P) -> Result<DensityMap, String> {
        let localizations = load_localizations(path)?;
        self.reconstruct(&localizations)
    }

    /// Normalize a density map and write it to disk in the given format.
    pub fn export<P: AsRef<Path>>(
        &self,
        map: &DensityMap,
        path: P,
        format: ImageFormat,
    ) -> Result<(), String> {
        let normalized = normalize_for_export(map, self.options.normalize_percentile);
        export_density_map(&normalized, path, format)
    }
}

/// Result of a masked reconstruction.
#[derive(Debug, Clone)]
pub struct MaskedReconstruction {
    /// The rendered density map over the accepted localizations
    pub map: DensityMap,

    /// Localizations that fell on accepted mask pixels
    pub accepted: usize,

    /// Localizations rejected by the mask (including those off the mask
    /// raster entirely)
    pub rejected: usize,
}

/// Mask-restricted single-molecule reconstruction.
///
/// Localizations are filtered against the binarized mask before
/// rendering, so rejected emitters never contribute density and the
/// derived field of view covers only the accepted set.
#[derive(Debug, Clone, Default)]
pub struct SMReconstructionMasked {
    pub options: ReconstructionOptions,
    pub config: MaskedReconstructionConfig,
}

impl SMReconstructionMasked {
    pub fn new(options: ReconstructionOptions, config: MaskedReconstructionConfig) -> Self {
        Self { options, config }
    }

    /// Load and binarize the configured mask.
    pub fn load_mask(&self) -> Result<BinaryMask, String> {
        self.config.validate()?;
        let image = load_mask_image(&self.config.mask_path)?;
        let mask = BinaryMask::from_image(&image, &self.config);
        if mask.accepted_pixels() == 0 {
            return Err(format!(
                "Mask {} accepts no pixels at threshold {}",
                self.config.mask_path.display(),
                self.config.threshold
            ));
        }
        Ok(mask)
    }

    /// Filter localizations through the mask and render the survivors.
    pub fn reconstruct(
        &self,
        localizations: &[Localization],
    ) -> Result<MaskedReconstruction, String> {
        let mask = self.load_mask()?;
        self.reconstruct_with_mask(localizations, &mask)
    }

    /// Like [`reconstruct`](Self::reconstruct), but with an already-loaded
    /// mask. Useful when rendering many tables against one mask.
    pub fn reconstruct_with_mask(
        &self,
        localizations: &[Localization],
        mask: &BinaryMask,
    ) -> Result<MaskedReconstruction, String> {
        let (accepted, rejected) = mask.filter(localizations);
        verbose_println!(
            "Mask kept {} of {} localizations ({} rejected)",
            accepted.len(),
            localizations.len(),
            rejected
        );

        if accepted.is_empty() {
            return Err(format!(
                "Mask rejected all {} localizations",
                localizations.len()
            ));
        }

        let map = render(&accepted, &self.options)?;
        Ok(MaskedReconstruction {
            map,
            accepted: accepted.len(),
            rejected,
        })
    }

    /// Load a localization table, filter it through the mask, and render.
    pub fn reconstruct_file<P: AsRef<Path>>(&self, path: P) -> Result<MaskedReconstruction, String> {
        let localizations = load_localizations(path)?;
        self.reconstruct(&localizations)
    }

    /// Normalize a density map and write it to disk in the given format.
    pub fn export<P: AsRef<Path>>(
        &self,
        map: &DensityMap,
        path: P,
        format: ImageFormat,
    ) -> Result<(), String> {
        let normalized = normalize_for_export(map, self.options.normalize_percentile);
        export_density_map(&normalized, path, format)
    }
}
