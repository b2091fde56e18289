//! Localization rendering
//!
//! Turns a set of localizations into a super-resolution density map.
//!
//! This module is organized into submodules:
//! - `histogram`: 2-D binning renderer
//! - `gaussian`: Gaussian-splatting renderer
//! - `normalize`: percentile normalization for export

mod gaussian;
mod histogram;
mod normalize;

#[cfg(test)]
mod tests;

pub use normalize::normalize_for_export;

use crate::models::{Localization, ReconstructionOptions, RenderMode};

/// Rendering switches to per-thread partial maps above this many
/// localizations.
pub(crate) const PARALLEL_THRESHOLD: usize = 50_000;

/// Hard cap on the render grid, pixels. A runaway pixel size (or a stray
/// localization light-years from the rest) should fail loudly instead of
/// exhausting memory.
const MAX_GRID_PIXELS: u64 = 1 << 28;

/// A rendered super-resolution density map.
///
/// Values are accumulated density (counts or photon weights), not yet
/// normalized for display. Data is row-major, one f32 per pixel.
#[derive(Debug, Clone)]
pub struct DensityMap {
    /// Grid width in pixels
    pub width: u32,

    /// Grid height in pixels
    pub height: u32,

    /// Accumulated density, row-major
    pub data: Vec<f32>,

    /// Pixel size of the grid in nanometres
    pub pixel_size_nm: f32,

    /// World-space x coordinate of the grid's left edge, nanometres
    pub origin_x_nm: f32,

    /// World-space y coordinate of the grid's top edge, nanometres
    pub origin_y_nm: f32,
}

impl DensityMap {
    /// An all-zero map over the given grid.
    pub(crate) fn zeros(spec: &GridSpec, pixel_size_nm: f32) -> Self {
        Self {
            width: spec.width,
            height: spec.height,
            data: vec![0.0; (spec.width as usize) * (spec.height as usize)],
            pixel_size_nm,
            origin_x_nm: spec.origin_x_nm,
            origin_y_nm: spec.origin_y_nm,
        }
    }

    /// Density at a pixel. Panics on out-of-range coordinates.
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[(y as usize) * (self.width as usize) + x as usize]
    }

    /// Sum of all pixel densities.
    pub fn total(&self) -> f32 {
        self.data.iter().sum()
    }

    /// Largest pixel density.
    pub fn peak(&self) -> f32 {
        self.data.iter().fold(0.0f32, |acc, &v| acc.max(v))
    }
}

/// Grid geometry derived from the data or a fixed field of view.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GridSpec {
    pub width: u32,
    pub height: u32,
    pub origin_x_nm: f32,
    pub origin_y_nm: f32,
}

/// Render localizations into a density map.
///
/// Routes to the renderer selected by `options.render_mode`. The grid
/// covers `options.field_of_view` when set, otherwise the bounding box of
/// the localizations (padded by 3 sigma of the widest kernel in Gaussian
/// mode, so truncated splats stay on-grid).
pub fn render(
    localizations: &[Localization],
    options: &ReconstructionOptions,
) -> Result<DensityMap, String> {
    options.validate()?;

    if localizations.is_empty() {
        return Err("No localizations to render".to_string());
    }

    let spec = derive_grid(localizations, options)?;
    let mut map = DensityMap::zeros(&spec, options.pixel_size_nm);

    match options.render_mode {
        RenderMode::Histogram => histogram::render_histogram(&mut map, localizations, options),
        RenderMode::Gaussian => gaussian::render_gaussian(&mut map, localizations, options),
    }

    Ok(map)
}

/// Rendering sigma for one localization, in nanometres.
pub(crate) fn sigma_for(loc: &Localization, options: &ReconstructionOptions) -> f32 {
    let sigma = match loc.uncertainty_nm {
        Some(s) if s.is_finite() && s > 0.0 => s,
        _ => options.default_sigma_nm,
    };
    sigma.max(options.min_sigma_nm)
}

/// Density contribution of one localization.
pub(crate) fn amplitude_for(loc: &Localization, options: &ReconstructionOptions) -> f32 {
    if options.weight_by_photons {
        match loc.photons {
            Some(p) if p.is_finite() && p > 0.0 => p,
            _ => 1.0,
        }
    } else {
        1.0
    }
}

fn derive_grid(
    localizations: &[Localization],
    options: &ReconstructionOptions,
) -> Result<GridSpec, String> {
    let pixel = options.pixel_size_nm;

    let (origin_x, origin_y, extent_x, extent_y) = match &options.field_of_view {
        Some(fov) => (fov.x_nm, fov.y_nm, fov.width_nm, fov.height_nm),
        None => {
            let mut min_x = f32::INFINITY;
            let mut max_x = f32::NEG_INFINITY;
            let mut min_y = f32::INFINITY;
            let mut max_y = f32::NEG_INFINITY;
            for loc in localizations {
                min_x = min_x.min(loc.x_nm);
                max_x = max_x.max(loc.x_nm);
                min_y = min_y.min(loc.y_nm);
                max_y = max_y.max(loc.y_nm);
            }

            let margin = match options.render_mode {
                RenderMode::Histogram => 0.0,
                RenderMode::Gaussian => {
                    let max_sigma = localizations
                        .iter()
                        .map(|loc| sigma_for(loc, options))
                        .fold(0.0f32, f32::max);
                    3.0 * max_sigma
                }
            };

            (
                min_x - margin,
                min_y - margin,
                max_x - min_x + 2.0 * margin,
                max_y - min_y + 2.0 * margin,
            )
        }
    };

    // Degenerate extents (a single localization) still get a 1x1 grid
    let width = (extent_x / pixel).ceil().max(1.0);
    let height = (extent_y / pixel).ceil().max(1.0);

    if !width.is_finite() || !height.is_finite() {
        return Err("Render grid size is not finite; check input coordinates".to_string());
    }

    let pixels = width as u64 * height as u64;
    if pixels > MAX_GRID_PIXELS {
        return Err(format!(
            "Render grid of {}x{} pixels exceeds the {}-pixel limit; \
             increase the pixel size or fix the field of view",
            width as u64, height as u64, MAX_GRID_PIXELS
        ));
    }

    Ok(GridSpec {
        width: width as u32,
        height: height as u32,
        origin_x_nm: origin_x,
        origin_y_nm: origin_y,
    })
}

/// Map a world coordinate to a bin index, clamping the far edge into the
/// last bin. Returns `None` for positions off the grid.
pub(crate) fn bin_index(position_nm: f32, origin_nm: f32, pixel_nm: f32, size: u32) -> Option<u32> {
    let offset = position_nm - origin_nm;
    if offset < 0.0 || offset > size as f32 * pixel_nm {
        return None;
    }
    // Positions exactly on the far edge belong to the last bin
    Some(((offset / pixel_nm).floor() as u32).min(size - 1))
}
