//! Binary masks over the camera field of view.
//!
//! A decoded grayscale mask is binarized against a threshold, optionally
//! inverted and dilated, and then used to filter localizations before
//! rendering.

use crate::loaders::MaskImage;
use crate::models::{Localization, MaskedReconstructionConfig};

/// A binarized mask aligned with the localization coordinate system.
///
/// The raster origin coincides with the coordinate origin (top-left of the
/// camera field of view); `pixel_size_nm` maps nanometre positions onto
/// mask pixels.
#[derive(Debug, Clone)]
pub struct BinaryMask {
    /// Mask width in pixels
    pub width: u32,

    /// Mask height in pixels
    pub height: u32,

    /// Accepted pixels, row-major
    pub data: Vec<bool>,

    /// Physical size of one mask pixel in nanometres
    pub pixel_size_nm: f32,
}

impl BinaryMask {
    /// Binarize a decoded mask image according to the configuration:
    /// threshold, then optional inversion, then optional dilation.
    pub fn from_image(image: &MaskImage, config: &MaskedReconstructionConfig) -> Self {
        let mut data: Vec<bool> = image
            .data
            .iter()
            .map(|&v| (v >= config.threshold) != config.invert)
            .collect();

        if config.dilate_px > 0 {
            data = dilate(&data, image.width, image.height, config.dilate_px);
        }

        Self {
            width: image.width,
            height: image.height,
            data,
            pixel_size_nm: config.mask_pixel_size_nm,
        }
    }

    /// Number of accepted pixels.
    pub fn accepted_pixels(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// Whether a sample-plane position falls on an accepted mask pixel.
    /// Positions outside the mask raster are rejected.
    pub fn contains_nm(&self, x_nm: f32, y_nm: f32) -> bool {
        if x_nm < 0.0 || y_nm < 0.0 {
            return false;
        }
        let ix = (x_nm / self.pixel_size_nm).floor() as u64;
        let iy = (y_nm / self.pixel_size_nm).floor() as u64;
        if ix >= self.width as u64 || iy >= self.height as u64 {
            return false;
        }
        self.data[iy as usize * self.width as usize + ix as usize]
    }

    /// Split localizations into the accepted set and a rejected count.
    pub fn filter(&self, localizations: &[Localization]) -> (Vec<Localization>, usize) {
        let accepted: Vec<Localization> = localizations
            .iter()
            .filter(|loc| self.contains_nm(loc.x_nm, loc.y_nm))
            .copied()
            .collect();
        let rejected = localizations.len() - accepted.len();
        (accepted, rejected)
    }
}

/// Chebyshev (square structuring element) dilation by `radius` pixels.
fn dilate(data: &[bool], width: u32, height: u32, radius: u32) -> Vec<bool> {
    let width = width as i64;
    let height = height as i64;
    let radius = radius as i64;
    let mut out = vec![false; data.len()];

    for y in 0..height {
        for x in 0..width {
            if !data[(y * width + x) as usize] {
                continue;
            }
            let y0 = (y - radius).max(0);
            let y1 = (y + radius).min(height - 1);
            let x0 = (x - radius).max(0);
            let x1 = (x + radius).min(width - 1);
            for ny in y0..=y1 {
                for nx in x0..=x1 {
                    out[(ny * width + nx) as usize] = true;
                }
            }
        }
    }

    out
}
