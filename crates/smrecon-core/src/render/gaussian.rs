//! Gaussian-mode rendering: per-localization kernel splatting.
//!
//! Each localization deposits a 2-D Gaussian with sigma equal to its
//! localization precision (or the configured default), truncated at
//! 3 sigma. The deposited weights are renormalized over the truncated
//! window, so every on-grid localization contributes exactly its
//! amplitude regardless of truncation or edge clipping.

use rayon::prelude::*;

use super::{amplitude_for, sigma_for, DensityMap, PARALLEL_THRESHOLD};
use crate::models::{Localization, ReconstructionOptions};

pub(crate) fn render_gaussian(
    map: &mut DensityMap,
    localizations: &[Localization],
    options: &ReconstructionOptions,
) {
    let len = map.data.len();

    if localizations.len() >= PARALLEL_THRESHOLD {
        // Shared reborrow for the splat geometry; `data` is reassigned below
        let geometry: &DensityMap = map;
        // Fold into per-thread partial maps, then reduce by summation
        let data = localizations
            .par_iter()
            .fold(
                || vec![0.0f32; len],
                |mut partial, loc| {
                    splat(&mut partial, geometry, loc, options);
                    partial
                },
            )
            .reduce(
                || vec![0.0f32; len],
                |mut a, b| {
                    for (dst, src) in a.iter_mut().zip(b.iter()) {
                        *dst += src;
                    }
                    a
                },
            );
        map.data = data;
    } else {
        let mut data = std::mem::take(&mut map.data);
        for loc in localizations {
            splat(&mut data, map, loc, options);
        }
        map.data = data;
    }
}

/// Deposit one localization's kernel into `data`.
fn splat(data: &mut [f32], map: &DensityMap, loc: &Localization, options: &ReconstructionOptions) {
    let pixel = map.pixel_size_nm;
    let width = map.width as i64;
    let height = map.height as i64;

    // Kernel center and sigma in pixel units
    let cx = (loc.x_nm - map.origin_x_nm) / pixel;
    let cy = (loc.y_nm - map.origin_y_nm) / pixel;
    let sigma = sigma_for(loc, options) / pixel;

    let radius = (3.0 * sigma).ceil().max(1.0) as i64;
    let x0 = (cx.floor() as i64 - radius).max(0);
    let x1 = (cx.floor() as i64 + radius).min(width - 1);
    let y0 = (cy.floor() as i64 - radius).max(0);
    let y1 = (cy.floor() as i64 + radius).min(height - 1);

    if x0 > x1 || y0 > y1 {
        // Entirely off the grid (fixed field of view)
        return;
    }

    let inv_two_sigma_sq = 1.0 / (2.0 * sigma * sigma);

    // First pass: raw weights over the truncated window
    let window_width = (x1 - x0 + 1) as usize;
    let window_height = (y1 - y0 + 1) as usize;
    let mut weights = vec![0.0f32; window_width * window_height];
    let mut weight_sum = 0.0f32;

    for wy in 0..window_height {
        // Pixel-center offsets from the kernel center
        let dy = (y0 + wy as i64) as f32 + 0.5 - cy;
        for wx in 0..window_width {
            let dx = (x0 + wx as i64) as f32 + 0.5 - cx;
            let w = (-(dx * dx + dy * dy) * inv_two_sigma_sq).exp();
            weights[wy * window_width + wx] = w;
            weight_sum += w;
        }
    }

    if weight_sum <= 0.0 {
        return;
    }

    // Second pass: deposit, normalized to the localization's amplitude
    let scale = amplitude_for(loc, options) / weight_sum;
    for wy in 0..window_height {
        let row = (y0 + wy as i64) as usize * map.width as usize;
        for wx in 0..window_width {
            data[row + (x0 + wx as i64) as usize] += weights[wy * window_width + wx] * scale;
        }
    }
}
