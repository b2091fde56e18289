//! Histogram-mode rendering: plain 2-D binning.

use super::{amplitude_for, bin_index, DensityMap};
use crate::models::{Localization, ReconstructionOptions};

/// Accumulate each localization into the bin it falls in. Localizations
/// outside the grid (possible with a fixed field of view) are skipped.
pub(crate) fn render_histogram(
    map: &mut DensityMap,
    localizations: &[Localization],
    options: &ReconstructionOptions,
) {
    let width = map.width as usize;

    for loc in localizations {
        let ix = bin_index(loc.x_nm, map.origin_x_nm, map.pixel_size_nm, map.width);
        let iy = bin_index(loc.y_nm, map.origin_y_nm, map.pixel_size_nm, map.height);

        if let (Some(ix), Some(iy)) = (ix, iy) {
            map.data[iy as usize * width + ix as usize] += amplitude_for(loc, options);
        }
    }
}
