//! Single-molecule localization record.

use serde::{Deserialize, Serialize};

/// One detected emitter from a PALM/STORM acquisition.
///
/// Coordinates are in nanometres in the sample plane, with the origin at the
/// top-left corner of the camera field of view (x grows right, y grows down,
/// matching image raster order). This is the convention used by common
/// localization software exports (ThunderSTORM, Picasso).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Localization {
    /// X position in nanometres
    pub x_nm: f32,

    /// Y position in nanometres
    pub y_nm: f32,

    /// Acquisition frame the emitter was detected in, if known
    pub frame: Option<u32>,

    /// Detected photon count (emitter intensity), if known
    pub photons: Option<f32>,

    /// Lateral localization precision in nanometres, if known.
    /// Used as the Gaussian rendering sigma for this emitter.
    pub uncertainty_nm: Option<f32>,
}

impl Localization {
    /// Create a bare localization with only a position.
    pub fn at(x_nm: f32, y_nm: f32) -> Self {
        Self {
            x_nm,
            y_nm,
            frame: None,
            photons: None,
            uncertainty_nm: None,
        }
    }
}
