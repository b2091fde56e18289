//! Tests for the rendering pipeline
//!
//! Grid derivation, histogram binning, Gaussian mass conservation, and
//! normalization.

use super::*;
use crate::models::{FieldOfView, Localization, ReconstructionOptions, RenderMode};

fn histogram_options(pixel_size_nm: f32) -> ReconstructionOptions {
    ReconstructionOptions {
        pixel_size_nm,
        render_mode: RenderMode::Histogram,
        ..Default::default()
    }
}

fn gaussian_options(pixel_size_nm: f32) -> ReconstructionOptions {
    ReconstructionOptions {
        pixel_size_nm,
        render_mode: RenderMode::Gaussian,
        ..Default::default()
    }
}

// ========================================================================
// Grid Derivation Tests
// ========================================================================

#[test]
fn test_empty_input_is_an_error() {
    let err = render(&[], &histogram_options(10.0)).unwrap_err();
    assert!(err.contains("No localizations"), "got: {}", err);
}

#[test]
fn test_single_localization_histogram_gets_a_grid() {
    let locs = [Localization::at(500.0, 500.0)];
    let map = render(&locs, &histogram_options(10.0)).unwrap();
    // Degenerate bounding box still renders
    assert_eq!((map.width, map.height), (1, 1));
    assert_eq!(map.get(0, 0), 1.0);
}

#[test]
fn test_histogram_grid_covers_bounding_box() {
    let locs = [Localization::at(0.0, 0.0), Localization::at(100.0, 50.0)];
    let map = render(&locs, &histogram_options(10.0)).unwrap();
    assert_eq!((map.width, map.height), (10, 5));
    assert_eq!(map.origin_x_nm, 0.0);
    assert_eq!(map.origin_y_nm, 0.0);
}

#[test]
fn test_gaussian_grid_is_padded_by_three_sigma() {
    let options = ReconstructionOptions {
        default_sigma_nm: 20.0,
        ..gaussian_options(10.0)
    };
    let locs = [Localization::at(0.0, 0.0), Localization::at(100.0, 100.0)];
    let map = render(&locs, &options).unwrap();
    // 100 nm extent + 2 * 3 * 20 nm margin = 220 nm -> 22 px
    assert_eq!((map.width, map.height), (22, 22));
    assert_eq!(map.origin_x_nm, -60.0);
}

#[test]
fn test_fixed_field_of_view_pins_the_grid() {
    let options = ReconstructionOptions {
        field_of_view: Some(FieldOfView {
            x_nm: 0.0,
            y_nm: 0.0,
            width_nm: 1000.0,
            height_nm: 500.0,
        }),
        ..histogram_options(10.0)
    };
    // Data far outside the FOV must not change the grid
    let locs = [Localization::at(5000.0, 5000.0)];
    let map = render(&locs, &options).unwrap();
    assert_eq!((map.width, map.height), (100, 50));
    assert_eq!(map.total(), 0.0);
}

#[test]
fn test_oversized_grid_is_rejected() {
    let locs = [
        Localization::at(0.0, 0.0),
        Localization::at(1.0e9, 1.0e9),
    ];
    let err = render(&locs, &histogram_options(1.0)).unwrap_err();
    assert!(err.contains("exceeds"), "got: {}", err);
}

// ========================================================================
// Histogram Renderer Tests
// ========================================================================

#[test]
fn test_histogram_counts_per_bin() {
    let locs = [
        Localization::at(5.0, 5.0),
        Localization::at(6.0, 6.0),
        Localization::at(15.0, 5.0),
        Localization::at(0.0, 20.0),
    ];
    let options = ReconstructionOptions {
        field_of_view: Some(FieldOfView {
            x_nm: 0.0,
            y_nm: 0.0,
            width_nm: 30.0,
            height_nm: 30.0,
        }),
        ..histogram_options(10.0)
    };
    let map = render(&locs, &options).unwrap();
    assert_eq!(map.get(0, 0), 2.0);
    assert_eq!(map.get(1, 0), 1.0);
    assert_eq!(map.get(0, 2), 1.0);
    assert_eq!(map.total(), 4.0);
}

#[test]
fn test_histogram_far_edge_lands_in_last_bin() {
    let locs = [Localization::at(0.0, 0.0), Localization::at(100.0, 100.0)];
    let map = render(&locs, &histogram_options(10.0)).unwrap();
    // The (100, 100) localization sits exactly on the far edge
    assert_eq!(map.get(9, 9), 1.0);
    assert_eq!(map.total(), 2.0);
}

#[test]
fn test_histogram_photon_weighting() {
    let mut loc = Localization::at(5.0, 5.0);
    loc.photons = Some(250.0);
    let options = ReconstructionOptions {
        weight_by_photons: true,
        ..histogram_options(10.0)
    };
    let map = render(&[loc], &options).unwrap();
    assert_eq!(map.total(), 250.0);
}

// ========================================================================
// Gaussian Renderer Tests
// ========================================================================

#[test]
fn test_gaussian_mass_is_conserved() {
    let locs: Vec<Localization> = (0..25)
        .map(|i| Localization::at(100.0 + 20.0 * (i % 5) as f32, 100.0 + 20.0 * (i / 5) as f32))
        .collect();
    let map = render(&locs, &gaussian_options(10.0)).unwrap();
    // Window renormalization makes every splat contribute exactly 1.0
    assert!(
        (map.total() - locs.len() as f32).abs() < 1e-3,
        "total = {}",
        map.total()
    );
}

#[test]
fn test_gaussian_peak_is_at_the_localization() {
    let locs = [Localization::at(200.0, 200.0)];
    let map = render(&locs, &gaussian_options(10.0)).unwrap();
    let peak = map.peak();
    // Center pixel of the padded grid
    let cx = map.width / 2;
    let cy = map.height / 2;
    assert_eq!(map.get(cx, cy), peak);
    assert!(peak > 0.0 && peak < 1.0);
}

#[test]
fn test_gaussian_uses_per_localization_uncertainty() {
    let mut sharp = Localization::at(500.0, 500.0);
    sharp.uncertainty_nm = Some(8.0);
    let mut blurry = Localization::at(500.0, 500.0);
    blurry.uncertainty_nm = Some(40.0);

    let options = gaussian_options(10.0);
    let sharp_map = render(&[sharp], &options).unwrap();
    let blurry_map = render(&[blurry], &options).unwrap();

    // Same unit mass, so the tighter kernel has the higher peak
    assert!(sharp_map.peak() > blurry_map.peak());
}

#[test]
fn test_gaussian_sigma_clamped_to_minimum() {
    let mut loc = Localization::at(500.0, 500.0);
    loc.uncertainty_nm = Some(0.001);
    let options = ReconstructionOptions {
        min_sigma_nm: 5.0,
        ..gaussian_options(10.0)
    };
    let map = render(&[loc], &options).unwrap();
    // A 0.001 nm sigma would put all mass in one pixel; the clamp spreads it
    assert!(map.peak() < 1.0);
    assert!((map.total() - 1.0).abs() < 1e-3);
}

#[test]
fn test_gaussian_off_grid_localization_is_skipped() {
    let options = ReconstructionOptions {
        field_of_view: Some(FieldOfView {
            x_nm: 0.0,
            y_nm: 0.0,
            width_nm: 100.0,
            height_nm: 100.0,
        }),
        ..gaussian_options(10.0)
    };
    let map = render(&[Localization::at(10_000.0, 10_000.0)], &options).unwrap();
    assert_eq!(map.total(), 0.0);
}

// ========================================================================
// Normalization Tests
// ========================================================================

#[test]
fn test_normalize_peak_maps_to_one() {
    let locs = [
        Localization::at(5.0, 5.0),
        Localization::at(5.0, 5.0),
        Localization::at(25.0, 25.0),
    ];
    let options = ReconstructionOptions {
        normalize_percentile: 100.0,
        field_of_view: Some(FieldOfView {
            x_nm: 0.0,
            y_nm: 0.0,
            width_nm: 30.0,
            height_nm: 30.0,
        }),
        ..histogram_options(10.0)
    };
    let map = render(&locs, &options).unwrap();
    let normalized = normalize_for_export(&map, options.normalize_percentile);
    assert_eq!(normalized.get(0, 0), 1.0);
    assert_eq!(normalized.get(2, 2), 0.5);
}

#[test]
fn test_normalize_percentile_clips_outliers() {
    // 99 pixels at density 1.0 and one at 100.0
    let spec = GridSpec {
        width: 10,
        height: 10,
        origin_x_nm: 0.0,
        origin_y_nm: 0.0,
    };
    let mut map = DensityMap::zeros(&spec, 10.0);
    for v in &mut map.data {
        *v = 1.0;
    }
    map.data[0] = 100.0;

    let normalized = normalize_for_export(&map, 95.0);
    // The outlier clips to 1.0 and the bulk stays visible
    assert_eq!(normalized.data[0], 1.0);
    assert!(normalized.data[1] > 0.9);
}

#[test]
fn test_normalize_empty_map_stays_zero() {
    let spec = GridSpec {
        width: 4,
        height: 4,
        origin_x_nm: 0.0,
        origin_y_nm: 0.0,
    };
    let map = DensityMap::zeros(&spec, 10.0);
    let normalized = normalize_for_export(&map, 99.9);
    assert!(normalized.data.iter().all(|&v| v == 0.0));
}
