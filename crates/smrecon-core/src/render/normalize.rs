//! Percentile normalization for export.

use super::DensityMap;

const NUM_BUCKETS: usize = 65536;

/// Scale a density map into the 0.0-1.0 display range.
///
/// `percentile` (0-100) selects the occupied-pixel density mapped to full
/// white; everything above it clips. 100.0 normalizes by the peak pixel,
/// which lets one bright cluster crush the rest of the image — 99.9 is a
/// better default for typical PALM data.
///
/// The percentile is computed over occupied pixels only. Density maps are
/// mostly empty background, so ranking zeros would pin every percentile
/// to zero.
pub fn normalize_for_export(map: &DensityMap, percentile: f32) -> DensityMap {
    let mut out = map.clone();

    let peak = map.peak();
    if peak <= 0.0 {
        // Nothing rendered; leave the zeros as-is
        return out;
    }

    let reference = if percentile >= 100.0 {
        peak
    } else {
        percentile_value(&map.data, peak, percentile)
    };

    let reference = if reference > 0.0 { reference } else { peak };

    for v in &mut out.data {
        *v = (*v / reference).clamp(0.0, 1.0);
    }

    out
}

/// Density value at the given percentile of the occupied pixels, via a
/// fixed-bucket histogram over 0..peak.
fn percentile_value(data: &[f32], peak: f32, percentile: f32) -> f32 {
    let mut histogram = vec![0u32; NUM_BUCKETS];
    let mut occupied = 0u64;

    for &v in data {
        if v > 0.0 {
            let bucket = ((v / peak * (NUM_BUCKETS - 1) as f32) as usize).min(NUM_BUCKETS - 1);
            histogram[bucket] += 1;
            occupied += 1;
        }
    }

    if occupied == 0 {
        return peak;
    }

    let target = (percentile as f64 / 100.0 * occupied as f64).ceil() as u64;
    let mut cumulative = 0u64;
    for (bucket, &count) in histogram.iter().enumerate() {
        cumulative += count as u64;
        if cumulative >= target {
            return bucket as f32 / (NUM_BUCKETS - 1) as f32 * peak;
        }
    }

    peak
}
