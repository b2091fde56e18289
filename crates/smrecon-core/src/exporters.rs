//! Image exporters for reconstructed density maps
//!
//! Export normalized density maps to grayscale PNG and TIFF.

use crate::models::ImageFormat;
use crate::render::DensityMap;
use std::path::Path;

/// Export a density map to the given format.
///
/// The map is expected to be normalized to the 0.0-1.0 display range
/// (see [`crate::render::normalize_for_export`]); values are clamped and
/// scaled to the target bit depth.
pub fn export_density_map<P: AsRef<Path>>(
    map: &DensityMap,
    path: P,
    format: ImageFormat,
) -> Result<(), String> {
    match format {
        ImageFormat::Png8 => export_png(map, path, png::BitDepth::Eight),
        ImageFormat::Png16 => export_png(map, path, png::BitDepth::Sixteen),
        ImageFormat::Tiff16 => export_tiff16(map, path),
    }
}

/// Export as grayscale PNG at the requested bit depth
fn export_png<P: AsRef<Path>>(
    map: &DensityMap,
    path: P,
    bit_depth: png::BitDepth,
) -> Result<(), String> {
    use std::fs::File;
    use std::io::BufWriter;

    let file =
        File::create(path.as_ref()).map_err(|e| format!("Failed to create PNG file: {}", e))?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, map.width, map.height);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(bit_depth);

    let mut writer = encoder
        .write_header()
        .map_err(|e| format!("Failed to write PNG header: {}", e))?;

    let bytes: Vec<u8> = match bit_depth {
        png::BitDepth::Eight => map
            .data
            .iter()
            .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect(),
        png::BitDepth::Sixteen => {
            // PNG stores 16-bit samples big-endian
            let mut bytes = Vec::with_capacity(map.data.len() * 2);
            for &v in &map.data {
                let sample = (v.clamp(0.0, 1.0) * 65535.0).round() as u16;
                bytes.extend_from_slice(&sample.to_be_bytes());
            }
            bytes
        }
        _ => return Err(format!("Unsupported PNG bit depth: {:?}", bit_depth)),
    };

    writer
        .write_image_data(&bytes)
        .map_err(|e| format!("Failed to write PNG image: {}", e))
}

/// Export as 16-bit grayscale TIFF
fn export_tiff16<P: AsRef<Path>>(map: &DensityMap, path: P) -> Result<(), String> {
    use std::fs::File;
    use std::io::BufWriter;

    // Convert f32 (0.0-1.0) to u16 (0-65535)
    let u16_data: Vec<u16> = map
        .data
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 65535.0).round() as u16)
        .collect();

    let file =
        File::create(path.as_ref()).map_err(|e| format!("Failed to create TIFF file: {}", e))?;
    let writer = BufWriter::new(file);

    let mut encoder = tiff::encoder::TiffEncoder::new(writer)
        .map_err(|e| format!("Failed to create TIFF encoder: {}", e))?;

    encoder
        .write_image::<tiff::encoder::colortype::Gray16>(map.width, map.height, &u16_data)
        .map_err(|e| format!("Failed to write TIFF image: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::load_mask_image;
    use crate::models::{Localization, ReconstructionOptions, RenderMode};
    use crate::render::{normalize_for_export, render};

    fn sample_map() -> DensityMap {
        let locs = [
            Localization::at(0.0, 0.0),
            Localization::at(30.0, 30.0),
            Localization::at(30.0, 30.0),
        ];
        let options = ReconstructionOptions {
            pixel_size_nm: 10.0,
            render_mode: RenderMode::Histogram,
            ..Default::default()
        };
        normalize_for_export(&render(&locs, &options).unwrap(), 100.0)
    }

    #[test]
    fn test_png16_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recon.png");

        let map = sample_map();
        export_density_map(&map, &path, ImageFormat::Png16).unwrap();

        // Reuse the mask loader to decode what we wrote
        let decoded = load_mask_image(&path).unwrap();
        assert_eq!((decoded.width, decoded.height), (map.width, map.height));
        let peak = decoded.data.iter().cloned().fold(0.0f32, f32::max);
        assert_eq!(peak, 1.0);
    }

    #[test]
    fn test_png8_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recon8.png");

        let map = sample_map();
        export_density_map(&map, &path, ImageFormat::Png8).unwrap();

        let decoded = load_mask_image(&path).unwrap();
        let peak = decoded.data.iter().cloned().fold(0.0f32, f32::max);
        assert_eq!(peak, 1.0);
    }

    #[test]
    fn test_tiff16_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recon.tif");

        let map = sample_map();
        export_density_map(&map, &path, ImageFormat::Tiff16).unwrap();

        let decoded = load_mask_image(&path).unwrap();
        assert_eq!((decoded.width, decoded.height), (map.width, map.height));
        // Half-density pixel survives the 16-bit round trip
        assert!(decoded
            .data
            .iter()
            .any(|&v| (v - 0.5).abs() < 1.0 / 65535.0));
    }

    #[test]
    fn test_export_to_unwritable_path_fails() {
        let map = sample_map();
        let err =
            export_density_map(&map, "/nonexistent/dir/out.png", ImageFormat::Png16).unwrap_err();
        assert!(err.contains("Failed to create"), "got: {}", err);
    }
}
