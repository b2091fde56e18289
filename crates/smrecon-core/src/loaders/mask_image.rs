//! Mask image decoding.
//!
//! Masks are grayscale images over the camera field of view. RGB sources
//! are accepted and averaged to luma; everything is normalized to f32 in
//! the 0.0-1.0 range.

use std::path::Path;

/// A decoded grayscale mask image
#[derive(Debug, Clone)]
pub struct MaskImage {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Normalized grayscale intensity (f32, 0.0-1.0 range), row-major
    pub data: Vec<f32>,
}

/// Decode a mask image from a file path
pub fn load_mask_image<P: AsRef<Path>>(path: P) -> Result<MaskImage, String> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| "No file extension found".to_string())?;

    match extension.as_str() {
        "tif" | "tiff" => decode_tiff(path),
        "png" => decode_png(path),
        _ => Err(format!("Unsupported mask format: {}", extension)),
    }
}

/// Decode a PNG mask
fn decode_png<P: AsRef<Path>>(path: P) -> Result<MaskImage, String> {
    use std::fs::File;
    use std::io::BufReader;

    let file = File::open(path.as_ref()).map_err(|e| format!("Failed to open PNG file: {}", e))?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let mut reader = decoder
        .read_info()
        .map_err(|e| format!("Failed to read PNG info: {}", e))?;

    let info = reader.info();
    let width = info.width;
    let height = info.height;
    let color_type = info.color_type;
    let bit_depth = info.bit_depth;

    let buffer_size = reader
        .output_buffer_size()
        .ok_or_else(|| "Failed to determine PNG buffer size".to_string())?;
    let mut buf = vec![0u8; buffer_size];
    let frame_info = reader
        .next_frame(&mut buf)
        .map_err(|e| format!("Failed to read PNG frame: {}", e))?;

    let bytes = &buf[..frame_info.buffer_size()];

    let data = match (color_type, bit_depth) {
        (png::ColorType::Grayscale, png::BitDepth::Eight) => {
            gray8_to_f32(bytes, width, height, 1)?
        }
        (png::ColorType::Grayscale, png::BitDepth::Sixteen) => {
            gray16_to_f32(bytes, width, height, 1)?
        }
        (png::ColorType::Rgb, png::BitDepth::Eight) => rgb8_to_f32(bytes, width, height)?,
        (png::ColorType::Rgb, png::BitDepth::Sixteen) => rgb16_to_f32(bytes, width, height)?,
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => {
            gray8_to_f32(bytes, width, height, 2)?
        }
        (png::ColorType::Indexed, _) => {
            return Err("Indexed PNG masks not supported".to_string());
        }
        _ => {
            return Err(format!(
                "Unsupported PNG mask format: {:?} with bit depth {:?}",
                color_type, bit_depth
            ));
        }
    };

    Ok(MaskImage {
        width,
        height,
        data,
    })
}

/// Decode a TIFF mask
fn decode_tiff<P: AsRef<Path>>(path: P) -> Result<MaskImage, String> {
    use std::fs::File;
    use std::io::BufReader;

    let file = File::open(path.as_ref()).map_err(|e| format!("Failed to open TIFF file: {}", e))?;
    let mut decoder = tiff::decoder::Decoder::new(BufReader::new(file))
        .map_err(|e| format!("Failed to create TIFF decoder: {}", e))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| format!("Failed to get TIFF dimensions: {}", e))?;

    let color_type = decoder
        .colortype()
        .map_err(|e| format!("Failed to get TIFF color type: {}", e))?;

    let image_data = decoder
        .read_image()
        .map_err(|e| format!("Failed to read TIFF image data: {}", e))?;

    let grayscale = matches!(color_type, tiff::ColorType::Gray(_));

    let data = match image_data {
        tiff::decoder::DecodingResult::U8(buf) => {
            normalize_buffer(&buf, width, height, grayscale, |v| v as f32 / 255.0)?
        }
        tiff::decoder::DecodingResult::U16(buf) => {
            normalize_buffer(&buf, width, height, grayscale, |v| v as f32 / 65535.0)?
        }
        tiff::decoder::DecodingResult::F32(buf) => {
            normalize_buffer(&buf, width, height, grayscale, |v| v.clamp(0.0, 1.0))?
        }
        _ => {
            return Err("Unsupported TIFF mask bit depth (expected 8/16-bit or f32)".to_string());
        }
    };

    Ok(MaskImage {
        width,
        height,
        data,
    })
}

/// Normalize a decoded TIFF buffer to grayscale f32, averaging RGB to luma.
fn normalize_buffer<T: Copy>(
    buf: &[T],
    width: u32,
    height: u32,
    grayscale: bool,
    to_f32: impl Fn(T) -> f32,
) -> Result<Vec<f32>, String> {
    let pixels = (width * height) as usize;

    if grayscale {
        if buf.len() != pixels {
            return Err(format!(
                "TIFF buffer size mismatch: expected {}, got {}",
                pixels,
                buf.len()
            ));
        }
        Ok(buf.iter().map(|&v| to_f32(v)).collect())
    } else {
        if buf.len() != pixels * 3 {
            return Err(format!(
                "TIFF buffer size mismatch: expected {}, got {}",
                pixels * 3,
                buf.len()
            ));
        }
        Ok(buf
            .chunks_exact(3)
            .map(|rgb| (to_f32(rgb[0]) + to_f32(rgb[1]) + to_f32(rgb[2])) / 3.0)
            .collect())
    }
}

/// Decode 8-bit grayscale samples, skipping any alpha channel.
fn gray8_to_f32(bytes: &[u8], width: u32, height: u32, stride: usize) -> Result<Vec<f32>, String> {
    let expected_len = (width * height) as usize * stride;
    if bytes.len() != expected_len {
        return Err(format!(
            "PNG buffer size mismatch: expected {}, got {}",
            expected_len,
            bytes.len()
        ));
    }

    Ok(bytes
        .chunks_exact(stride)
        .map(|px| px[0] as f32 / 255.0)
        .collect())
}

/// Decode 16-bit big-endian grayscale samples.
fn gray16_to_f32(
    bytes: &[u8],
    width: u32,
    height: u32,
    stride: usize,
) -> Result<Vec<f32>, String> {
    let expected_len = (width * height) as usize * stride * 2;
    if bytes.len() != expected_len {
        return Err(format!(
            "PNG buffer size mismatch: expected {}, got {}",
            expected_len,
            bytes.len()
        ));
    }

    Ok(bytes
        .chunks_exact(stride * 2)
        .map(|px| u16::from_be_bytes([px[0], px[1]]) as f32 / 65535.0)
        .collect())
}

/// Decode 8-bit RGB and average to luma.
fn rgb8_to_f32(bytes: &[u8], width: u32, height: u32) -> Result<Vec<f32>, String> {
    let expected_len = (width * height * 3) as usize;
    if bytes.len() != expected_len {
        return Err(format!(
            "PNG buffer size mismatch: expected {}, got {}",
            expected_len,
            bytes.len()
        ));
    }

    Ok(bytes
        .chunks_exact(3)
        .map(|rgb| (rgb[0] as f32 + rgb[1] as f32 + rgb[2] as f32) / (3.0 * 255.0))
        .collect())
}

/// Decode 16-bit big-endian RGB and average to luma.
fn rgb16_to_f32(bytes: &[u8], width: u32, height: u32) -> Result<Vec<f32>, String> {
    let expected_len = (width * height * 6) as usize;
    if bytes.len() != expected_len {
        return Err(format!(
            "PNG buffer size mismatch: expected {}, got {}",
            expected_len,
            bytes.len()
        ));
    }

    Ok(bytes
        .chunks_exact(6)
        .map(|rgb| {
            let r = u16::from_be_bytes([rgb[0], rgb[1]]) as f32;
            let g = u16::from_be_bytes([rgb[2], rgb[3]]) as f32;
            let b = u16::from_be_bytes([rgb[4], rgb[5]]) as f32;
            (r + g + b) / (3.0 * 65535.0)
        })
        .collect())
}
