//! Argument parsing helpers.

use smrecon_core::{ImageFormat, RenderMode};

/// Parse an export format name (png8, png16, tiff16).
pub fn parse_image_format(format_str: &str) -> Result<ImageFormat, String> {
    format_str.parse()
}

/// Parse a render mode name (gaussian, histogram).
pub fn parse_render_mode(mode_str: &str) -> Result<RenderMode, String> {
    mode_str.parse()
}
