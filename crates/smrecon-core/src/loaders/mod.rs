//! Input loaders
//!
//! Support for localization tables (CSV) and mask images (PNG, TIFF).
//!
//! This module is organized into submodules:
//! - `localizations`: header-mapped CSV localization tables
//! - `mask_image`: grayscale mask decoding from PNG/TIFF

mod localizations;
mod mask_image;


pub use localizations::{load_localizations, parse_localizations};
pub use mask_image::{load_mask_image, MaskImage};
