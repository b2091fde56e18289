//! SMRecon Core Library
//!
//! Single-molecule reconstruction for PALM-like localization data:
//! load localization tables, render them into super-resolution density
//! maps (optionally restricted to a mask), and export the result as
//! grayscale PNG or TIFF.

pub mod config;
pub mod exporters;
pub mod loaders;
pub mod mask;
pub mod models;
pub mod reconstruction;
pub mod render;

// Re-export the package's public surface
pub use models::{ImageFormat, MaskedReconstructionConfig};
pub use reconstruction::{SMReconstruction, SMReconstructionMasked};

// Commonly used supporting types
pub use mask::BinaryMask;
pub use models::{FieldOfView, Localization, ReconstructionOptions, RenderMode};
pub use reconstruction::MaskedReconstruction;
pub use render::DensityMap;

/// Package version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
