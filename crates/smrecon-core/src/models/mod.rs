//! Data models for SMRecon
//!
//! Core data structures for localizations, reconstruction options, export
//! formats, and masked-reconstruction configuration.

mod format;
mod localization;
mod mask_config;
mod options;


// Re-export all public types to form the crate's model surface
pub use format::ImageFormat;
pub use localization::Localization;
pub use mask_config::{
    load_masked_config, save_masked_config, MaskedReconstructionConfig,
};
pub use options::{FieldOfView, ReconstructionOptions, RenderMode};
