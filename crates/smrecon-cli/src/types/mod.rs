//! Parameter types shared between the CLI commands.

use smrecon_core::{ImageFormat, MaskedReconstructionConfig, ReconstructionOptions};

/// Everything needed to process one localization table.
#[derive(Debug, Clone)]
pub struct ReconstructParams {
    /// Rendering options
    pub options: ReconstructionOptions,

    /// Export encoding
    pub format: ImageFormat,

    /// Mask configuration; `None` runs an unmasked reconstruction
    pub mask: Option<MaskedReconstructionConfig>,
}
