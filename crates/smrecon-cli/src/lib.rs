//! Shared utilities for smrecon-cli
//!
//! Reusable argument parsing and batch-processing helpers kept out of
//! `main.rs` so they can be unit-tested.

pub mod parsers;
pub mod processing;
pub mod types;

// Re-export commonly used items at the crate root for convenience
pub use parsers::{parse_image_format, parse_render_mode};
pub use processing::{
    determine_output_path, expand_inputs, process_single, SUPPORTED_EXTENSIONS,
};
pub use types::ReconstructParams;
