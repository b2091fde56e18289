//! Public surface checks.
//!
//! The four package-level names and the version string are the crate's
//! published contract; downstream callers import exactly these.

use smrecon_core::{
    ImageFormat, Localization, MaskedReconstructionConfig, SMReconstruction, SMReconstructionMasked,
};

#[test]
fn version_is_pinned() {
    assert_eq!(smrecon_core::VERSION, "0.1.0");
}

#[test]
fn exported_names_are_usable_from_the_crate_root() {
    let recon = SMReconstruction::default();
    let map = recon
        .reconstruct(&[Localization::at(0.0, 0.0), Localization::at(500.0, 500.0)])
        .unwrap();
    assert!(map.total() > 0.0);

    let config = MaskedReconstructionConfig::for_mask("mask.png");
    let masked = SMReconstructionMasked::new(recon.options.clone(), config);
    assert_eq!(masked.config.threshold, 0.5);

    let format: ImageFormat = "png16".parse().unwrap();
    assert_eq!(format.extension(), "png");
}
