//! Tests for configuration loading and sanitization.

use super::*;
use crate::models::RenderMode;

#[test]
fn test_builtin_defaults_when_no_file_present() {
    let dir = tempfile::tempdir().unwrap();
    let handle = load_defaults_from(dir.path().join("absent.yml"));
    assert_eq!(handle.defaults, ReconstructionDefaults::default());
    assert_eq!(handle.warnings.len(), 1);
    assert!(handle.warnings[0].contains("failed to read"));
}

#[test]
fn test_load_partial_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("smrecon.yml");
    std::fs::write(
        &path,
        "defaults:\n  pixel_size_nm: 5.0\n  render_mode: histogram\n",
    )
    .unwrap();

    let handle = load_defaults_from(&path);
    assert!(handle.warnings.is_empty());
    assert_eq!(handle.defaults.pixel_size_nm, 5.0);
    assert_eq!(handle.defaults.render_mode, RenderMode::Histogram);
    // Unspecified fields keep their built-in values
    assert_eq!(
        handle.defaults.default_sigma_nm,
        ReconstructionDefaults::default().default_sigma_nm
    );
}

#[test]
fn test_invalid_yaml_falls_back_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("smrecon.yml");
    std::fs::write(&path, "defaults: [not, a, mapping]\n").unwrap();

    let handle = load_defaults_from(&path);
    assert_eq!(handle.defaults, ReconstructionDefaults::default());
    assert_eq!(handle.warnings.len(), 1);
    assert!(handle.warnings[0].contains("failed to parse"));
}

#[test]
fn test_sanitize_replaces_out_of_range_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("smrecon.yml");
    std::fs::write(
        &path,
        "defaults:\n  pixel_size_nm: -3.0\n  normalize_percentile: 250.0\n",
    )
    .unwrap();

    let handle = load_defaults_from(&path);
    assert_eq!(handle.warnings.len(), 2);
    let reference = ReconstructionDefaults::default();
    assert_eq!(handle.defaults.pixel_size_nm, reference.pixel_size_nm);
    assert_eq!(
        handle.defaults.normalize_percentile,
        reference.normalize_percentile
    );
}

#[test]
fn test_defaults_convert_to_valid_options() {
    let options = ReconstructionDefaults::default().to_options();
    assert!(options.validate().is_ok());
}

#[test]
fn test_verbose_flag_round_trip() {
    set_verbose(true);
    assert!(is_verbose());
    set_verbose(false);
    assert!(!is_verbose());
}
