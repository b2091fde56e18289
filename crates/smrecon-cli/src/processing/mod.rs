//! Input expansion and per-file processing.

use std::path::{Path, PathBuf};

use smrecon_core::{SMReconstruction, SMReconstructionMasked};

use crate::types::ReconstructParams;

/// Localization table extensions accepted when expanding a directory.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv"];

/// Expand an input path into the list of files to process.
///
/// A file is returned as-is; a directory expands to its supported files,
/// sorted for deterministic processing order.
pub fn expand_inputs<P: AsRef<Path>>(input: P) -> Result<Vec<PathBuf>, String> {
    let input = input.as_ref();

    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    if !input.is_dir() {
        return Err(format!("Input not found: {}", input.display()));
    }

    let entries = std::fs::read_dir(input)
        .map_err(|e| format!("Failed to read input directory: {}", e))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(format!(
            "No localization tables (*.{}) found in {}",
            SUPPORTED_EXTENSIONS.join(", *."),
            input.display()
        ));
    }

    Ok(files)
}

/// Output path for one input: `<stem>_reconstructed.<ext>` in the output
/// directory (or next to the input when no directory is given).
pub fn determine_output_path(
    input: &Path,
    out: &Option<PathBuf>,
    params: &ReconstructParams,
) -> Result<PathBuf, String> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| format!("Cannot determine file stem for {}", input.display()))?;

    let dir = match out {
        Some(dir) => dir.clone(),
        None => input.parent().unwrap_or(Path::new(".")).to_path_buf(),
    };

    Ok(dir.join(format!(
        "{}_reconstructed.{}",
        stem,
        params.format.extension()
    )))
}

/// Reconstruct one localization table and export the result.
/// Returns the written output path.
pub fn process_single(
    input: &Path,
    out: &Option<PathBuf>,
    params: &ReconstructParams,
) -> Result<PathBuf, String> {
    let output_path = determine_output_path(input, out, params)?;

    match &params.mask {
        Some(mask_config) => {
            let recon = SMReconstructionMasked::new(params.options.clone(), mask_config.clone());
            let result = recon.reconstruct_file(input)?;
            recon.export(&result.map, &output_path, params.format)?;
        }
        None => {
            let recon = SMReconstruction::new(params.options.clone());
            let map = recon.reconstruct_file(input)?;
            recon.export(&map, &output_path, params.format)?;
        }
    }

    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smrecon_core::{ImageFormat, ReconstructionOptions, RenderMode};

    fn params(format: ImageFormat) -> ReconstructParams {
        ReconstructParams {
            options: ReconstructionOptions {
                render_mode: RenderMode::Histogram,
                ..Default::default()
            },
            format,
            mask: None,
        }
    }

    #[test]
    fn test_expand_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locs.csv");
        std::fs::write(&path, "x,y\n1.0,2.0\n").unwrap();

        assert_eq!(expand_inputs(&path).unwrap(), vec![path]);
    }

    #[test]
    fn test_expand_directory_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.csv"), "").unwrap();
        std::fs::write(dir.path().join("a.csv"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let files = expand_inputs(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.csv"));
        assert!(files[1].ends_with("b.csv"));
    }

    #[test]
    fn test_expand_empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = expand_inputs(dir.path()).unwrap_err();
        assert!(err.contains("No localization tables"), "got: {}", err);
    }

    #[test]
    fn test_expand_missing_input_is_an_error() {
        let err = expand_inputs("no/such/path.csv").unwrap_err();
        assert!(err.contains("Input not found"), "got: {}", err);
    }

    #[test]
    fn test_output_path_next_to_input() {
        let path = determine_output_path(
            Path::new("/data/cell1.csv"),
            &None,
            &params(ImageFormat::Tiff16),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/data/cell1_reconstructed.tif"));
    }

    #[test]
    fn test_output_path_in_requested_directory() {
        let path = determine_output_path(
            Path::new("/data/cell1.csv"),
            &Some(PathBuf::from("/out")),
            &params(ImageFormat::Png16),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/out/cell1_reconstructed.png"));
    }

    #[test]
    fn test_process_single_writes_an_image() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("locs.csv");
        std::fs::write(&input, "x,y\n0.0,0.0\n100.0,100.0\n").unwrap();

        let out = Some(dir.path().to_path_buf());
        let written = process_single(&input, &out, &params(ImageFormat::Png16)).unwrap();
        assert!(written.is_file());
        assert!(written.ends_with("locs_reconstructed.png"));
    }
}
