//! Localization table parsing.
//!
//! Reads CSV exports from common localization software (ThunderSTORM,
//! Picasso, and similar). Columns are matched by header name, so column
//! order does not matter.

use crate::models::Localization;
use std::path::Path;

/// Resolved column indices for one table.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    x: usize,
    y: usize,
    frame: Option<usize>,
    photons: Option<usize>,
    uncertainty: Option<usize>,
}

/// Load a localization table from a CSV file
pub fn load_localizations<P: AsRef<Path>>(path: P) -> Result<Vec<Localization>, String> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read localization file: {}", e))?;

    parse_localizations(&contents)
        .map_err(|e| format!("{}: {}", path.display(), e))
}

/// Parse a localization table from CSV text.
///
/// The first non-empty line must be a header row. Header names are matched
/// case-insensitively with punctuation and units stripped, so
/// `"x [nm]"`, `x_nm`, and `X` all map to the x column. Positions are
/// required; frame, intensity, and uncertainty columns are optional.
pub fn parse_localizations(contents: &str) -> Result<Vec<Localization>, String> {
    let mut lines = contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines
        .next()
        .ok_or_else(|| "Localization table is empty".to_string())?;
    let columns = map_columns(header)?;

    let mut localizations = Vec::new();
    for (index, line) in lines {
        let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();
        localizations.push(parse_row(&fields, &columns).map_err(|e| {
            // Line numbers are 1-based for error messages
            format!("Line {}: {}", index + 1, e)
        })?);
    }

    Ok(localizations)
}

/// Normalize a header name for matching: lowercase, alphanumerics only.
/// "Uncertainty_xy [nm]" becomes "uncertaintyxynm".
fn normalize_header(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

const X_NAMES: &[&str] = &["x", "xnm", "xpositionnm"];
const Y_NAMES: &[&str] = &["y", "ynm", "ypositionnm"];
const FRAME_NAMES: &[&str] = &["frame", "framenumber", "t"];
const PHOTON_NAMES: &[&str] = &["intensity", "intensityphoton", "photons", "photoncount"];
const UNCERTAINTY_NAMES: &[&str] = &[
    "uncertainty",
    "uncertaintynm",
    "uncertaintyxy",
    "uncertaintyxynm",
    "precision",
    "precisionnm",
    "lpnm",
];

fn map_columns(header: &str) -> Result<ColumnMap, String> {
    let names: Vec<String> = header.split(',').map(normalize_header).collect();

    let find = |candidates: &[&str]| {
        names
            .iter()
            .position(|name| candidates.contains(&name.as_str()))
    };

    let x = find(X_NAMES);
    let y = find(Y_NAMES);

    match (x, y) {
        (Some(x), Some(y)) => Ok(ColumnMap {
            x,
            y,
            frame: find(FRAME_NAMES),
            photons: find(PHOTON_NAMES),
            uncertainty: find(UNCERTAINTY_NAMES),
        }),
        _ => Err(format!(
            "No x/y position columns found in header: {}",
            header.trim()
        )),
    }
}

fn parse_row(fields: &[&str], columns: &ColumnMap) -> Result<Localization, String> {
    let float_at = |index: usize, what: &str| -> Result<f32, String> {
        let field = fields
            .get(index)
            .ok_or_else(|| format!("Missing {} field (column {})", what, index + 1))?;
        field
            .parse::<f32>()
            .map_err(|_| format!("Invalid {} value: {}", what, field))
    };

    let optional_float = |index: Option<usize>, what: &str| -> Result<Option<f32>, String> {
        match index {
            Some(index) => float_at(index, what).map(Some),
            None => Ok(None),
        }
    };

    let x_nm = float_at(columns.x, "x")?;
    let y_nm = float_at(columns.y, "y")?;
    if !x_nm.is_finite() || !y_nm.is_finite() {
        return Err(format!("Non-finite position: ({}, {})", x_nm, y_nm));
    }

    let frame = match columns.frame {
        // Frame columns sometimes carry a float representation ("12.0")
        Some(index) => Some(float_at(index, "frame")?.round() as u32),
        None => None,
    };

    Ok(Localization {
        x_nm,
        y_nm,
        frame,
        photons: optional_float(columns.photons, "intensity")?,
        uncertainty_nm: optional_float(columns.uncertainty, "uncertainty")?,
    })
}
