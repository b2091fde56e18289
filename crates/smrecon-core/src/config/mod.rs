//! Reconstruction configuration management.
//!
//! This module provides configuration loading and the global verbose flag.

mod defaults;

#[cfg(test)]
mod tests;

pub use defaults::ReconstructionDefaults;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Deserialize;

// Global verbose flag for controlling diagnostic output
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set the global verbose flag. When true, diagnostic messages will be
/// printed to stderr.
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::SeqCst);
}

/// Check if verbose mode is enabled.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Print a message to stderr only if verbose mode is enabled.
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if $crate::config::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Canonical list of candidate config file names we search for on disk.
const CONFIG_FILENAMES: &[&str] = &["smrecon.yml", "smrecon.yaml"];

/// Complete configuration file structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    defaults: ReconstructionDefaults,
}

/// Loaded configuration together with its source path and any warnings
/// produced while loading.
pub struct ConfigHandle {
    pub defaults: ReconstructionDefaults,
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

/// Load reconstruction defaults, searching the working directory for a
/// `smrecon.yml` / `smrecon.yaml` file.
///
/// A missing file is not an error; built-in defaults apply. An unreadable
/// or unparseable file also falls back to the built-in defaults, with the
/// problem reported as a warning rather than a failure.
pub fn load_defaults() -> ConfigHandle {
    for name in CONFIG_FILENAMES {
        let path = Path::new(name);
        if path.is_file() {
            return load_defaults_from(path);
        }
    }

    ConfigHandle {
        defaults: ReconstructionDefaults::default(),
        source: None,
        warnings: Vec::new(),
    }
}

/// Load reconstruction defaults from a specific file.
pub fn load_defaults_from<P: AsRef<Path>>(path: P) -> ConfigHandle {
    let path = path.as_ref();
    let mut warnings = Vec::new();

    let defaults = match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<ConfigFile>(&contents) {
            Ok(config) => {
                let (defaults, sanitize_warnings) = config.defaults.sanitize();
                warnings.extend(sanitize_warnings);
                defaults
            }
            Err(e) => {
                warnings.push(format!(
                    "Ignoring config {}: failed to parse YAML: {}",
                    path.display(),
                    e
                ));
                ReconstructionDefaults::default()
            }
        },
        Err(e) => {
            warnings.push(format!(
                "Ignoring config {}: failed to read: {}",
                path.display(),
                e
            ));
            ReconstructionDefaults::default()
        }
    };

    ConfigHandle {
        defaults,
        source: Some(path.to_path_buf()),
        warnings,
    }
}
