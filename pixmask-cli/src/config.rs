//! CLI configuration module
//!
//! Loads default directories and the seed from environment variables,
//! falling back to a `.env` file in the working directory. Command-line
//! arguments always take precedence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

pub const INPUT_PATH_VAR: &str = "PIXMASK_INPUT_PATH";
pub const OUTPUT_PATH_VAR: &str = "PIXMASK_OUTPUT_PATH";
pub const SEED_VAR: &str = "PIXMASK_SEED";
pub const DOTENV_FILE: &str = ".env";

/// Configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory of photos to process (default: ./photos)
    pub input_path: PathBuf,
    /// Directory for modified photos (default: ./modified_photos)
    pub output_path: PathBuf,
    /// Fixed seed for reproducible runs (default: OS entropy)
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("./photos"),
            output_path: PathBuf::from("./modified_photos"),
            seed: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables. Variables set in the
    /// process environment win over the same keys in `.env`.
    pub fn from_env() -> Self {
        let file = read_dotenv(Path::new(DOTENV_FILE));
        Self::from_lookup(|key| std::env::var(key).ok().or_else(|| file.get(key).cloned()))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let input_path = lookup(INPUT_PATH_VAR)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.input_path);

        let output_path = lookup(OUTPUT_PATH_VAR)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.output_path);

        let seed = lookup(SEED_VAR).and_then(|s| s.trim().parse().ok());

        Self {
            input_path,
            output_path,
            seed,
        }
    }
}

/// Read `KEY=value` pairs from a dotenv file without touching the process
/// environment. A missing file yields no pairs.
fn read_dotenv(path: &Path) -> HashMap<String, String> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "No dotenv file loaded");
            return HashMap::new();
        }
    };

    iter.filter_map(|item| match item {
        Ok(pair) => Some(pair),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Skipping malformed dotenv line");
            None
        }
    })
    .collect()
}
