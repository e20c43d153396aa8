//! Delete command implementation.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use colored::Colorize;
use tracing::{info, warn};

/// Files removed and files that could not be removed.
#[derive(Debug, Default)]
struct Cleanup {
    deleted: Vec<PathBuf>,
    failed: Vec<(PathBuf, std::io::Error)>,
}

/// Delete every regular file directly inside `dir`. A failure on one file
/// is recorded and the rest are still attempted.
fn clear_directory(dir: &Path) -> Result<Cleanup> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list directory: {}", dir.display()))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    let mut cleanup = Cleanup::default();
    for file in files {
        match std::fs::remove_file(&file) {
            Ok(()) => {
                info!(path = %file.display(), "Deleted file");
                cleanup.deleted.push(file);
            }
            Err(e) => {
                warn!(path = %file.display(), error = %e, "Failed to delete file");
                cleanup.failed.push((file, e));
            }
        }
    }
    Ok(cleanup)
}

/// Execute the delete command.
pub fn execute(path: PathBuf, verbose: bool, quiet: bool) -> Result<()> {
    if !path.is_dir() {
        bail!("Directory not found: {}", path.display());
    }

    if verbose {
        println!("Deleting files in: {}", path.display());
    }

    let cleanup = clear_directory(&path)?;
    if cleanup.deleted.is_empty() && cleanup.failed.is_empty() {
        if !quiet {
            println!("No files found to delete.");
        }
        return Ok(());
    }

    if verbose {
        for file in &cleanup.deleted {
            println!("  {} Deleted: {}", "✓".green(), file_name(file));
        }
    }
    for (file, error) in &cleanup.failed {
        eprintln!(
            "  {} Failed to delete {}: {}",
            "✗".red(),
            file_name(file),
            error
        );
    }

    if !quiet {
        println!(
            "Deleted {} file(s) from {}",
            cleanup.deleted.len(),
            path.display()
        );
        println!("Folder {} remains intact.", path.display());
    }
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
