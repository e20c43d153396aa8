//! Inspect command implementation.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use colored::Colorize;
use pixmask_core::{inspect_file, RasterImage};
use tracing::warn;

fn png_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list directory: {}", dir.display()))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        })
        .collect();
    files.sort();
    Ok(files)
}

fn print_image(path: &Path) -> Result<()> {
    let snapshot = inspect_file(path)?;
    let image = RasterImage::open(path)?;

    if snapshot.is_empty() {
        println!("   {}", "No metadata found".yellow());
    } else {
        println!("   {}", "Metadata found:".green());
        for (key, value) in &snapshot.text {
            println!("      {key}: {value}");
        }
        if let Some(len) = snapshot.exif_bytes {
            println!("      exif: {len} bytes");
        }
        if let Some(len) = snapshot.icc_bytes {
            println!("      icc_profile: {len} bytes");
        }
    }
    println!(
        "   {} {}",
        "Format:".dimmed(),
        snapshot.format.as_deref().unwrap_or("unknown")
    );
    println!("   {} {}x{}", "Size:".dimmed(), image.width(), image.height());
    println!("   {} {:?}", "Mode:".dimmed(), image.color());
    Ok(())
}

/// Execute the inspect command.
pub fn execute(dir: PathBuf) -> Result<()> {
    if !dir.is_dir() {
        bail!("Directory not found: {}", dir.display());
    }

    let files = png_files(&dir)?;
    if files.is_empty() {
        println!("{} {}", "No PNG files found in".yellow(), dir.display());
        return Ok(());
    }

    println!("Checking metadata on {} photo(s)...", files.len());
    for path in &files {
        println!();
        println!("{}", path.display().to_string().bold());
        if let Err(e) = print_image(path) {
            warn!(path = %path.display(), error = %e, "Failed to inspect image");
            println!("   {} {}", "Error reading image:".red(), e);
        }
    }
    println!();
    println!("Checked {} photo(s).", files.len());
    Ok(())
}
