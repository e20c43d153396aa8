//! Safety gate.
//!
//! Before an image is kept, it is written once to a scratch PNG with no
//! metadata and compared against the original file:
//!
//! - the whole-file content hash must differ, and
//! - the scratch file must carry zero metadata items.
//!
//! Top-left and top-right corner hashes are computed as well and reported
//! in the verdict, but they do not decide acceptance.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::codec;
use crate::error::{MaskError, Result};
use crate::hash::{corner_hash, ContentHash, Corner, DEFAULT_CORNER_SIZE};
use crate::metadata::inspect_file;
use crate::raster::RasterImage;

/// Whether each corner region's hash changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CornerComparison {
    pub top_left_changed: bool,
    pub top_right_changed: bool,
}

/// Outcome of a gate check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafetyVerdict {
    pub hash_changed_whole: bool,
    pub metadata_count_after: usize,
    /// Informational only
    pub corners: CornerComparison,
    pub accepted: bool,
}

impl SafetyVerdict {
    /// Why the image was turned away, if it was.
    pub fn rejection_reason(&self) -> Option<String> {
        if self.accepted {
            None
        } else if !self.hash_changed_whole {
            Some("content hash identical to original".into())
        } else {
            Some(format!(
                "{} metadata item(s) remain",
                self.metadata_count_after
            ))
        }
    }
}

/// Compares transformed images against their source files.
#[derive(Debug, Clone)]
pub struct SafetyGate {
    scratch_dir: PathBuf,
    corner_size: u32,
}

impl SafetyGate {
    /// Scratch files are created in, and removed from, `scratch_dir`.
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            corner_size: DEFAULT_CORNER_SIZE,
        }
    }

    pub fn with_corner_size(mut self, corner_size: u32) -> Self {
        self.corner_size = corner_size;
        self
    }

    /// Check `image` against the file it came from.
    ///
    /// Errors mean the safety properties could not be confirmed; callers
    /// must treat them as a rejection.
    pub fn check(&self, original_path: &Path, image: &RasterImage) -> Result<SafetyVerdict> {
        let mut scratch = tempfile::Builder::new()
            .prefix("pixmask-gate-")
            .suffix(".png")
            .tempfile_in(&self.scratch_dir)?;
        debug!(path = %scratch.path().display(), "Created scratch file");

        let result = self.evaluate(original_path, image, &mut scratch);

        let scratch_path = scratch.path().to_path_buf();
        if let Err(e) = scratch.close() {
            warn!(path = %scratch_path.display(), error = %e, "Failed to remove scratch file");
        }

        let verdict = result?;
        if verdict.accepted {
            info!(
                path = %original_path.display(),
                top_left_changed = verdict.corners.top_left_changed,
                top_right_changed = verdict.corners.top_right_changed,
                "Safety checks passed"
            );
        } else {
            warn!(
                path = %original_path.display(),
                hash_changed = verdict.hash_changed_whole,
                metadata_items = verdict.metadata_count_after,
                "Safety checks failed"
            );
        }
        Ok(verdict)
    }

    fn evaluate(
        &self,
        original_path: &Path,
        image: &RasterImage,
        scratch: &mut NamedTempFile,
    ) -> Result<SafetyVerdict> {
        let encoded = codec::encode_png(image.image())?;
        scratch.write_all(&encoded)?;
        scratch.flush()?;

        let original_bytes =
            std::fs::read(original_path).map_err(|e| MaskError::read(original_path, e))?;
        let original_hash = ContentHash::from_bytes(&original_bytes);
        let modified_hash = ContentHash::from_file(scratch.path())?;
        let hash_changed_whole = original_hash != modified_hash;
        debug!(
            original = %original_hash.short_hex(),
            modified = %modified_hash.short_hex(),
            "Compared content hashes"
        );

        let metadata_count_after = inspect_file(scratch.path())?.item_count();

        let original_image = image::load_from_memory(&original_bytes)?;
        let corner_changed = |corner: Corner| -> Result<bool> {
            let before = corner_hash(&original_image, corner, self.corner_size)?;
            let after = corner_hash(image.image(), corner, self.corner_size)?;
            Ok(before != after)
        };
        let corners = CornerComparison {
            top_left_changed: corner_changed(Corner::TopLeft)?,
            top_right_changed: corner_changed(Corner::TopRight)?,
        };

        Ok(SafetyVerdict {
            hash_changed_whole,
            metadata_count_after,
            corners,
            accepted: hash_changed_whole && metadata_count_after == 0,
        })
    }
}
