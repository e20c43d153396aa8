//! Batch orchestration.
//!
//! A run discovers the images in a directory, masks each one, passes it
//! through the [`SafetyGate`], and persists the accepted ones as
//! `modified_photo_<index>.png` with their forged metadata embedded.
//! One image failing never stops the run.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::codec;
use crate::entropy::SeedSource;
use crate::error::{MaskError, Result};
use crate::gate::SafetyGate;
use crate::params::TransformParams;
use crate::pipeline::{MaskPipeline, MaskedImage};

/// File extensions picked up by discovery, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "bmp", "tiff", "webp"];

/// Ordered (original, modified) file pairs from a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhotoMapping(Vec<(PathBuf, PathBuf)>);

impl PhotoMapping {
    pub fn from_pairs(pairs: Vec<(PathBuf, PathBuf)>) -> Self {
        Self(pairs)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.0.iter().map(|(o, m)| (o.as_path(), m.as_path()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn push(&mut self, original: PathBuf, modified: PathBuf) {
        self.0.push((original, modified));
    }
}

/// What happened to one discovered image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageOutcome {
    /// Accepted and written to `output`
    Persisted { output: PathBuf },
    /// Accepted, but writing it failed
    PersistFailed { error: String },
    /// Turned away by the safety gate, or the gate could not decide
    Rejected { reason: String },
    /// A pipeline stage failed
    Failed { error: String },
}

/// Per-image entry in a [`BatchSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    /// 1-based discovery index
    pub index: usize,
    pub source: PathBuf,
    #[serde(flatten)]
    pub outcome: ImageOutcome,
}

/// Totals and per-image outcomes of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub discovered: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub failed: usize,
    pub persisted: usize,
    pub outcomes: Vec<ImageRecord>,
    pub mapping: PhotoMapping,
}

impl BatchSummary {
    /// Images that passed the gate and were written.
    pub fn accepted_count(&self) -> usize {
        self.persisted
    }

    /// Every discovered image without a written output: failed stages,
    /// gate rejections and failed writes.
    pub fn rejected_count(&self) -> usize {
        self.discovered - self.persisted
    }

    pub fn persist_failures(&self) -> usize {
        self.accepted - self.persisted
    }
}

/// List supported image files directly inside `dir`, sorted by path.
pub fn discover_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| MaskError::read(dir, e))?;
    Ok(collect_images(entries.map(|entry| entry.map(|e| e.path()))))
}

/// Keep supported image files from a directory listing. Entries that could
/// not be read are logged and skipped.
fn collect_images(entries: impl IntoIterator<Item = std::io::Result<PathBuf>>) -> Vec<PathBuf> {
    let mut images: Vec<PathBuf> = entries
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                None
            }
        })
        .filter(|path| path.is_file() && has_supported_extension(path))
        .collect();
    images.sort();
    images
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

/// Output file name for the image at a 1-based discovery index.
pub fn output_file_name(index: usize) -> String {
    format!("modified_photo_{index}.png")
}

/// Runs the mask pipeline over whole directories.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    pipeline: MaskPipeline,
    seed: SeedSource,
}

impl BatchProcessor {
    pub fn new(params: TransformParams) -> Result<Self> {
        Ok(Self {
            pipeline: MaskPipeline::new(params)?,
            seed: SeedSource::default(),
        })
    }

    /// Use a fixed seed (or OS entropy) for the run's generator.
    pub fn with_seed(mut self, seed: SeedSource) -> Self {
        self.seed = seed;
        self
    }

    pub fn params(&self) -> &TransformParams {
        self.pipeline.params()
    }

    /// Process every supported image in `input_dir` into `output_dir`.
    pub fn run(&self, input_dir: &Path, output_dir: &Path) -> Result<BatchSummary> {
        if !input_dir.is_dir() {
            return Err(MaskError::InputDirMissing(input_dir.to_path_buf()));
        }

        let images = discover_images(input_dir)?;
        info!(
            input = %input_dir.display(),
            count = images.len(),
            seed = %self.seed,
            "Discovered images"
        );

        let mut summary = BatchSummary {
            discovered: images.len(),
            ..Default::default()
        };
        if images.is_empty() {
            return Ok(summary);
        }

        std::fs::create_dir_all(output_dir)?;
        let gate = SafetyGate::new(output_dir);
        let mut rng = self.seed.rng();

        let mut accepted: Vec<(usize, PathBuf, MaskedImage)> = Vec::new();
        for (i, path) in images.into_iter().enumerate() {
            let index = i + 1;

            let masked = match self.pipeline.mask_file(&path, &mut rng) {
                Ok(masked) => masked,
                Err(e) => {
                    error!(index, path = %path.display(), error = %e, "Failed to process image");
                    summary.failed += 1;
                    summary.outcomes.push(ImageRecord {
                        index,
                        source: path,
                        outcome: ImageOutcome::Failed {
                            error: e.to_string(),
                        },
                    });
                    continue;
                }
            };

            let rejection = match gate.check(&path, &masked.image) {
                Ok(verdict) => verdict.rejection_reason(),
                Err(e) => Some(format!("safety check error: {e}")),
            };
            match rejection {
                None => {
                    debug!(index, path = %path.display(), "Image accepted");
                    accepted.push((index, path, masked));
                }
                Some(reason) => {
                    warn!(index, path = %path.display(), reason = %reason, "Image rejected");
                    summary.rejected += 1;
                    summary.outcomes.push(ImageRecord {
                        index,
                        source: path,
                        outcome: ImageOutcome::Rejected { reason },
                    });
                }
            }
        }

        summary.accepted = accepted.len();
        for (index, source, masked) in accepted {
            let output = output_dir.join(output_file_name(index));
            let outcome = match codec::save_png_with_text(
                &output,
                &masked.image.to_rgb8(),
                masked.fake_metadata.entries(),
            ) {
                Ok(()) => {
                    info!(index, output = %output.display(), "Saved modified image");
                    summary.persisted += 1;
                    summary.mapping.push(source.clone(), output.clone());
                    ImageOutcome::Persisted { output }
                }
                Err(e) => {
                    error!(index, output = %output.display(), error = %e, "Failed to save image");
                    ImageOutcome::PersistFailed {
                        error: e.to_string(),
                    }
                }
            };
            summary.outcomes.push(ImageRecord {
                index,
                source,
                outcome,
            });
        }
        summary.outcomes.sort_by_key(|record| record.index);

        info!(
            discovered = summary.discovered,
            accepted = summary.accepted,
            rejected = summary.rejected,
            failed = summary.failed,
            persisted = summary.persisted,
            "Batch complete"
        );
        Ok(summary)
    }
}

/// One-call batch run with OS-seeded randomness.
pub fn process(
    input_dir: &Path,
    output_dir: &Path,
    color_enhancement: f64,
    crop_percentage: f64,
    pixel_frequency: u32,
    pixel_intensity: u8,
    aggressive_mode: bool,
) -> Result<BatchSummary> {
    let params = TransformParams {
        pixel_frequency,
        pixel_intensity,
        crop_percentage,
        color_enhancement,
        aggressive_mode,
    };
    BatchProcessor::new(params)?.run(input_dir, output_dir)
}
