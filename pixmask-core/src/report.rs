//! Post-run verification of a [`PhotoMapping`].
//!
//! Both reporters only read files. A pair that cannot be read shows up as an
//! error entry rather than failing the whole report.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::batch::PhotoMapping;
use crate::error::Result;
use crate::hash::{corner_hash, ContentHash, Corner, DEFAULT_CORNER_SIZE};
use crate::metadata::{inspect_file, MetadataSnapshot};

/// Result of comparing one region across a pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum HashComparison {
    Different { original: String, modified: String },
    Identical { hash: String },
    Error { error: String },
}

impl HashComparison {
    fn compare(original: Result<ContentHash>, modified: Result<ContentHash>) -> Self {
        match (original, modified) {
            (Ok(o), Ok(m)) if o == m => Self::Identical { hash: o.short_hex() },
            (Ok(o), Ok(m)) => Self::Different {
                original: o.short_hex(),
                modified: m.short_hex(),
            },
            (Err(e), _) | (_, Err(e)) => Self::Error {
                error: e.to_string(),
            },
        }
    }

    pub fn is_identical(&self) -> bool {
        matches!(self, Self::Identical { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairHashes {
    pub original: PathBuf,
    pub modified: PathBuf,
    pub whole: HashComparison,
    pub top_left: HashComparison,
    pub top_right: HashComparison,
}

impl PairHashes {
    pub fn comparisons(&self) -> [&HashComparison; 3] {
        [&self.whole, &self.top_left, &self.top_right]
    }
}

/// Tally of one region's comparisons across every pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegionTally {
    pub different: usize,
    pub identical: usize,
    pub errors: usize,
}

impl RegionTally {
    fn add(&mut self, comparison: &HashComparison) {
        match comparison {
            HashComparison::Different { .. } => self.different += 1,
            HashComparison::Identical { .. } => self.identical += 1,
            HashComparison::Error { .. } => self.errors += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HashReport {
    pub pairs: Vec<PairHashes>,
    pub whole: RegionTally,
    pub top_left: RegionTally,
    pub top_right: RegionTally,
}

impl HashReport {
    /// True when no region of any pair hashed identically.
    pub fn passed(&self) -> bool {
        self.pairs
            .iter()
            .all(|pair| !pair.comparisons().iter().any(|c| c.is_identical()))
    }
}

/// Compare whole-file and corner hashes of every pair.
pub fn compare_hashes(mapping: &PhotoMapping) -> HashReport {
    let mut report = HashReport::default();

    for (original, modified) in mapping.iter() {
        let whole = HashComparison::compare(
            ContentHash::from_file(original),
            ContentHash::from_file(modified),
        );
        let corners = decode_pair(original, modified);
        let corner = |c: Corner| match &corners {
            Ok((o, m)) => HashComparison::compare(
                corner_hash(o, c, DEFAULT_CORNER_SIZE),
                corner_hash(m, c, DEFAULT_CORNER_SIZE),
            ),
            Err(error) => HashComparison::Error {
                error: error.clone(),
            },
        };
        let pair = PairHashes {
            original: original.to_path_buf(),
            modified: modified.to_path_buf(),
            whole,
            top_left: corner(Corner::TopLeft),
            top_right: corner(Corner::TopRight),
        };

        if pair.comparisons().iter().any(|c| c.is_identical()) {
            warn!(original = %original.display(), "Hash unchanged for at least one region");
        }
        report.whole.add(&pair.whole);
        report.top_left.add(&pair.top_left);
        report.top_right.add(&pair.top_right);
        report.pairs.push(pair);
    }

    debug!(pairs = report.pairs.len(), passed = report.passed(), "Hash comparison done");
    report
}

fn decode_pair(
    original: &Path,
    modified: &Path,
) -> std::result::Result<(image::DynamicImage, image::DynamicImage), String> {
    let open = |path: &Path| image::open(path).map_err(|e| format!("{}: {e}", path.display()));
    Ok((open(original)?, open(modified)?))
}

/// Metadata before and after for one pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairMetadata {
    pub original: PathBuf,
    pub modified: PathBuf,
    pub original_count: usize,
    pub modified_count: usize,
    /// Original items still present in the modified file
    pub residual: Vec<String>,
    pub error: Option<String>,
}

impl PairMetadata {
    pub fn is_clean(&self) -> bool {
        self.residual.is_empty() && self.error.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetadataRemovalReport {
    pub pairs: Vec<PairMetadata>,
}

impl MetadataRemovalReport {
    pub fn passed(&self) -> bool {
        self.pairs.iter().all(PairMetadata::is_clean)
    }

    pub fn residual_count(&self) -> usize {
        self.pairs.iter().map(|p| p.residual.len()).sum()
    }
}

/// Check that nothing from each original's metadata survived.
///
/// Forged entries are expected in the modified files and are not counted as
/// residue unless an original carried the same key.
pub fn verify_metadata_removal(mapping: &PhotoMapping) -> MetadataRemovalReport {
    let pairs = mapping
        .iter()
        .map(|(original, modified)| {
            let (original_count, modified_count, residual, error) =
                match (inspect_file(original), inspect_file(modified)) {
                    (Ok(before), Ok(after)) => (
                        before.item_count(),
                        after.item_count(),
                        residual_items(&before, &after),
                        None,
                    ),
                    (Err(e), _) | (_, Err(e)) => {
                        warn!(original = %original.display(), error = %e, "Metadata inspection failed");
                        (0, 0, Vec::new(), Some(e.to_string()))
                    }
                };
            PairMetadata {
                original: original.to_path_buf(),
                modified: modified.to_path_buf(),
                original_count,
                modified_count,
                residual,
                error,
            }
        })
        .collect();

    MetadataRemovalReport { pairs }
}

fn residual_items(before: &MetadataSnapshot, after: &MetadataSnapshot) -> Vec<String> {
    let remaining: BTreeSet<String> = after.keys().into_iter().collect();
    before
        .keys()
        .into_iter()
        .filter(|key| remaining.contains(key))
        .collect()
}
