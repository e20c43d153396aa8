//! pixmask core - photo hash masking library
//!
//! Applies small randomized changes to photos so that the exact content hash
//! of every output file differs from its original, while the picture looks
//! the same, then checks that it worked.
//!
//! # Pipeline
//!
//! Each image goes through, in order:
//!
//! 1. sparse pixel perturbation
//! 2. symmetric margin crop
//! 3. dot stamping (four strategic dots, a centre dot, 800 tiny dots)
//! 4. saturation adjustment
//! 5. metadata scrub via a lossless PNG round trip
//! 6. forged text metadata
//!
//! A [`SafetyGate`] then accepts the result only if its content hash differs
//! from the original file and it carries no metadata.
//!
//! # Example
//!
//! ```no_run
//! use pixmask_core::{BatchProcessor, SeedSource, TransformParams};
//! use std::path::Path;
//!
//! # fn example() -> pixmask_core::Result<()> {
//! let summary = BatchProcessor::new(TransformParams::default())?
//!     .with_seed(SeedSource::Fixed(42))
//!     .run(Path::new("photos"), Path::new("modified_photos"))?;
//!
//! println!("{} accepted, {} rejected", summary.accepted_count(), summary.rejected_count());
//!
//! let hashes = pixmask_core::compare_hashes(&summary.mapping);
//! assert!(hashes.passed());
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod codec;
pub mod entropy;
pub mod error;
pub mod gate;
pub mod hash;
pub mod metadata;
pub mod mutate;
pub mod params;
pub mod pipeline;
pub mod raster;
pub mod report;

// Re-export main types for convenience
pub use batch::{
    discover_images, process, BatchProcessor, BatchSummary, ImageOutcome, ImageRecord,
    PhotoMapping, SUPPORTED_EXTENSIONS,
};
pub use entropy::{MaskRng, SeedSource};
pub use error::{MaskError, Result};
pub use gate::{CornerComparison, SafetyGate, SafetyVerdict};
pub use hash::{ContentHash, Corner};
pub use metadata::{inspect_file, FakeMetadata, MetadataSnapshot};
pub use params::TransformParams;
pub use pipeline::{MaskPipeline, MaskedImage};
pub use raster::{Metadata, RasterImage};
pub use report::{compare_hashes, verify_metadata_removal, HashReport, MetadataRemovalReport};
