//! In-memory raster image with its metadata mapping.

use std::collections::BTreeMap;
use std::path::Path;

use image::{ColorType, DynamicImage, GenericImageView, RgbImage};
use tracing::warn;

use crate::error::{MaskError, Result};
use crate::metadata::inspect;

/// Textual metadata attached to an image, key to value.
pub type Metadata = BTreeMap<String, String>;

/// A decoded image plus whatever metadata came with it.
///
/// Stages borrow a `RasterImage` and hand back a new one; nothing mutates an
/// image its caller can still see.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    image: DynamicImage,
    metadata: Metadata,
}

impl RasterImage {
    /// Wrap pixels with no metadata.
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image,
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(image: DynamicImage, metadata: Metadata) -> Self {
        Self { image, metadata }
    }

    pub fn from_rgb(image: RgbImage) -> Self {
        Self::new(DynamicImage::ImageRgb8(image))
    }

    /// Decode a file and collect its embedded metadata.
    pub fn open(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| MaskError::read(path, e))?;
        Self::from_bytes(&data)
    }

    /// Decode encoded image bytes, keeping text chunks, EXIF and ICC markers
    /// as metadata entries.
    ///
    /// Only the pixels must decode. Metadata that cannot be parsed is
    /// logged and left out of the mapping.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(data)?;
        let metadata = match inspect::inspect_bytes(data) {
            Ok(snapshot) => snapshot.to_map(),
            Err(e) => {
                warn!(error = %e, "Unreadable source metadata, treating as empty");
                Metadata::new()
            }
        };
        Ok(Self { image, metadata })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn color(&self) -> ColorType {
        self.image.color()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Pixels as 8-bit RGB, converting if the source has another layout.
    pub fn to_rgb8(&self) -> RgbImage {
        self.image.to_rgb8()
    }

    /// Replace the pixels, keeping this image's metadata.
    pub(crate) fn map_pixels(&self, image: DynamicImage) -> Self {
        Self {
            image,
            metadata: self.metadata.clone(),
        }
    }

    pub fn into_parts(self) -> (DynamicImage, Metadata) {
        (self.image, self.metadata)
    }
}
