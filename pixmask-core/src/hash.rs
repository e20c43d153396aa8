//! Content hashing of files and image regions.
//!
//! A content hash is SHA3-256 over raw bytes. Corner hashes crop a region
//! of the decoded image, re-encode it as PNG, and hash those bytes.

use std::path::Path;

use image::{DynamicImage, GenericImageView};
use serde::{Serialize, Serializer};
use sha3::{Digest, Sha3_256};

use crate::codec;
use crate::error::{MaskError, Result};

/// Side length of the square corner regions.
pub const DEFAULT_CORNER_SIZE: u32 = 100;

/// SHA3-256 digest of some bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha3_256::new();
        hasher.update(data);
        let result = hasher.finalize();

        let mut digest = [0u8; 32];
        digest.copy_from_slice(&result);
        Self(digest)
    }

    /// Hash a file's raw bytes.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| MaskError::read(path, e))?;
        Ok(Self::from_bytes(&data))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First 16 hex characters, for display.
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    TopLeft,
    TopRight,
}

impl Corner {
    pub const ALL: [Corner; 2] = [Corner::TopLeft, Corner::TopRight];

    /// `(x, y, width, height)` of this corner, clamped to the image.
    pub fn region(self, width: u32, height: u32, size: u32) -> (u32, u32, u32, u32) {
        let region_height = size.min(height);
        match self {
            Corner::TopLeft => (0, 0, size.min(width), region_height),
            Corner::TopRight => {
                let x = width.saturating_sub(size);
                (x, 0, width - x, region_height)
            }
        }
    }
}

impl std::fmt::Display for Corner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Corner::TopLeft => write!(f, "top-left"),
            Corner::TopRight => write!(f, "top-right"),
        }
    }
}

/// Hash of a corner region of a decoded image.
pub fn corner_hash(image: &DynamicImage, corner: Corner, size: u32) -> Result<ContentHash> {
    let (width, height) = image.dimensions();
    let (x, y, w, h) = corner.region(width, height, size);
    let region = image.crop_imm(x, y, w, h);
    let encoded = codec::encode_png(&region)?;
    Ok(ContentHash::from_bytes(&encoded))
}

/// Decode a file and hash one of its corners.
pub fn corner_hash_file(path: &Path, corner: Corner, size: u32) -> Result<ContentHash> {
    let data = std::fs::read(path).map_err(|e| MaskError::read(path, e))?;
    let image = image::load_from_memory(&data)?;
    corner_hash(&image, corner, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_hash_deterministic() {
        let h1 = ContentHash::from_bytes(b"test data");
        let h2 = ContentHash::from_bytes(b"test data");
        assert_eq!(h1, h2);
        assert_ne!(h1, ContentHash::from_bytes(b"test datb"));
    }

    #[test]
    fn test_hex_forms() {
        let hash = ContentHash::from_bytes(b"");
        // SHA3-256 of the empty string
        assert_eq!(
            hash.to_hex(),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
        assert_eq!(hash.short_hex(), "a7ffc6f8bf1ed766");
    }

    #[test]
    fn test_corner_regions_clamped() {
        assert_eq!(Corner::TopLeft.region(500, 400, 100), (0, 0, 100, 100));
        assert_eq!(Corner::TopRight.region(500, 400, 100), (400, 0, 100, 100));
        assert_eq!(Corner::TopLeft.region(60, 40, 100), (0, 0, 60, 40));
        assert_eq!(Corner::TopRight.region(60, 40, 100), (0, 0, 60, 40));
    }

    #[test]
    fn test_corner_hash_sees_only_its_corner() {
        let base = RgbImage::from_pixel(300, 300, Rgb([10, 20, 30]));
        let mut marked = base.clone();
        marked.put_pixel(299, 0, Rgb([255, 0, 0]));

        let base = DynamicImage::ImageRgb8(base);
        let marked = DynamicImage::ImageRgb8(marked);
        let size = DEFAULT_CORNER_SIZE;

        assert_eq!(
            corner_hash(&base, Corner::TopLeft, size).unwrap(),
            corner_hash(&marked, Corner::TopLeft, size).unwrap()
        );
        assert_ne!(
            corner_hash(&base, Corner::TopRight, size).unwrap(),
            corner_hash(&marked, Corner::TopRight, size).unwrap()
        );
    }
}
