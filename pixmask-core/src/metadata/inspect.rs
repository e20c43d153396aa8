//! Reading the metadata an encoded image carries.
//!
//! Counts PNG text chunks (`tEXt`, `zTXt`, `iTXt`), EXIF blocks and ICC
//! profiles. Pixel-level properties (dimensions, gamma, physical size) are
//! not metadata for our purposes.

use std::io::Cursor;
use std::path::Path;

use image::{ImageDecoder, ImageFormat, ImageReader};
use serde::Serialize;

use crate::error::{MaskError, Result};
use crate::raster::Metadata;

/// Metadata key used when an EXIF block is present.
pub const EXIF_KEY: &str = "exif";
/// Metadata key used when an ICC profile is present.
pub const ICC_KEY: &str = "icc_profile";

/// Metadata found in one encoded image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetadataSnapshot {
    /// Detected container format, e.g. `"Png"`
    pub format: Option<String>,
    /// Textual key/value entries in file order
    pub text: Vec<(String, String)>,
    /// EXIF block size in bytes, if present
    pub exif_bytes: Option<usize>,
    /// ICC profile size in bytes, if present
    pub icc_bytes: Option<usize>,
}

impl MetadataSnapshot {
    /// Number of metadata items: one per text entry, plus one each for an
    /// EXIF block and an ICC profile.
    pub fn item_count(&self) -> usize {
        self.text.len() + usize::from(self.exif_bytes.is_some()) + usize::from(self.icc_bytes.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    /// Item names in the same form [`to_map`](Self::to_map) uses as keys.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.text.iter().map(|(k, _)| k.clone()).collect();
        if self.exif_bytes.is_some() {
            keys.push(EXIF_KEY.to_string());
        }
        if self.icc_bytes.is_some() {
            keys.push(ICC_KEY.to_string());
        }
        keys
    }

    /// Flatten into a metadata mapping. Binary blocks become a size note.
    pub fn to_map(&self) -> Metadata {
        let mut map: Metadata = self.text.iter().cloned().collect();
        if let Some(len) = self.exif_bytes {
            map.insert(EXIF_KEY.to_string(), format!("{len} bytes"));
        }
        if let Some(len) = self.icc_bytes {
            map.insert(ICC_KEY.to_string(), format!("{len} bytes"));
        }
        map
    }
}

/// Inspect an image file on disk.
pub fn inspect_file(path: &Path) -> Result<MetadataSnapshot> {
    let data = std::fs::read(path).map_err(|e| MaskError::read(path, e))?;
    inspect_bytes(&data)
}

/// Inspect encoded image bytes.
pub fn inspect_bytes(data: &[u8]) -> Result<MetadataSnapshot> {
    let format = image::guess_format(data)?;

    let mut decoder = ImageReader::with_format(Cursor::new(data), format).into_decoder()?;
    let exif_bytes = decoder.exif_metadata()?.map(|block| block.len());
    let icc_bytes = decoder.icc_profile()?.map(|profile| profile.len());

    let text = if format == ImageFormat::Png {
        png_text_entries(data)?
    } else {
        Vec::new()
    };

    Ok(MetadataSnapshot {
        format: Some(format!("{format:?}")),
        text,
        exif_bytes,
        icc_bytes,
    })
}

/// Every text chunk in a PNG, including those after the image data.
fn png_text_entries(data: &[u8]) -> Result<Vec<(String, String)>> {
    let mut reader = png::Decoder::new(Cursor::new(data)).read_info()?;
    let mut frame = vec![0; reader.output_buffer_size()];
    reader.next_frame(&mut frame)?;
    reader.finish()?;

    let info = reader.info();
    let mut entries = Vec::new();
    for chunk in &info.uncompressed_latin1_text {
        entries.push((chunk.keyword.clone(), chunk.text.clone()));
    }
    for chunk in &info.compressed_latin1_text {
        let text = chunk.get_text().unwrap_or_default();
        entries.push((chunk.keyword.clone(), text));
    }
    for chunk in &info.utf8_text {
        let text = chunk.get_text().unwrap_or_default();
        entries.push((chunk.keyword.clone(), text));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use image::{DynamicImage, Rgb, RgbImage};

    #[test]
    fn test_plain_png_has_no_metadata() {
        let data = codec::encode_png(&DynamicImage::new_rgb8(5, 5)).unwrap();
        let snapshot = inspect_bytes(&data).unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.format.as_deref(), Some("Png"));
    }

    #[test]
    fn test_png_text_counted() {
        let img = RgbImage::from_pixel(5, 5, Rgb([9, 9, 9]));
        let text = vec![
            ("Alpha".to_string(), "one".to_string()),
            ("Beta".to_string(), "two".to_string()),
        ];
        let data = codec::encode_png_with_text(&img, &text).unwrap();

        let snapshot = inspect_bytes(&data).unwrap();
        assert_eq!(snapshot.item_count(), 2);
        assert_eq!(snapshot.text, text);
        assert_eq!(snapshot.keys(), vec!["Alpha".to_string(), "Beta".to_string()]);
    }

    #[test]
    fn test_to_map_notes_binary_blocks() {
        let snapshot = MetadataSnapshot {
            format: Some("Jpeg".into()),
            text: vec![],
            exif_bytes: Some(120),
            icc_bytes: Some(3144),
        };
        let map = snapshot.to_map();
        assert_eq!(snapshot.item_count(), 2);
        assert_eq!(map.get(EXIF_KEY).map(String::as_str), Some("120 bytes"));
        assert_eq!(map.get(ICC_KEY).map(String::as_str), Some("3144 bytes"));
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(inspect_bytes(&[0x00, 0x01, 0x02, 0x03]).is_err());
    }
}
