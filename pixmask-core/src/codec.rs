//! Lossless PNG encoding helpers.
//!
//! The `image` crate handles plain encode/decode. Persisted outputs go
//! through the `png` crate directly because it is the only path that can
//! emit `tEXt` chunks.

use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage};

use crate::error::{MaskError, Result};

/// Encode an image as PNG in memory, with no ancillary chunks.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// Decode PNG bytes.
pub fn decode_png(data: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory_with_format(data, ImageFormat::Png)?)
}

/// Encode an 8-bit RGB image as PNG with one `tEXt` chunk per entry.
pub fn encode_png_with_text(image: &RgbImage, text: &[(String, String)]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_png_with_text(&mut out, image, text)?;
    Ok(out)
}

/// Write an 8-bit RGB PNG with `tEXt` chunks to `path`.
pub fn save_png_with_text(path: &Path, image: &RgbImage, text: &[(String, String)]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_png_with_text(&mut writer, image, text)?;
    writer.flush()?;
    Ok(())
}

fn write_png_with_text<W: Write>(
    writer: W,
    image: &RgbImage,
    text: &[(String, String)],
) -> Result<()> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(MaskError::InvalidParameter(format!(
            "cannot encode an empty {width}x{height} image"
        )));
    }

    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Best);
    for (keyword, value) in text {
        encoder.add_text_chunk(keyword.clone(), value.clone())?;
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(image.as_raw())?;
    png_writer.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb};

    #[test]
    fn test_encode_decode_preserves_pixels() {
        let img = RgbImage::from_fn(16, 9, |x, y| Rgb([x as u8 * 10, y as u8 * 20, 7]));
        let encoded = encode_png(&DynamicImage::ImageRgb8(img.clone())).unwrap();
        assert_eq!(&encoded[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = decode_png(&encoded).unwrap();
        assert_eq!(decoded.dimensions(), (16, 9));
        assert_eq!(decoded.to_rgb8(), img);
    }

    #[test]
    fn test_text_chunks_are_written() {
        let img = RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]));
        let text = vec![("Camera".to_string(), "Nothing to see".to_string())];
        let encoded = encode_png_with_text(&img, &text).unwrap();

        let needle = b"tEXtCamera\0Nothing to see";
        assert!(encoded.windows(needle.len()).any(|w| w == needle));
        assert_eq!(decode_png(&encoded).unwrap().to_rgb8(), img);
    }

    #[test]
    fn test_empty_image_rejected() {
        let img = RgbImage::new(0, 3);
        assert!(matches!(
            encode_png_with_text(&img, &[]),
            Err(MaskError::InvalidParameter(_))
        ));
    }
}
