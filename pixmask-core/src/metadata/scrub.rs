//! Metadata removal.

use image::DynamicImage;

use crate::codec;
use crate::error::Result;
use crate::raster::RasterImage;

/// Copy pixels into a fresh RGB buffer with an empty metadata mapping.
pub fn scrub_direct(image: &RasterImage) -> RasterImage {
    RasterImage::from_rgb(image.to_rgb8())
}

/// Push the pixels through an in-memory PNG encode/decode and drop all
/// metadata.
///
/// Anything the encoder itself might attach is lost on the way back, which
/// the direct copy cannot promise. This is the variant the pipeline uses.
pub fn scrub_round_trip(image: &RasterImage) -> Result<RasterImage> {
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let encoded = codec::encode_png(&rgb)?;
    let decoded = codec::decode_png(&encoded)?;
    Ok(RasterImage::from_rgb(decoded.to_rgb8()))
}
