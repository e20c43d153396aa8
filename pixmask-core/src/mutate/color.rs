//! Saturation scaling.

use image::{DynamicImage, Rgb};

use crate::error::{MaskError, Result};
use crate::raster::RasterImage;

/// ITU-R 601-2 luma in 16.16 fixed point, rounded.
fn luma(Rgb([r, g, b]): Rgb<u8>) -> u8 {
    let l = u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000;
    (l >> 16) as u8
}

/// Blend each pixel away from (f > 1) or towards (f < 1) its own gray
/// level: `gray + f * (channel - gray)`, truncated and clamped.
///
/// `f == 1.0` returns the pixels unchanged.
pub fn enhance_color(image: &RasterImage, factor: f64) -> Result<RasterImage> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(MaskError::InvalidParameter(format!(
            "color enhancement factor must be positive, got {factor}"
        )));
    }

    let mut pixels = image.to_rgb8();
    for pixel in pixels.pixels_mut() {
        let gray = f64::from(luma(*pixel));
        for channel in pixel.0.iter_mut() {
            let blended = gray + factor * (f64::from(*channel) - gray);
            *channel = blended.clamp(0.0, 255.0) as u8;
        }
    }

    Ok(image.map_pixels(DynamicImage::ImageRgb8(pixels)))
}
