//! Sparse random pixel perturbation.

use image::{DynamicImage, Rgb};
use rand::Rng;
use tracing::debug;

use crate::error::{MaskError, Result};
use crate::raster::RasterImage;

/// Lower bound on perturbed positions, whatever the image size.
pub const MIN_PERTURBED_PIXELS: u64 = 20;

/// Number of positions drawn for an image of the given size.
pub fn perturbed_pixel_count(width: u32, height: u32, pixel_frequency: u32) -> u64 {
    let total = u64::from(width) * u64::from(height);
    (total / u64::from(pixel_frequency.max(1))).max(MIN_PERTURBED_PIXELS)
}

/// Shift one channel by a uniform offset in `[-delta, delta]`, clamped to
/// the 8-bit range.
pub fn jitter_channel<R: Rng + ?Sized>(value: u8, delta: u8, rng: &mut R) -> u8 {
    let delta = i16::from(delta);
    let offset = rng.gen_range(-delta..=delta);
    (i16::from(value) + offset).clamp(0, 255) as u8
}

/// Jitter every channel of a pixel independently.
pub fn jitter_pixel<R: Rng + ?Sized>(pixel: &mut Rgb<u8>, delta: u8, rng: &mut R) {
    for channel in pixel.0.iter_mut() {
        *channel = jitter_channel(*channel, delta, rng);
    }
}

/// Nudge `max(20, w*h / pixel_frequency)` randomly chosen pixels.
///
/// Positions are drawn with replacement, so a pixel may be hit more than
/// once. Non-RGB input is converted to 8-bit RGB first.
pub fn perturb_pixels<R: Rng + ?Sized>(
    image: &RasterImage,
    pixel_frequency: u32,
    delta: u8,
    rng: &mut R,
) -> Result<RasterImage> {
    if pixel_frequency == 0 {
        return Err(MaskError::InvalidParameter(
            "pixel_frequency must be at least 1".into(),
        ));
    }

    let mut pixels = image.to_rgb8();
    let (width, height) = pixels.dimensions();
    if width == 0 || height == 0 {
        return Err(MaskError::InvalidParameter(format!(
            "cannot perturb an empty {width}x{height} image"
        )));
    }

    let count = perturbed_pixel_count(width, height, pixel_frequency);
    for _ in 0..count {
        let x = rng.gen_range(0..width);
        let y = rng.gen_range(0..height);
        jitter_pixel(pixels.get_pixel_mut(x, y), delta, rng);
    }

    debug!(width, height, count, delta, "Perturbed pixels");
    Ok(image.map_pixels(DynamicImage::ImageRgb8(pixels)))
}
