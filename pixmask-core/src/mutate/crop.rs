//! Symmetric margin trimming.

use tracing::debug;

use crate::error::{MaskError, Result};
use crate::raster::RasterImage;

/// Columns and rows removed from each side: `(floor(w*p), floor(h*p))`.
pub fn crop_margins_for(width: u32, height: u32, crop_percentage: f64) -> (u32, u32) {
    let margin = |side: u32| (f64::from(side) * crop_percentage).floor() as u32;
    (margin(width), margin(height))
}

/// Trim `crop_percentage` of the width from the left and right edges and of
/// the height from the top and bottom.
pub fn crop_margins(image: &RasterImage, crop_percentage: f64) -> Result<RasterImage> {
    if !crop_percentage.is_finite() || !(0.0..0.5).contains(&crop_percentage) {
        return Err(MaskError::InvalidCrop(format!(
            "percentage must be in [0, 0.5), got {crop_percentage}"
        )));
    }

    let (width, height) = image.dimensions();
    let (margin_x, margin_y) = crop_margins_for(width, height, crop_percentage);
    let new_width = width.saturating_sub(2 * margin_x);
    let new_height = height.saturating_sub(2 * margin_y);
    if new_width == 0 || new_height == 0 {
        return Err(MaskError::InvalidCrop(format!(
            "{width}x{height} at {crop_percentage} leaves {new_width}x{new_height}"
        )));
    }

    if margin_x == 0 && margin_y == 0 {
        return Ok(image.clone());
    }

    let cropped = image.image().crop_imm(margin_x, margin_y, new_width, new_height);
    debug!(width, height, new_width, new_height, "Cropped margins");
    Ok(image.map_pixels(cropped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GenericImageView, Rgb, RgbImage};

    fn gradient(width: u32, height: u32) -> RasterImage {
        RasterImage::from_rgb(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 0])
        }))
    }

    #[test]
    fn test_crop_dimensions() {
        for (w, h, p) in [(500, 500, 0.01), (1000, 333, 0.05), (37, 91, 0.2), (640, 480, 0.49)] {
            let out = crop_margins(&gradient(w, h), p).unwrap();
            let (mx, my) = crop_margins_for(w, h, p);
            assert_eq!(out.dimensions(), (w - 2 * mx, h - 2 * my), "{w}x{h} @ {p}");
        }
        let out = crop_margins(&gradient(500, 500), 0.01).unwrap();
        assert_eq!(out.dimensions(), (490, 490));
    }

    #[test]
    fn test_zero_is_noop() {
        let source = gradient(40, 30);
        assert_eq!(crop_margins(&source, 0.0).unwrap(), source);
    }

    #[test]
    fn test_crop_keeps_center_content() {
        let source = gradient(100, 100);
        let out = crop_margins(&source, 0.1).unwrap();
        assert_eq!(out.image().get_pixel(0, 0), source.image().get_pixel(10, 10));
    }

    #[test]
    fn test_small_image_floor_is_noop() {
        // floor(1 * 0.4) == 0, so nothing is removed.
        let source = RasterImage::new(DynamicImage::new_rgb8(1, 1));
        assert_eq!(crop_margins(&source, 0.4).unwrap().dimensions(), (1, 1));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let source = gradient(10, 10);
        assert!(matches!(crop_margins(&source, 0.5), Err(MaskError::InvalidCrop(_))));
        assert!(matches!(crop_margins(&source, -0.01), Err(MaskError::InvalidCrop(_))));
    }
}
