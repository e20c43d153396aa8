//! Single-image pipeline.
//!
//! Stage order is fixed: perturb, crop, stamp dots, enhance colour, scrub
//! metadata, forge metadata. Dots go on after the crop so none are trimmed
//! away; the scrub follows every pixel stage and precedes the forge so the
//! forged entries survive.

use std::path::Path;

use rand::Rng;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::metadata::{forge_metadata, scrub_round_trip, FakeMetadata};
use crate::mutate::{crop_margins, enhance_color, perturb_pixels, stamp_dots};
use crate::params::TransformParams;
use crate::raster::RasterImage;

/// Pipeline output: scrubbed pixels plus the metadata to embed on save.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedImage {
    pub image: RasterImage,
    pub fake_metadata: FakeMetadata,
}

/// Applies one set of [`TransformParams`] to any number of images.
#[derive(Debug, Clone)]
pub struct MaskPipeline {
    params: TransformParams,
}

impl MaskPipeline {
    /// Create a pipeline, rejecting out-of-range parameters.
    pub fn new(params: TransformParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &TransformParams {
        &self.params
    }

    /// Decode `path` and run every stage on it.
    #[instrument(skip(self, path, rng), fields(path = %path.display()))]
    pub fn mask_file<R: Rng + ?Sized>(&self, path: &Path, rng: &mut R) -> Result<MaskedImage> {
        let source = RasterImage::open(path)?;
        debug!(
            width = source.width(),
            height = source.height(),
            color = ?source.color(),
            metadata_items = source.metadata().len(),
            "Decoded source image"
        );
        self.mask_image(&source, rng)
    }

    /// Run every stage on an already decoded image.
    pub fn mask_image<R: Rng + ?Sized>(
        &self,
        source: &RasterImage,
        rng: &mut R,
    ) -> Result<MaskedImage> {
        let p = &self.params;

        let image = perturb_pixels(source, p.pixel_frequency, p.pixel_intensity, rng)?;
        let image = crop_margins(&image, p.crop_percentage)?;
        let image = stamp_dots(&image, p.pixel_intensity, p.aggressive_mode, rng)?;
        let image = enhance_color(&image, p.color_enhancement)?;
        let image = scrub_round_trip(&image)?;
        let fake_metadata = forge_metadata(rng);

        debug!(
            width = image.width(),
            height = image.height(),
            forged_entries = fake_metadata.len(),
            "Masked image"
        );

        Ok(MaskedImage {
            image,
            fake_metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::SeedSource;
    use crate::error::MaskError;
    use crate::raster::Metadata;
    use image::{DynamicImage, Rgb, RgbImage};

    fn tagged_photo(width: u32, height: u32) -> RasterImage {
        let mut metadata = Metadata::new();
        metadata.insert("GPS".into(), "51.5, -0.1".into());
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 200) as u8, (y % 200) as u8, 90]));
        RasterImage::with_metadata(DynamicImage::ImageRgb8(img), metadata)
    }

    #[test]
    fn test_pipeline_output_shape() {
        let pipeline = MaskPipeline::new(TransformParams::default()).unwrap();
        let masked = pipeline
            .mask_image(&tagged_photo(300, 200), &mut SeedSource::Fixed(1).rng())
            .unwrap();

        assert_eq!(masked.image.dimensions(), (294, 196));
        assert!(masked.image.metadata().is_empty());
        assert_eq!(masked.fake_metadata.len(), crate::metadata::FORGED_ENTRY_COUNT);
    }

    #[test]
    fn test_pipeline_is_reproducible() {
        let pipeline = MaskPipeline::new(TransformParams::default()).unwrap();
        let source = tagged_photo(160, 160);
        let a = pipeline.mask_image(&source, &mut SeedSource::Fixed(7).rng()).unwrap();
        let b = pipeline.mask_image(&source, &mut SeedSource::Fixed(7).rng()).unwrap();
        let c = pipeline.mask_image(&source, &mut SeedSource::Fixed(8).rng()).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_degenerate_image_fails() {
        let pipeline = MaskPipeline::new(TransformParams {
            crop_percentage: 0.4,
            ..Default::default()
        })
        .unwrap();
        let tiny = RasterImage::from_rgb(RgbImage::new(1, 1));
        let err = pipeline
            .mask_image(&tiny, &mut SeedSource::Fixed(1).rng())
            .unwrap_err();
        assert!(matches!(err, MaskError::CanvasTooSmall { .. }));
    }

    #[test]
    fn test_invalid_params_rejected_up_front() {
        let params = TransformParams {
            pixel_frequency: 0,
            ..Default::default()
        };
        assert!(MaskPipeline::new(params).is_err());
    }
}
