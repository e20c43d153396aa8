//! Transformation parameters shared by every image in a batch.

use serde::{Deserialize, Serialize};

use crate::error::{MaskError, Result};

/// Parameters below or above these thresholds switch on aggressive dots
/// unless the caller decides explicitly.
pub const AGGRESSIVE_MAX_PIXEL_FREQUENCY: u32 = 200;
pub const AGGRESSIVE_MIN_CROP: f64 = 0.20;
pub const AGGRESSIVE_MIN_COLOR_ENHANCEMENT: f64 = 1.05;

/// Immutable per-run configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformParams {
    /// One perturbed pixel per this many pixels (default: 1000)
    pub pixel_frequency: u32,
    /// Maximum per-channel change for perturbed and natural-dot pixels (default: 10)
    pub pixel_intensity: u8,
    /// Fraction trimmed from each edge, in [0, 0.5) (default: 0.01)
    pub crop_percentage: f64,
    /// Saturation factor, 1.0 is identity (default: 1.01)
    pub color_enhancement: f64,
    /// Paint every dot bright red instead of blending it in (default: false)
    pub aggressive_mode: bool,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            pixel_frequency: 1000,
            pixel_intensity: 10,
            crop_percentage: 0.01,
            color_enhancement: 1.01,
            aggressive_mode: false,
        }
    }
}

impl TransformParams {
    /// Check every field is within its documented range.
    pub fn validate(&self) -> Result<()> {
        if self.pixel_frequency == 0 {
            return Err(MaskError::InvalidParameter(
                "pixel_frequency must be at least 1".into(),
            ));
        }
        if !self.crop_percentage.is_finite() || !(0.0..0.5).contains(&self.crop_percentage) {
            return Err(MaskError::InvalidParameter(format!(
                "crop_percentage must be in [0, 0.5), got {}",
                self.crop_percentage
            )));
        }
        if !self.color_enhancement.is_finite() || self.color_enhancement <= 0.0 {
            return Err(MaskError::InvalidParameter(format!(
                "color_enhancement must be positive, got {}",
                self.color_enhancement
            )));
        }
        Ok(())
    }

    /// Whether these parameters are strong enough that visible dots are
    /// expected anyway.
    pub fn implies_aggressive(&self) -> bool {
        self.pixel_frequency <= AGGRESSIVE_MAX_PIXEL_FREQUENCY
            || self.crop_percentage >= AGGRESSIVE_MIN_CROP
            || self.color_enhancement >= AGGRESSIVE_MIN_COLOR_ENHANCEMENT
    }

    pub fn with_aggressive_mode(mut self, aggressive_mode: bool) -> Self {
        self.aggressive_mode = aggressive_mode;
        self
    }
}
