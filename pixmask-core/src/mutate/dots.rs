//! Dot stamping.
//!
//! Every call stamps a fresh constellation: four strategic dots drawn from
//! fixed regions of the canvas, one dot at the exact centre, and 800 tiny
//! dots scattered over the interior.
//!
//! | Dot | x range | y range | radius |
//! |---|---|---|---|
//! | right-middle | `[w-50, w-20]` | `[h/3, 2h/3]` | 3 |
//! | left-upper | `[20, w/2]` | `[20, h/2]` | 3 |
//! | top-middle | `[w/3, 2w/3]` | `[20, h/4]` | 3 |
//! | bottom-middle | `[w/3, 2w/3]` | `[3h/4, h-20]` | 3 |
//! | centre | `w/2` | `h/2` | 1 |
//! | tiny (x800) | `[20, w-20]` | `[20, h-20]` | 1 |
//!
//! Ranges are inclusive. A canvas too small for any range to be non-empty
//! is an error rather than a silently skipped dot.

use image::{DynamicImage, Rgb, RgbImage};
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use super::perturb::jitter_pixel;
use crate::error::{MaskError, Result};
use crate::raster::RasterImage;

pub const STRATEGIC_RADIUS: i64 = 3;
pub const SMALL_RADIUS: i64 = 1;
pub const TINY_DOT_COUNT: usize = 800;
/// Distance kept from the canvas edge by the tiny dots.
pub const EDGE_INSET: i64 = 20;

/// Gray range for natural-mode strategic dots.
const STRATEGIC_GRAY: std::ops::RangeInclusive<u8> = 180..=220;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DotKind {
    Strategic,
    Center,
    Tiny,
}

/// One filled disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dot {
    pub x: i64,
    pub y: i64,
    pub radius: i64,
    pub kind: DotKind,
}

impl Dot {
    fn new(x: i64, y: i64, kind: DotKind) -> Self {
        let radius = match kind {
            DotKind::Strategic => STRATEGIC_RADIUS,
            DotKind::Center | DotKind::Tiny => SMALL_RADIUS,
        };
        Self { x, y, radius, kind }
    }

    /// Canvas pixels inside the disk (`dx² + dy² <= r²`), clipped to bounds.
    pub fn covered_pixels(&self, width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
        let Dot { x, y, radius, .. } = *self;
        let (width, height) = (i64::from(width), i64::from(height));
        (-radius..=radius)
            .flat_map(move |dx| (-radius..=radius).map(move |dy| (dx, dy)))
            .filter(move |(dx, dy)| dx * dx + dy * dy <= radius * radius)
            .map(move |(dx, dy)| (x + dx, y + dy))
            .filter(move |&(px, py)| (0..width).contains(&px) && (0..height).contains(&py))
            .map(|(px, py)| (px as u32, py as u32))
    }
}

/// How dot pixels are coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DotPolicy {
    /// Strategic dots in light gray, centre and tiny dots jittered by at
    /// most `delta` per channel.
    Natural { delta: u8 },
    /// Every dot bright red, for checking placement by eye.
    Aggressive,
}

impl DotPolicy {
    pub fn new(delta: u8, aggressive: bool) -> Self {
        if aggressive {
            Self::Aggressive
        } else {
            Self::Natural { delta }
        }
    }

    fn paint<R: Rng + ?Sized>(self, pixel: &mut Rgb<u8>, kind: DotKind, rng: &mut R) {
        match (self, kind) {
            (Self::Aggressive, _) => {
                let red = rng.gen_range(200..=255);
                let green = rng.gen_range(0..=100);
                let blue = rng.gen_range(0..=100);
                *pixel = Rgb([red, green, blue]);
            }
            (Self::Natural { .. }, DotKind::Strategic) => {
                let gray = rng.gen_range(STRATEGIC_GRAY);
                *pixel = Rgb([gray, gray, gray]);
            }
            (Self::Natural { delta }, DotKind::Center | DotKind::Tiny) => {
                jitter_pixel(pixel, delta, rng);
            }
        }
    }
}

/// Positions for one stamping pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DotPlan {
    /// Right-middle, left-upper, top-middle, bottom-middle
    pub strategic: [Dot; 4],
    pub center: Dot,
    pub tiny: Vec<Dot>,
}

impl DotPlan {
    /// Draw a new plan for a `width` x `height` canvas.
    pub fn sample<R: Rng + ?Sized>(width: u32, height: u32, rng: &mut R) -> Result<Self> {
        let (w, h) = (i64::from(width), i64::from(height));
        let mut draw = |lo: i64, hi: i64| -> Result<i64> {
            if lo > hi {
                return Err(MaskError::CanvasTooSmall { width, height });
            }
            Ok(rng.gen_range(lo..=hi))
        };

        let right = (draw(w - 50, w - 20)?, draw(h / 3, 2 * h / 3)?);
        let left = (draw(EDGE_INSET, w / 2)?, draw(EDGE_INSET, h / 2)?);
        let top = (draw(w / 3, 2 * w / 3)?, draw(EDGE_INSET, h / 4)?);
        let bottom = (draw(w / 3, 2 * w / 3)?, draw(3 * h / 4, h - EDGE_INSET)?);

        let mut tiny = Vec::with_capacity(TINY_DOT_COUNT);
        for _ in 0..TINY_DOT_COUNT {
            let x = draw(EDGE_INSET, w - EDGE_INSET)?;
            let y = draw(EDGE_INSET, h - EDGE_INSET)?;
            tiny.push(Dot::new(x, y, DotKind::Tiny));
        }

        Ok(Self {
            strategic: [right, left, top, bottom].map(|(x, y)| Dot::new(x, y, DotKind::Strategic)),
            center: Dot::new(w / 2, h / 2, DotKind::Center),
            tiny,
        })
    }

    /// Dots in paint order.
    pub fn dots(&self) -> impl Iterator<Item = &Dot> {
        self.strategic
            .iter()
            .chain(std::iter::once(&self.center))
            .chain(self.tiny.iter())
    }

    pub fn dot_count(&self) -> usize {
        self.strategic.len() + 1 + self.tiny.len()
    }
}

/// Paint `plan` onto a copy of `pixels`.
pub fn stamp_with_plan<R: Rng + ?Sized>(
    pixels: &RgbImage,
    plan: &DotPlan,
    policy: DotPolicy,
    rng: &mut R,
) -> RgbImage {
    let mut canvas = pixels.clone();
    let (width, height) = canvas.dimensions();
    for dot in plan.dots() {
        for (x, y) in dot.covered_pixels(width, height) {
            policy.paint(canvas.get_pixel_mut(x, y), dot.kind, rng);
        }
    }
    canvas
}

/// Stamp a freshly sampled constellation onto the image.
pub fn stamp_dots<R: Rng + ?Sized>(
    image: &RasterImage,
    delta: u8,
    aggressive: bool,
    rng: &mut R,
) -> Result<RasterImage> {
    let pixels = image.to_rgb8();
    let (width, height) = pixels.dimensions();
    let plan = DotPlan::sample(width, height, rng)?;
    let policy = DotPolicy::new(delta, aggressive);

    let stamped = stamp_with_plan(&pixels, &plan, policy, rng);
    debug!(width, height, dots = plan.dot_count(), ?policy, "Stamped dots");
    Ok(image.map_pixels(DynamicImage::ImageRgb8(stamped)))
}
