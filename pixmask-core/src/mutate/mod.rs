//! Pixel and geometry mutations.
//!
//! Each stage borrows a [`RasterImage`](crate::RasterImage) and returns a
//! new one. Randomized stages take the run's generator explicitly.

pub mod color;
pub mod crop;
pub mod dots;
pub mod perturb;

pub use color::enhance_color;
pub use crop::crop_margins;
pub use dots::{stamp_dots, Dot, DotKind, DotPlan, DotPolicy};
pub use perturb::perturb_pixels;
