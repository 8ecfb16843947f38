//! Pixel interpolation for geometric image transformations.
//!
//! Sampling positions are given in pixel coordinates where `(0, 0)` is the center of the
//! top-left pixel. Positions outside the image are folded back with a [`BorderMode`].
//!
//! [`BorderMode`]: crate::border::BorderMode

mod bilinear;

/// Grid generation and coordinate mapping utilities.
pub mod grid;

mod remap;

pub use bilinear::interpolate_pixel;
pub use remap::{remap, remap_channels};
