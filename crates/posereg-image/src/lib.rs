#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image representation for computer vision purposes.
pub mod image;

/// Images whose channel count is only known at runtime.
pub mod dynamic;

/// Error types for the image module.
pub mod error;

pub use crate::dynamic::DynamicImage;
pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
