#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// elastic deformation augmentation module.
pub mod augment;

/// border handling for out-of-bounds sampling.
pub mod border;

/// color transformations module.
pub mod color;

/// image filtering module.
pub mod filter;

/// utilities for interpolation.
pub mod interpolation;

/// circular masking of images.
pub mod mask;

/// intensity normalization of network inputs.
pub mod normalize;

/// module containing parallization utilities.
pub mod parallel;

/// network input preprocessing.
pub mod preprocess;

/// utility functions for resizing images.
pub mod resize;

/// image geometric transformations module.
pub mod warp;
