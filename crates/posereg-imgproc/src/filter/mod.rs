//! Filter operations
//!
//! This module provides the smoothing filters used by the augmentations.

/// Filter kernels
pub mod kernels;

/// Gaussian smoothing of dense fields
mod gaussian;
pub use gaussian::*;
