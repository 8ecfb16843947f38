#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the pose geometry.
pub mod error;

/// Mesh readers.
pub mod io;

/// Pose error metrics.
pub mod metrics;

/// Pose vectors and the translation scale.
pub mod pose;

/// Rotation vector and rigid transform utilities.
pub mod transforms;

pub use crate::error::PoseError;
pub use crate::pose::{PoseVector, TranslationScale};
