#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Elastic augmentation of labeled samples.
pub mod augment;

/// Pipeline configuration.
pub mod config;

/// Error types for the dataset module.
pub mod error;

/// Evaluation of pose regressors.
pub mod evaluate;

/// Pose label loading.
pub mod labels;

/// Joining images with their labels.
pub mod pairing;

/// Style-aware train and validation split.
pub mod split;

pub use crate::config::PipelineConfig;
pub use crate::error::DatasetError;
pub use crate::labels::{load_poses, LabelStore, PoseParams, PoseTable};
pub use crate::pairing::{pair_samples, LabeledSample};
pub use crate::split::{load_and_split, DatasetSplit, Sample, SplitParams};
