use std::path::Path;

use posereg_3d::TranslationScale;
use posereg_image::ImageSize;
use posereg_imgproc::augment::ElasticParams;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::DatasetError;
use crate::labels::{PoseParams, POSE_DOFS};
use crate::split::SplitParams;

/// Strength of the elastic augmentation relative to the image height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AugmentationConfig {
    /// Whether the training and validation sets are augmented.
    pub enabled: bool,
    /// Displacement scale per pixel of image height.
    pub alpha_factor: f32,
    /// Displacement smoothness per pixel of image height.
    pub sigma_factor: f32,
    /// Affine jitter per pixel of image height.
    pub affine_factor: f32,
}

impl Default for AugmentationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            alpha_factor: 2.0,
            sigma_factor: 0.08,
            affine_factor: 0.08,
        }
    }
}

/// Every tunable of the data pipeline.
///
/// Missing fields take their default, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Width of the network input.
    pub image_width: usize,
    /// Height of the network input.
    pub image_height: usize,
    /// Whether the circular mask is applied.
    pub apply_mask: bool,
    /// Number of styles rendered for every pose.
    pub total_styles: usize,
    /// Style tags of the training bucket.
    pub train_styles: Vec<String>,
    /// Style tags of the validation bucket.
    pub valid_styles: Vec<String>,
    /// Maximum number of labelled objects. `None` uses all.
    ///
    /// The image loader reads `limit * total_styles` directory entries and the label loader
    /// emits the matching rows of the first `limit` labels of each bucket.
    pub limit: Option<usize>,
    /// Number of values per pose.
    pub dofs: usize,
    /// Scale the label translations are divided by.
    pub translation_scale: TranslationScale,
    /// Seed of the random number generator.
    pub seed: u64,
    /// Elastic augmentation settings.
    pub augmentation: AugmentationConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            image_width: 256,
            image_height: 256,
            apply_mask: true,
            total_styles: 15,
            train_styles: (2..=15).map(|i| format!("style{i:02}")).collect(),
            valid_styles: vec!["style01".to_string()],
            limit: None,
            dofs: POSE_DOFS,
            translation_scale: TranslationScale::default(),
            seed: 45,
            augmentation: AugmentationConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse a configuration from a JSON string.
    ///
    /// # Example
    ///
    /// ```
    /// use posereg_dataset::PipelineConfig;
    ///
    /// let config = PipelineConfig::from_json_str(r#"{"image_width": 128, "seed": 7}"#).unwrap();
    /// assert_eq!(config.image_width, 128);
    /// assert_eq!(config.image_height, 256);
    /// assert_eq!(config.seed, 7);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        let config: Self = serde_json::from_str(json).map_err(|source| DatasetError::Json {
            path: "<memory>".into(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|source| DatasetError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::debug!("loaded configuration from {}: {config:?}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<(), DatasetError> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(DatasetError::Config(format!(
                "image size must be positive, got {}x{}",
                self.image_width, self.image_height
            )));
        }
        if self.dofs != POSE_DOFS {
            return Err(DatasetError::UnsupportedDofs(self.dofs));
        }
        Ok(())
    }

    /// Size of the network input.
    pub fn image_size(&self) -> ImageSize {
        ImageSize {
            width: self.image_width,
            height: self.image_height,
        }
    }

    /// Parameters of [`crate::split::load_and_split`].
    pub fn split_params(&self) -> SplitParams {
        SplitParams {
            size: self.image_size(),
            limit: self.limit.map(|n| n.saturating_mul(self.total_styles)),
            total_styles: self.total_styles,
            train_styles: self.train_styles.clone(),
            valid_styles: self.valid_styles.clone(),
            apply_mask: self.apply_mask,
        }
    }

    fn pose_params(&self, duplicate: usize) -> PoseParams {
        PoseParams {
            dofs: self.dofs,
            limit: self.limit.map(|n| n.saturating_mul(duplicate)),
            duplicate,
            ts: self.translation_scale,
        }
    }

    /// Pose loading parameters of the training bucket: one row per training style.
    pub fn train_pose_params(&self) -> PoseParams {
        self.pose_params(self.train_styles.len())
    }

    /// Pose loading parameters of the validation bucket: one row per validation style.
    pub fn valid_pose_params(&self) -> PoseParams {
        self.pose_params(self.valid_styles.len())
    }

    /// Elastic deformation strength for the configured image height.
    pub fn elastic_params(&self) -> ElasticParams {
        ElasticParams::from_image_height(
            self.image_height,
            self.augmentation.alpha_factor,
            self.augmentation.sigma_factor,
            self.augmentation.affine_factor,
        )
    }

    /// A random number generator seeded with [`PipelineConfig::seed`].
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }
}
