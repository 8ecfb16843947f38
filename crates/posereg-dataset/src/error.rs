use std::path::PathBuf;

/// An error type for the dataset module.
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    /// Error reading a file or directory.
    #[error("Failed to read {}. {source}", .path.display())]
    Io {
        /// The file or directory being read.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// Error parsing a JSON document.
    #[error("Failed to parse {}. {source}", .path.display())]
    Json {
        /// The file being parsed.
        path: PathBuf,
        /// The underlying error.
        source: serde_json::Error,
    },

    /// Error from the image containers or preprocessing.
    #[error(transparent)]
    Image(#[from] posereg_image::ImageError),

    /// Error preprocessing a decoded image file.
    #[error("Failed to preprocess {}. {source}", .path.display())]
    Preprocess {
        /// The image file.
        path: PathBuf,
        /// The underlying error.
        source: posereg_image::ImageError,
    },

    /// Error decoding an image file.
    #[error("Failed to decode {}. {source}", .path.display())]
    Decode {
        /// The image file.
        path: PathBuf,
        /// The underlying error.
        source: posereg_io::IoError,
    },

    /// The style tags do not describe a usable split.
    #[error("Invalid style configuration: {0}")]
    InvalidStyles(String),

    /// Only 6-DoF poses are supported.
    #[error("Unsupported number of degrees of freedom: {0}, expected 6")]
    UnsupportedDofs(usize),

    /// A label does not hold the expected number of values.
    #[error("Label {id} has {len} values, expected {expected}")]
    InvalidPose {
        /// Id of the label.
        id: String,
        /// Number of values found.
        len: usize,
        /// Number of values expected.
        expected: usize,
    },

    /// Images and labels do not line up.
    #[error("Labels and images do not match: {0}")]
    LabelImageMismatch(String),

    /// Label order keys decrease between two rows.
    #[error("Label order key decreases at row {row}: {previous} then {current}")]
    LabelOrderViolation {
        /// Row whose key is smaller than the previous one.
        row: usize,
        /// Key of the previous row.
        previous: i64,
        /// Key of the offending row.
        current: i64,
    },

    /// Error from the elastic augmentation.
    #[error(transparent)]
    Augment(#[from] posereg_imgproc::augment::AugmentError),

    /// Error from the pose geometry.
    #[error(transparent)]
    Pose(#[from] posereg_3d::PoseError),

    /// The pose regressor failed or returned an unexpected number of poses.
    #[error("Pose regressor failed: {0}")]
    Model(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
