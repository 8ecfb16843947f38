/// An error type for the pose geometry.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PoseError {
    /// The rotation vector does not have three finite components.
    #[error("Invalid rotation vector: {0:?}")]
    InvalidRotationVector(Vec<f64>),

    /// A pose vector was built from the wrong number of values.
    #[error("Invalid pose length. Got: {0}, expected: 6")]
    InvalidPoseLength(usize),

    /// A translation scale component is zero or not finite.
    #[error("Invalid translation scale: {0:?}")]
    InvalidTranslationScale([f64; 3]),

    /// The ADD metric needs at least one vertex.
    #[error("The mesh has no vertices")]
    EmptyMesh,
}
