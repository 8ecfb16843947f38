use glam::DVec3;

use crate::error::PoseError;
use crate::pose::{PoseVector, TranslationScale};
use crate::transforms::{geodesic_angle, rotvec_to_matrix, transform_points};

/// Translation and rotation error between two poses.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoseErrors {
    /// Euclidean distance between the translations, in raw units.
    pub translation: f64,
    /// Geodesic distance between the rotations, in degrees.
    pub rotation_deg: f64,
}

/// Compare a predicted pose against the ground truth.
///
/// Translations are scaled back to raw units by `ts` before taking the Euclidean distance.
///
/// # Example
///
/// ```
/// use posereg_3d::metrics::compare_poses;
/// use posereg_3d::{PoseVector, TranslationScale};
///
/// let pred = PoseVector::from([0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
/// let gt = PoseVector::default();
/// let errors = compare_poses(&pred, &gt, &TranslationScale::default()).unwrap();
/// assert_eq!(errors.translation, 1.0);
/// assert_eq!(errors.rotation_deg, 0.0);
/// ```
pub fn compare_poses(
    pred: &PoseVector,
    gt: &PoseVector,
    ts: &TranslationScale,
) -> Result<PoseErrors, PoseError> {
    let translation = ts
        .denormalize(&pred.translation)
        .distance(ts.denormalize(&gt.translation));
    let rotation_deg = geodesic_angle(&pred.rotation, &gt.rotation)?;
    Ok(PoseErrors {
        translation,
        rotation_deg,
    })
}

/// Average Distance of model points (ADD) between two poses.
///
/// The mean, over all mesh vertices, of the distance between the vertex placed by the
/// ground truth pose and the vertex placed by the predicted pose.
///
/// # Errors
///
/// * [`PoseError::EmptyMesh`] if `mesh` has no vertices.
/// * [`PoseError::InvalidRotationVector`] for non-finite rotations.
pub fn compute_add(
    gt: &PoseVector,
    pred: &PoseVector,
    mesh: &[[f64; 3]],
    ts: &TranslationScale,
) -> Result<f64, PoseError> {
    if mesh.is_empty() {
        return Err(PoseError::EmptyMesh);
    }

    let placed_gt = transform_points(
        mesh,
        &rotvec_to_matrix(&gt.rotation)?,
        &ts.denormalize(&gt.translation),
    );
    let placed_pred = transform_points(
        mesh,
        &rotvec_to_matrix(&pred.rotation)?,
        &ts.denormalize(&pred.translation),
    );

    let total = placed_gt
        .iter()
        .zip(placed_pred.iter())
        .map(|(a, b)| DVec3::from_array(*a).distance(DVec3::from_array(*b)))
        .sum::<f64>();

    Ok(total / mesh.len() as f64)
}

/// Aggregate statistics over a set of pose errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorSummary {
    /// Number of compared poses.
    pub count: usize,
    /// Mean translation error.
    pub mean_translation: f64,
    /// Median translation error.
    pub median_translation: f64,
    /// Mean rotation error in degrees.
    pub mean_rotation_deg: f64,
    /// Median rotation error in degrees.
    pub median_rotation_deg: f64,
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        0.5 * (values[mid - 1] + values[mid])
    } else {
        values[mid]
    }
}

/// Mean and median of translation and rotation errors.
///
/// Returns `None` for an empty input.
pub fn summarize(errors: &[PoseErrors]) -> Option<ErrorSummary> {
    if errors.is_empty() {
        return None;
    }

    let mut translation = errors.iter().map(|e| e.translation).collect::<Vec<_>>();
    let mut rotation = errors.iter().map(|e| e.rotation_deg).collect::<Vec<_>>();

    Some(ErrorSummary {
        count: errors.len(),
        mean_translation: mean(&translation),
        median_translation: median(&mut translation),
        mean_rotation_deg: mean(&rotation),
        median_rotation_deg: median(&mut rotation),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn compare_identical_poses() -> Result<(), PoseError> {
        let pose = PoseVector::from([0.2, -0.4, 1.1, 3.0, -2.0, 0.5]);
        let ts = TranslationScale::new([100.0, 50.0, 10.0])?;
        let errors = compare_poses(&pose, &pose, &ts)?;
        assert_eq!(errors.translation, 0.0);
        assert_relative_eq!(errors.rotation_deg, 0.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn compare_uses_translation_scale() -> Result<(), PoseError> {
        let pred = PoseVector::from([0.0, 0.0, 0.0, 1.0, 1.0, 0.0]);
        let gt = PoseVector::default();
        let ts = TranslationScale::new([3.0, 4.0, 1.0])?;
        let errors = compare_poses(&pred, &gt, &ts)?;
        assert_relative_eq!(errors.translation, 5.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn add_identical_poses_is_zero() -> Result<(), PoseError> {
        let pose = PoseVector::from([0.3, 0.2, 0.1, 1.0, 2.0, 3.0]);
        let mesh = [[1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.5, 0.5, 0.5]];
        let add = compute_add(&pose, &pose, &mesh, &TranslationScale::default())?;
        assert_eq!(add, 0.0);
        Ok(())
    }

    #[test]
    fn add_lever_arm() -> Result<(), PoseError> {
        // a quarter turn about z moves (1, 0, 0) to (0, 1, 0): distance sqrt(2)
        let gt = PoseVector::default();
        let pred = PoseVector::from([0.0, 0.0, FRAC_PI_2, 0.0, 0.0, 0.0]);
        let mesh = [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0]];
        let add = compute_add(&gt, &pred, &mesh, &TranslationScale::default())?;
        assert_relative_eq!(add, std::f64::consts::SQRT_2 / 2.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn add_pure_translation() -> Result<(), PoseError> {
        let gt = PoseVector::default();
        let pred = PoseVector::from([0.0, 0.0, 0.0, 0.0, 0.0, 0.5]);
        let ts = TranslationScale::new([1.0, 1.0, 4.0])?;
        let mesh = [[1.0, 2.0, 3.0], [-1.0, 0.0, 7.0]];
        assert_relative_eq!(compute_add(&gt, &pred, &mesh, &ts)?, 2.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn add_empty_mesh_fails() {
        let pose = PoseVector::default();
        assert_eq!(
            compute_add(&pose, &pose, &[], &TranslationScale::default()),
            Err(PoseError::EmptyMesh)
        );
    }

    #[test]
    fn summarize_mean_and_median() {
        let errors = [
            PoseErrors {
                translation: 1.0,
                rotation_deg: 10.0,
            },
            PoseErrors {
                translation: 5.0,
                rotation_deg: 2.0,
            },
            PoseErrors {
                translation: 3.0,
                rotation_deg: 4.0,
            },
            PoseErrors {
                translation: 7.0,
                rotation_deg: 8.0,
            },
        ];
        let summary = summarize(&errors);
        assert_eq!(
            summary,
            Some(ErrorSummary {
                count: 4,
                mean_translation: 4.0,
                median_translation: 4.0,
                mean_rotation_deg: 6.0,
                median_rotation_deg: 6.0,
            })
        );
        assert_eq!(summarize(&[]), None);
    }
}
