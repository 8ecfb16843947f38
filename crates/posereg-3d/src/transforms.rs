use glam::{DMat3, DMat4, DVec3, DVec4};

use crate::error::PoseError;
use crate::pose::TranslationScale;

/// Rotation vectors shorter than this are treated as the identity rotation.
const SMALL_ANGLE: f64 = 1e-12;

/// Validate a rotation vector given as a slice.
///
/// # Errors
///
/// [`PoseError::InvalidRotationVector`] unless `r` has three finite components.
pub fn rotvec_from_slice(r: &[f64]) -> Result<[f64; 3], PoseError> {
    match r {
        [x, y, z] if r.iter().all(|v| v.is_finite()) => Ok([*x, *y, *z]),
        _ => Err(PoseError::InvalidRotationVector(r.to_vec())),
    }
}

/// Convert a rotation vector to a rotation matrix (exponential map of SO(3)).
///
/// The direction of `r` is the rotation axis and its norm the angle in radians.
///
/// # Errors
///
/// [`PoseError::InvalidRotationVector`] if a component is not finite.
///
/// # Example
///
/// ```
/// use posereg_3d::transforms::rotvec_to_matrix;
///
/// let r = rotvec_to_matrix(&[0.0, 0.0, 0.0]).unwrap();
/// assert_eq!(r, glam::DMat3::IDENTITY);
/// ```
pub fn rotvec_to_matrix(r: &[f64; 3]) -> Result<DMat3, PoseError> {
    let r = rotvec_from_slice(r)?;
    let v = DVec3::from_array(r);
    let theta = v.length();
    if theta < SMALL_ANGLE {
        return Ok(DMat3::IDENTITY);
    }
    Ok(DMat3::from_axis_angle(v / theta, theta))
}

/// The rotation angle of a rotation matrix in radians, in `[0, pi]`.
///
/// Computed as `atan2(|vee(R - R^T)| / 2, (tr(R) - 1) / 2)`, which stays accurate near
/// `0` and `pi` without clamping.
pub fn rotation_angle(m: &DMat3) -> f64 {
    let vee = DVec3::new(
        m.y_axis.z - m.z_axis.y,
        m.z_axis.x - m.x_axis.z,
        m.x_axis.y - m.y_axis.x,
    );
    let sin = 0.5 * vee.length();
    let cos = 0.5 * (m.x_axis.x + m.y_axis.y + m.z_axis.z - 1.0);
    sin.atan2(cos)
}

/// Geodesic distance between two rotations given as rotation vectors, in degrees.
///
/// # Example
///
/// ```
/// use posereg_3d::transforms::geodesic_angle;
///
/// let angle = geodesic_angle(&[0.0, 0.0, 0.0], &[0.0, 0.0, std::f64::consts::FRAC_PI_2]).unwrap();
/// assert!((angle - 90.0).abs() < 1e-9);
/// ```
pub fn geodesic_angle(r1: &[f64; 3], r2: &[f64; 3]) -> Result<f64, PoseError> {
    let m1 = rotvec_to_matrix(r1)?;
    let m2 = rotvec_to_matrix(r2)?;
    Ok(rotation_angle(&(m1.transpose() * m2)).to_degrees())
}

/// Homogeneous transform from a rotation vector and a normalized translation.
///
/// The translation column is `t * ts`.
pub fn compose_transform(
    r: &[f64; 3],
    t: &[f64; 3],
    ts: &TranslationScale,
) -> Result<DMat4, PoseError> {
    let rot = rotvec_to_matrix(r)?;
    let t = ts.denormalize(t);
    Ok(DMat4::from_cols(
        rot.x_axis.extend(0.0),
        rot.y_axis.extend(0.0),
        rot.z_axis.extend(0.0),
        DVec4::new(t.x, t.y, t.z, 1.0),
    ))
}

/// Apply the rigid transform `R * p + t` to a set of points.
pub fn transform_points(
    points: &[[f64; 3]],
    rotation: &DMat3,
    translation: &DVec3,
) -> Vec<[f64; 3]> {
    points
        .iter()
        .map(|p| (*rotation * DVec3::from_array(*p) + *translation).to_array())
        .collect()
}
