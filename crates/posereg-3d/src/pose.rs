use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::PoseError;

/// A 6-DoF pose as a rotation vector and a normalized translation.
///
/// The rotation is an axis-angle vector whose magnitude is the angle in radians. The
/// translation is expressed in units of the [`TranslationScale`] the labels were
/// normalized with.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoseVector {
    /// Rotation vector `[rx, ry, rz]`.
    pub rotation: [f64; 3],
    /// Normalized translation `[tx, ty, tz]`.
    pub translation: [f64; 3],
}

impl PoseVector {
    /// Build a pose from `[rx, ry, rz, tx, ty, tz]`.
    ///
    /// # Errors
    ///
    /// [`PoseError::InvalidPoseLength`] if `values` does not hold exactly six numbers.
    ///
    /// # Example
    ///
    /// ```
    /// use posereg_3d::PoseVector;
    ///
    /// let pose = PoseVector::from_slice(&[0.1, 0.2, 0.3, 1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(pose.rotation, [0.1, 0.2, 0.3]);
    /// assert_eq!(pose.translation, [1.0, 2.0, 3.0]);
    /// ```
    pub fn from_slice(values: &[f64]) -> Result<Self, PoseError> {
        match values {
            [rx, ry, rz, tx, ty, tz] => Ok(Self {
                rotation: [*rx, *ry, *rz],
                translation: [*tx, *ty, *tz],
            }),
            _ => Err(PoseError::InvalidPoseLength(values.len())),
        }
    }

    /// The pose as `[rx, ry, rz, tx, ty, tz]`.
    pub fn to_array(&self) -> [f64; 6] {
        let [rx, ry, rz] = self.rotation;
        let [tx, ty, tz] = self.translation;
        [rx, ry, rz, tx, ty, tz]
    }
}

impl From<[f64; 6]> for PoseVector {
    fn from(v: [f64; 6]) -> Self {
        Self {
            rotation: [v[0], v[1], v[2]],
            translation: [v[3], v[4], v[5]],
        }
    }
}

/// Per-axis scale between raw and normalized translations.
///
/// Labels are divided by the scale once when loaded; metrics multiply it back in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 3]", into = "[f64; 3]")]
pub struct TranslationScale([f64; 3]);

impl Default for TranslationScale {
    fn default() -> Self {
        Self([1.0; 3])
    }
}

impl TranslationScale {
    /// Create a scale from its three components.
    ///
    /// # Errors
    ///
    /// [`PoseError::InvalidTranslationScale`] if a component is zero or not finite.
    pub fn new(scale: [f64; 3]) -> Result<Self, PoseError> {
        if scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
            return Err(PoseError::InvalidTranslationScale(scale));
        }
        Ok(Self(scale))
    }

    /// The scale components.
    pub fn as_array(&self) -> [f64; 3] {
        self.0
    }

    /// Map a normalized translation back to raw units.
    pub fn denormalize(&self, t: &[f64; 3]) -> DVec3 {
        DVec3::from_array(*t) * DVec3::from_array(self.0)
    }

    /// Map a raw translation to normalized units.
    pub fn normalize(&self, t: &[f64; 3]) -> [f64; 3] {
        (DVec3::from_array(*t) / DVec3::from_array(self.0)).to_array()
    }
}

impl TryFrom<[f64; 3]> for TranslationScale {
    type Error = PoseError;

    fn try_from(scale: [f64; 3]) -> Result<Self, Self::Error> {
        Self::new(scale)
    }
}

impl From<TranslationScale> for [f64; 3] {
    fn from(scale: TranslationScale) -> Self {
        scale.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pose_from_slice_wrong_length() {
        assert_eq!(
            PoseVector::from_slice(&[0.0; 5]),
            Err(PoseError::InvalidPoseLength(5))
        );
        assert_eq!(
            PoseVector::from_slice(&[0.0; 7]),
            Err(PoseError::InvalidPoseLength(7))
        );
    }

    #[test]
    fn pose_array_round_trip() -> Result<(), PoseError> {
        let values = [0.5, -0.5, 0.25, 10.0, 20.0, -30.0];
        let pose = PoseVector::from_slice(&values)?;
        assert_eq!(pose.to_array(), values);
        assert_eq!(PoseVector::from(values), pose);
        Ok(())
    }

    #[test]
    fn translation_scale_normalize() -> Result<(), PoseError> {
        let ts = TranslationScale::new([2.0, 4.0, 0.5])?;
        let t = ts.normalize(&[2.0, 2.0, 2.0]);
        assert_eq!(t, [1.0, 0.5, 4.0]);
        assert_eq!(ts.denormalize(&t).to_array(), [2.0, 2.0, 2.0]);
        assert_eq!(TranslationScale::default().as_array(), [1.0; 3]);
        Ok(())
    }

    #[test]
    fn translation_scale_rejects_zero() {
        assert!(TranslationScale::new([1.0, 0.0, 1.0]).is_err());
        assert!(TranslationScale::new([1.0, f64::NAN, 1.0]).is_err());
    }
}
