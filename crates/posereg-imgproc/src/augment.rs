use posereg_image::{Image, ImageError};
use rand::Rng;

use crate::border::BorderMode;
use crate::filter::gaussian_filter_3d;
use crate::interpolation::{grid::meshgrid_from_fn, remap_channels};
use crate::warp::{get_affine_transform, warp_affine, WarpError};

/// An error type for the augmentations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AugmentError {
    /// A deformation parameter is negative or not finite.
    #[error("Invalid augmentation parameter {name}: {value}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// The random affine stage failed.
    #[error(transparent)]
    Warp(#[from] WarpError),

    /// Error propagated from the image containers.
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Strength of the elastic deformation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElasticParams {
    /// Scale of the per-pixel displacement field in pixels.
    pub alpha: f32,
    /// Standard deviation of the gaussian smoothing the displacement field.
    pub sigma: f32,
    /// Maximum perturbation of each affine anchor coordinate in pixels.
    pub alpha_affine: f32,
}

impl ElasticParams {
    /// Parameters proportional to the image height.
    ///
    /// # Example
    ///
    /// ```
    /// use posereg_imgproc::augment::ElasticParams;
    ///
    /// let params = ElasticParams::from_image_height(100, 2.0, 0.08, 0.08);
    /// assert_eq!(params.alpha, 200.0);
    /// assert_eq!(params.sigma, 8.0);
    /// assert_eq!(params.alpha_affine, 8.0);
    /// ```
    pub fn from_image_height(
        height: usize,
        alpha_factor: f32,
        sigma_factor: f32,
        affine_factor: f32,
    ) -> Self {
        let h = height as f32;
        Self {
            alpha: h * alpha_factor,
            sigma: h * sigma_factor,
            alpha_affine: h * affine_factor,
        }
    }

    fn validate(&self) -> Result<(), AugmentError> {
        let checks = [
            ("alpha", self.alpha, self.alpha.is_finite()),
            ("sigma", self.sigma, self.sigma.is_finite() && self.sigma >= 0.0),
            (
                "alpha_affine",
                self.alpha_affine,
                self.alpha_affine.is_finite() && self.alpha_affine >= 0.0,
            ),
        ];
        match checks.iter().find(|(_, _, ok)| !ok) {
            Some(&(name, value, _)) => Err(AugmentError::InvalidParameter { name, value }),
            None => Ok(()),
        }
    }
}

/// Anchor triangle of the random affine stage as `[x, y]` points.
fn affine_anchors(cols: usize, rows: usize) -> [[f32; 2]; 3] {
    let s = (rows.min(cols) / 3) as f32;
    let (cx, cy) = ((cols / 2) as f32, (rows / 2) as f32);
    [[cx + s, cy + s], [cx + s, cy - s], [cx - s, cy - s]]
}

/// A displacement field of shape (rows, cols, channels) with smoothed uniform noise.
fn displacement_field<R: Rng + ?Sized>(
    shape: [usize; 3],
    params: &ElasticParams,
    rng: &mut R,
) -> Vec<f32> {
    let noise = (0..shape.iter().product::<usize>())
        .map(|_| rng.random_range(-1.0f32..1.0))
        .collect::<Vec<_>>();

    let mut field = gaussian_filter_3d(&noise, shape, params.sigma, BorderMode::Reflect);
    field.iter_mut().for_each(|d| *d *= params.alpha);
    field
}

/// Elastically deform an RGB image.
///
/// The image is first warped by a random affine transform whose three anchors, placed on a
/// square around the image center, are jittered by up to `alpha_affine` pixels. A smoothed
/// random displacement field scaled by `alpha` is then applied per channel. The output has
/// the shape of the input. With `alpha = 0` and `alpha_affine = 0` the output equals the
/// input. Images whose shortest side is below 3 pixels skip the affine stage.
///
/// The deformation is purely photometric from the point of view of the pose: callers keep
/// the label of the source image unchanged for the deformed copy.
///
/// # Arguments
///
/// * `image` - The RGB image to deform.
/// * `params` - The deformation strength.
/// * `rng` - The source of randomness. A seeded generator reproduces the same output.
///
/// # Errors
///
/// * [`AugmentError::InvalidParameter`] for non-finite parameters or negative `sigma` and
///   `alpha_affine`.
/// * [`WarpError::DegenerateTriangle`] when the jittered anchors are collinear.
pub fn elastic_transform<R: Rng + ?Sized>(
    image: &Image<u8, 3>,
    params: &ElasticParams,
    rng: &mut R,
) -> Result<Image<u8, 3>, AugmentError> {
    params.validate()?;

    if image.size().area() == 0 {
        return Ok(image.clone());
    }

    let (rows, cols) = (image.rows(), image.cols());
    let src = image.cast_and_scale::<f32>(1.0)?;

    // below 3 pixels the anchor square collapses to a point
    let warped = if params.alpha_affine > 0.0 && rows.min(cols) >= 3 {
        let anchors = affine_anchors(cols, rows);
        let mut jittered = anchors;
        for v in jittered.iter_mut().flatten() {
            *v += rng.random_range(-params.alpha_affine..=params.alpha_affine);
        }
        let m = get_affine_transform(&anchors, &jittered)?;
        log::debug!("elastic affine stage: {m:?}");

        let mut warped = Image::<f32, 3>::from_size_val(image.size(), 0.0)?;
        warp_affine(&src, &mut warped, &m, BorderMode::Reflect101)?;
        warped
    } else {
        src
    };

    let deformed = if params.alpha != 0.0 {
        let shape = [rows, cols, 3];
        let dx = displacement_field(shape, params, rng);
        let dy = displacement_field(shape, params, rng);

        let (grid_x, grid_y) = meshgrid_from_fn(cols, rows, |x, y| (x as f32, y as f32));
        let map_x = dx
            .iter()
            .enumerate()
            .map(|(i, d)| grid_x[i / 3] + d)
            .collect::<Vec<_>>();
        let map_y = dy
            .iter()
            .enumerate()
            .map(|(i, d)| grid_y[i / 3] + d)
            .collect::<Vec<_>>();

        let mut deformed = Image::<f32, 3>::from_size_val(image.size(), 0.0)?;
        remap_channels(&warped, &mut deformed, &map_x, &map_y, BorderMode::Reflect)?;
        deformed
    } else {
        warped
    };

    let data = deformed
        .as_slice()
        .iter()
        .map(|v| v.round().clamp(0.0, 255.0) as u8)
        .collect();

    Ok(Image::new(image.size(), data)?)
}
