use posereg_image::{Image, ImageError};

use crate::border::BorderMode;
use crate::interpolation::{grid::meshgrid_from_fn, remap};

/// An error type for the geometric warps.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WarpError {
    /// The three source points do not span a plane.
    #[error("Affine anchors are collinear: {0:?}")]
    DegenerateTriangle([[f32; 2]; 3]),

    /// Error propagated from the image containers.
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Inverts a 2x3 affine transformation matrix.
///
/// Arguments:
///
/// * `m` - The 2x3 affine transformation matrix.
///
/// Returns:
///
/// The inverted 2x3 affine transformation matrix. A singular matrix inverts to zeros.
pub fn invert_affine_transform(m: &[f32; 6]) -> [f32; 6] {
    let (a, b, c, d, e, f) = (m[0], m[1], m[2], m[3], m[4], m[5]);

    let determinant = a * e - b * d;
    let inv_determinant = if determinant != 0.0 {
        1.0 / determinant
    } else {
        0.0
    };

    let new_a = e * inv_determinant;
    let new_b = -b * inv_determinant;
    let new_d = -d * inv_determinant;
    let new_e = a * inv_determinant;
    let new_c = -(new_a * c + new_b * f);
    let new_f = -(new_d * c + new_e * f);

    [new_a, new_b, new_c, new_d, new_e, new_f]
}

fn det3(m: [[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Computes the 2x3 affine transform mapping three points onto three others.
///
/// Points are `[x, y]` pairs. The result `m` satisfies `m * [sx, sy, 1] = [dx, dy]` for
/// every pair of corresponding points.
///
/// # Errors
///
/// Returns [`WarpError::DegenerateTriangle`] when the source points are collinear.
///
/// # Example
///
/// ```
/// use posereg_imgproc::warp::get_affine_transform;
///
/// let src = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
/// let dst = [[2.0, 3.0], [3.0, 3.0], [2.0, 4.0]];
/// let m = get_affine_transform(&src, &dst).unwrap();
/// assert_eq!(m, [1.0, 0.0, 2.0, 0.0, 1.0, 3.0]);
/// ```
pub fn get_affine_transform(
    src: &[[f32; 2]; 3],
    dst: &[[f32; 2]; 3],
) -> Result<[f32; 6], WarpError> {
    let a = src.map(|p| [p[0] as f64, p[1] as f64, 1.0]);
    let det = det3(a);

    let scale = src
        .iter()
        .flatten()
        .fold(1.0f64, |acc, v| acc.max((*v as f64).abs()));
    if !det.is_finite() || det.abs() <= 1e-9 * scale * scale {
        return Err(WarpError::DegenerateTriangle(*src));
    }

    let mut m = [0.0f32; 6];
    for axis in 0..2 {
        let rhs = dst.map(|p| p[axis] as f64);
        for k in 0..3 {
            let mut ak = a;
            for (row, r) in ak.iter_mut().zip(rhs.iter()) {
                row[k] = *r;
            }
            m[axis * 3 + k] = (det3(ak) / det) as f32;
        }
    }

    Ok(m)
}

/// Applies an affine transformation to a point.
fn transform_point(x: f32, y: f32, m: &[f32; 6]) -> (f32, f32) {
    let u = m[0] * x + m[1] * y + m[2];
    let v = m[3] * x + m[4] * y + m[5];
    (u, v)
}

/// Applies an affine transformation to an image.
///
/// Every destination pixel is sampled with bilinear interpolation from the source position
/// given by the inverse of `m`. Positions outside the source are resolved with `border`.
///
/// # Arguments
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image with shape (height, width, channels).
/// * `m` - The 2x3 affine transformation matrix mapping source to destination.
/// * `border` - How samples outside the source are mapped back inside.
///
/// # Example
///
/// ```
/// use posereg_image::{Image, ImageSize};
/// use posereg_imgproc::border::BorderMode;
/// use posereg_imgproc::warp::warp_affine;
///
/// let src = Image::<_, 3>::from_size_val(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     1f32,
/// )
/// .unwrap();
///
/// let m = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
/// let mut dst = Image::<_, 3>::from_size_val(src.size(), 0.0).unwrap();
///
/// warp_affine(&src, &mut dst, &m, BorderMode::Reflect101).unwrap();
///
/// assert_eq!(dst.as_slice(), src.as_slice());
/// ```
pub fn warp_affine<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    m: &[f32; 6],
    border: BorderMode,
) -> Result<(), ImageError> {
    if src.size().area() == 0 {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    // invert affine transform matrix to find corresponding positions in src from dst
    let m_inv = invert_affine_transform(m);

    let (map_x, map_y) = meshgrid_from_fn(dst.cols(), dst.rows(), |x, y| {
        transform_point(x as f32, y as f32, &m_inv)
    });

    remap(src, dst, &map_x, &map_y, border)
}
