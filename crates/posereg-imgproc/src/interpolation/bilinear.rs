use crate::border::BorderMode;
use posereg_image::Image;

/// Bilinear interpolation of one channel at a sub-pixel position.
///
/// # Arguments
///
/// * `image` - The input image container with shape (height, width, C).
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `c` - The channel of the pixel to interpolate.
/// * `border` - How neighbours outside the image are mapped back inside.
///
/// # Returns
///
/// The interpolated pixel value.
///
/// # Example
///
/// ```
/// use posereg_image::{Image, ImageSize};
/// use posereg_imgproc::border::BorderMode;
/// use posereg_imgproc::interpolation::interpolate_pixel;
///
/// let image = Image::<f32, 1>::new(
///     ImageSize { width: 2, height: 1 },
///     vec![0.0, 10.0],
/// )
/// .unwrap();
///
/// let value = interpolate_pixel(&image, 0.25, 0.0, 0, BorderMode::Reflect);
/// assert_eq!(value, 2.5);
/// ```
pub fn interpolate_pixel<const C: usize>(
    image: &Image<f32, C>,
    u: f32,
    v: f32,
    c: usize,
    border: BorderMode,
) -> f32 {
    let (rows, cols) = (image.rows(), image.cols());

    let u0 = u.floor();
    let v0 = v.floor();

    let frac_u = u - u0;
    let frac_v = v - v0;

    let (iu, iv) = (u0 as isize, v0 as isize);

    let iu0 = border.map_index(iu, cols);
    let iu1 = border.map_index(iu + 1, cols);
    let iv0 = border.map_index(iv, rows);
    let iv1 = border.map_index(iv + 1, rows);

    let data = image.as_slice();
    let at = |row: usize, col: usize| data[(row * cols + col) * C + c];

    let w00 = (1.0 - frac_u) * (1.0 - frac_v);
    let w01 = frac_u * (1.0 - frac_v);
    let w10 = (1.0 - frac_u) * frac_v;
    let w11 = frac_u * frac_v;

    at(iv0, iu0) * w00 + at(iv0, iu1) * w01 + at(iv1, iu0) * w10 + at(iv1, iu1) * w11
}
