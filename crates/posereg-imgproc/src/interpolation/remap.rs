use crate::border::BorderMode;
use crate::parallel;

use super::bilinear::interpolate_pixel;
use posereg_image::{Image, ImageError};

/// Apply generic geometric transformation to an image.
///
/// Every channel of the destination pixel `i` is sampled at `(map_x[i], map_y[i])`.
///
/// # Arguments
///
/// * `src` - The input image container with shape (height, width, C).
/// * `dst` - The output image container with shape (height, width, C).
/// * `map_x` - The x coordinates of the pixels to interpolate.
/// * `map_y` - The y coordinates of the pixels to interpolate.
/// * `border` - How samples outside `src` are mapped back inside.
///
/// # Errors
///
/// * The mapx and mapy must have the same size.
/// * The output image must have the same number of pixels as the maps.
pub fn remap<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    map_x: &[f32],
    map_y: &[f32],
    border: BorderMode,
) -> Result<(), ImageError> {
    if map_x.len() != map_y.len() || map_x.len() != dst.size().area() {
        return Err(ImageError::InvalidChannelShape(
            map_x.len().max(map_y.len()),
            dst.size().area(),
        ));
    }

    // parallelize the remap operation by rows
    parallel::par_iter_rows_resample(dst, map_x, map_y, |&x, &y, dst_pixel| {
        dst_pixel.iter_mut().enumerate().for_each(|(c, pixel)| {
            *pixel = interpolate_pixel(src, x, y, c, border);
        });
    });

    Ok(())
}

/// Apply a geometric transformation with an independent sampling position per channel.
///
/// The maps share the (height, width, C) layout of `dst`: channel `c` of pixel `(x, y)` is
/// read from channel `c` of `src` at `(map_x[i], map_y[i])` with `i = (y * width + x) * C + c`.
///
/// # Errors
///
/// The maps must have exactly as many entries as `dst` has values.
pub fn remap_channels<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    map_x: &[f32],
    map_y: &[f32],
    border: BorderMode,
) -> Result<(), ImageError> {
    let len = dst.as_slice().len();
    if map_x.len() != len || map_y.len() != len {
        return Err(ImageError::InvalidChannelShape(
            map_x.len().max(map_y.len()),
            len,
        ));
    }

    parallel::par_iter_rows_resample_channels(dst, map_x, map_y, |xs, ys, dst_pixel| {
        dst_pixel
            .iter_mut()
            .zip(xs.iter().zip(ys.iter()))
            .enumerate()
            .for_each(|(c, (pixel, (&x, &y)))| {
                *pixel = interpolate_pixel(src, x, y, c, border);
            });
    });

    Ok(())
}
