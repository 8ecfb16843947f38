use rayon::prelude::*;

use super::kernels::{gaussian_kernel_1d, gaussian_kernel_radius};
use crate::border::BorderMode;

/// Number of standard deviations the gaussian kernels are truncated at.
pub const GAUSSIAN_TRUNCATE: f32 = 4.0;

/// Precomputed source indices and weights for every output position along one axis.
///
/// Taps hitting the same source index after border mapping are merged, so short axes
/// (down to a single element) cost no more than their length.
fn axis_taps(len: usize, kernel: &[f32], border: BorderMode) -> Vec<Vec<(usize, f32)>> {
    let radius = (kernel.len() / 2) as isize;
    (0..len)
        .map(|p| {
            let mut taps: Vec<(usize, f32)> = Vec::with_capacity(kernel.len());
            for (k, &w) in kernel.iter().enumerate() {
                let src = border.map_index(p as isize + k as isize - radius, len);
                match taps.iter_mut().find(|(i, _)| *i == src) {
                    Some((_, acc)) => *acc += w,
                    None => taps.push((src, w)),
                }
            }
            taps
        })
        .collect()
}

/// Smooth a dense 3-dimensional field with an isotropic gaussian.
///
/// The field is stored row-major with `shape = [height, width, channels]` and is filtered
/// separably along all three axes, the channel axis included. Samples outside the field
/// are resolved with `border`. A non-positive `sigma` returns the field unchanged.
///
/// # Arguments
///
/// * `field` - The values to smooth.
/// * `shape` - The extent of each axis.
/// * `sigma` - Standard deviation of the gaussian in samples.
/// * `border` - How samples outside the field are mapped back inside.
///
/// # Example
///
/// ```
/// use posereg_imgproc::border::BorderMode;
/// use posereg_imgproc::filter::gaussian_filter_3d;
///
/// let field = vec![2.0f32; 4 * 5 * 3];
/// let smoothed = gaussian_filter_3d(&field, [4, 5, 3], 1.5, BorderMode::Reflect);
/// assert!(smoothed.iter().all(|v| (v - 2.0).abs() < 1e-5));
/// ```
pub fn gaussian_filter_3d(
    field: &[f32],
    shape: [usize; 3],
    sigma: f32,
    border: BorderMode,
) -> Vec<f32> {
    let [rows, cols, channels] = shape;
    debug_assert_eq!(field.len(), rows * cols * channels);

    if sigma.is_nan() || sigma <= 0.0 || field.is_empty() {
        return field.to_vec();
    }

    let radius = gaussian_kernel_radius(sigma, GAUSSIAN_TRUNCATE);
    let kernel = gaussian_kernel_1d(2 * radius + 1, sigma);

    let row_stride = cols * channels;
    let strides = [row_stride, channels, 1];

    let mut src = field.to_vec();
    let mut dst = vec![0.0f32; field.len()];

    for (axis, &len) in shape.iter().enumerate() {
        let taps = axis_taps(len, &kernel, border);
        let stride = strides[axis];

        dst.par_chunks_exact_mut(row_stride)
            .enumerate()
            .for_each(|(r, dst_row)| {
                for (offset, out) in dst_row.iter_mut().enumerate() {
                    let index = [r, offset / channels, offset % channels];
                    let base = r * row_stride + offset - index[axis] * stride;
                    *out = taps[index[axis]]
                        .iter()
                        .map(|&(i, w)| src[base + i * stride] * w)
                        .sum();
                }
            });

        std::mem::swap(&mut src, &mut dst);
    }

    src
}
