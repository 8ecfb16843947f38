use crate::parallel;
use posereg_image::{Image, ImageError};

/// Default background transparent pixels are composited onto.
pub const WHITE_BACKGROUND: [u8; 3] = [255, 255, 255];

/// Convert an RGBA image to RGB image.
///
/// # Arguments
///
/// * `src` - The input RGBA image.
/// * `dst` - The output RGB image.
/// * `background` - If set, the color the pixels are alpha blended onto. Otherwise the
///   alpha channel is dropped.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use posereg_image::{Image, ImageSize};
/// use posereg_imgproc::color::rgb_from_rgba;
///
/// let src = Image::<u8, 4>::new(ImageSize { width: 2, height: 1 }, vec![
///     0, 1, 2, 255, // (0, 0)
///     3, 4, 5, 0, // (0, 1)
/// ]).unwrap();
///
/// let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0).unwrap();
///
/// rgb_from_rgba(&src, &mut dst, Some([255, 255, 255])).unwrap();
/// assert_eq!(dst.as_slice(), &[0, 1, 2, 255, 255, 255]);
/// ```
pub fn rgb_from_rgba(
    src: &Image<u8, 4>,
    dst: &mut Image<u8, 3>,
    background: Option<[u8; 3]>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    if let Some(bg) = background {
        // alpha blend the background with the source image
        parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
            let (r, g, b, a) = (src_pixel[0], src_pixel[1], src_pixel[2], src_pixel[3]);
            alpha_blend(r, g, b, a, &bg, dst_pixel);
        });
    } else {
        // just drop the alpha channel in the last index
        parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
            dst_pixel[..3].copy_from_slice(&src_pixel[..3]);
        });
    }

    Ok(())
}

fn alpha_blend(r: u8, g: u8, b: u8, a: u8, bg: &[u8; 3], rgb: &mut [u8]) {
    let alpha = a as f32 / 255.0;
    rgb[0] = (r as f32 * alpha + bg[0] as f32 * (1.0 - alpha)).round() as u8;
    rgb[1] = (g as f32 * alpha + bg[1] as f32 * (1.0 - alpha)).round() as u8;
    rgb[2] = (b as f32 * alpha + bg[2] as f32 * (1.0 - alpha)).round() as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use posereg_image::ImageSize;

    #[test]
    fn test_rgb_from_rgba_opaque() -> Result<(), ImageError> {
        let src = Image::<u8, 4>::new(
            ImageSize {
                width: 3,
                height: 2,
            },
            vec![
                0, 1, 2, 255, // (0, 0)
                3, 4, 5, 255, // (0, 1)
                6, 7, 8, 255, // (0, 2)
                9, 10, 11, 255, // (1, 0)
                12, 13, 14, 255, // (1, 1)
                15, 16, 17, 255, // (1, 2)
            ],
        )?;

        let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0)?;
        rgb_from_rgba(&src, &mut dst, Some(WHITE_BACKGROUND))?;

        assert_eq!(
            dst.as_slice(),
            &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17]
        );

        Ok(())
    }

    #[test]
    fn test_rgb_from_rgba_half_transparent() -> Result<(), ImageError> {
        let src = Image::<u8, 4>::new(
            ImageSize {
                width: 1,
                height: 1,
            },
            vec![100, 0, 200, 128],
        )?;

        let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0)?;
        rgb_from_rgba(&src, &mut dst, Some([0, 0, 0]))?;
        assert_eq!(dst.as_slice(), &[50, 0, 100]);

        rgb_from_rgba(&src, &mut dst, None)?;
        assert_eq!(dst.as_slice(), &[100, 0, 200]);

        Ok(())
    }

    #[test]
    fn test_rgb_from_rgba_size_mismatch() -> Result<(), ImageError> {
        let src = Image::<u8, 4>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            0,
        )?;
        let mut dst = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 1,
                height: 2,
            },
            0,
        )?;
        assert!(rgb_from_rgba(&src, &mut dst, None).is_err());
        Ok(())
    }
}
