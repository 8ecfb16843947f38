use fast_image_resize as fr;
use posereg_image::{Image, ImageError};

/// Pixel layout of an 8-bit image with `C` channels.
fn pixel_type<const C: usize>() -> Result<fr::PixelType, ImageError> {
    match C {
        1 => Ok(fr::PixelType::U8),
        2 => Ok(fr::PixelType::U8x2),
        3 => Ok(fr::PixelType::U8x3),
        4 => Ok(fr::PixelType::U8x4),
        _ => Err(ImageError::UnsupportedChannelCount(C)),
    }
}

/// Resize an image by averaging the source area covered by every destination pixel.
///
/// This is the area interpolation used to shrink rendered images without aliasing. It runs
/// a box filter convolution through the [fast_image_resize](https://crates.io/crates/fast_image_resize)
/// crate, whose support grows with the downscaling factor.
///
/// # Arguments
///
/// * `src` - The input image container.
/// * `dst` - The output image container. Its size is the target size.
///
/// # Errors
///
/// An error is returned if either image is empty or has more than 4 channels.
///
/// # Example
///
/// ```
/// use posereg_image::{Image, ImageSize};
/// use posereg_imgproc::resize::resize_area;
///
/// let image = Image::<u8, 3>::from_size_val(ImageSize { width: 4, height: 5 }, 10).unwrap();
///
/// let mut resized = Image::<u8, 3>::from_size_val(ImageSize { width: 2, height: 3 }, 0).unwrap();
/// resize_area(&image, &mut resized).unwrap();
///
/// assert_eq!(resized.size().width, 2);
/// assert_eq!(resized.size().height, 3);
/// ```
pub fn resize_area<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
) -> Result<(), ImageError> {
    if src.size().area() == 0 || dst.size().area() == 0 {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    let pixel_type = pixel_type::<C>()?;

    // prepare the input image for the fast_image_resize crate
    let src_width = u32::try_from(src.width()).map_err(|_| ImageError::CastError)?;
    let src_height = u32::try_from(src.height()).map_err(|_| ImageError::CastError)?;
    let src_data_len = src.as_slice().len();

    let src_image = fr::images::ImageRef::new(src_width, src_height, src.as_slice(), pixel_type)
        .map_err(|_| ImageError::InvalidChannelShape(src_data_len, src.size().area() * C))?;

    // prepare the output image for the fast_image_resize crate
    let dst_width = u32::try_from(dst.width()).map_err(|_| ImageError::CastError)?;
    let dst_height = u32::try_from(dst.height()).map_err(|_| ImageError::CastError)?;
    let dst_data_len = dst.size().area() * C;

    let mut dst_image =
        fr::images::Image::from_slice_u8(dst_width, dst_height, dst.as_slice_mut(), pixel_type)
            .map_err(|_| ImageError::InvalidChannelShape(dst_data_len, dst_data_len))?;

    let options =
        fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(fr::FilterType::Box));

    fr::Resizer::new()
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|_| ImageError::IncompatiblePixelTypes)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use posereg_image::ImageSize;

    #[test]
    fn resize_area_smoke_ch3() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 4,
                height: 5,
            },
            vec![0u8; 4 * 5 * 3],
        )?;

        let mut resized = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 2,
                height: 3,
            },
            0,
        )?;
        resize_area(&image, &mut resized)?;

        assert_eq!(resized.num_channels(), 3);
        assert_eq!(resized.size().width, 2);
        assert_eq!(resized.size().height, 3);
        Ok(())
    }

    #[test]
    fn resize_area_preserves_constant() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 37,
                height: 23,
            },
            77,
        )?;
        let mut resized = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 16,
                height: 16,
            },
            0,
        )?;
        resize_area(&image, &mut resized)?;
        assert!(resized.as_slice().iter().all(|&v| v.abs_diff(77) <= 1));
        Ok(())
    }

    #[test]
    fn resize_area_averages_blocks() -> Result<(), ImageError> {
        // left half dark, right half bright: halving keeps the two halves apart
        let size = ImageSize {
            width: 8,
            height: 4,
        };
        let data = (0..size.area())
            .map(|i| if i % 8 < 4 { 20 } else { 220 })
            .collect();
        let image = Image::<u8, 1>::new(size, data)?;
        let mut resized = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 2,
            },
            0,
        )?;
        resize_area(&image, &mut resized)?;
        for row in resized.as_slice().chunks_exact(4) {
            assert!(row[0].abs_diff(20) <= 1);
            assert!(row[3].abs_diff(220) <= 1);
        }
        Ok(())
    }

    #[test]
    fn resize_area_empty_fails() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 0,
                height: 0,
            },
            vec![],
        )?;
        let mut resized = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            0,
        )?;
        assert!(resize_area(&image, &mut resized).is_err());
        Ok(())
    }
}
