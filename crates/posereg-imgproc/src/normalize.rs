use posereg_image::{Image, ImageError};

/// Cast an 8-bit image to `f32` values in `[0, 1]`.
///
/// # Example
///
/// ```
/// use posereg_image::{Image, ImageSize};
/// use posereg_imgproc::normalize::cast_and_scale;
///
/// let image = Image::<u8, 3>::from_size_val(ImageSize { width: 1, height: 1 }, 255).unwrap();
/// let unit = cast_and_scale(&image).unwrap();
/// assert_eq!(unit.as_slice(), &[1.0, 1.0, 1.0]);
/// ```
pub fn cast_and_scale<const C: usize>(image: &Image<u8, C>) -> Result<Image<f32, C>, ImageError> {
    image.cast_and_scale::<f32>(1.0 / 255.0)
}
