use posereg_image::{DynamicImage, Image, ImageError, ImageSize};

use crate::color::{rgb_from_rgba, WHITE_BACKGROUND};
use crate::mask::{apply_circular_mask, CircleMask};
use crate::resize::resize_area;

/// Options of the network input preprocessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreprocessParams {
    /// Size of the produced image.
    pub size: ImageSize,
    /// Whether pixels outside the central circle are zeroed.
    pub apply_mask: bool,
    /// Color transparent pixels are composited onto.
    pub background: [u8; 3],
}

impl Default for PreprocessParams {
    fn default() -> Self {
        Self {
            size: ImageSize {
                width: 256,
                height: 256,
            },
            apply_mask: true,
            background: WHITE_BACKGROUND,
        }
    }
}

/// Turn a decoded image into the RGB network input.
///
/// RGBA images are alpha blended onto `params.background`. If enabled, the circular mask
/// of [`CircleMask::for_size`] is applied at the source resolution before the image is
/// area resized to `params.size`.
///
/// # Errors
///
/// [`ImageError::UnsupportedChannelCount`] for gray and gray+alpha images.
///
/// # Example
///
/// ```
/// use posereg_image::{DynamicImage, Image, ImageSize};
/// use posereg_imgproc::preprocess::{preprocess, PreprocessParams};
///
/// let rgba = Image::<u8, 4>::from_size_val(ImageSize { width: 64, height: 48 }, 255).unwrap();
/// let params = PreprocessParams {
///     size: ImageSize { width: 32, height: 32 },
///     ..Default::default()
/// };
///
/// let out = preprocess(&DynamicImage::from(rgba), &params).unwrap();
/// assert_eq!(out.size(), params.size);
/// ```
pub fn preprocess(
    image: &DynamicImage,
    params: &PreprocessParams,
) -> Result<Image<u8, 3>, ImageError> {
    let mut rgb = match image {
        DynamicImage::Rgb8(img) => img.clone(),
        DynamicImage::Rgba8(img) => {
            let mut rgb = Image::<u8, 3>::from_size_val(img.size(), 0)?;
            rgb_from_rgba(img, &mut rgb, Some(params.background))?;
            rgb
        }
        other => return Err(ImageError::UnsupportedChannelCount(other.num_channels())),
    };

    if params.apply_mask {
        let mask = CircleMask::for_size(rgb.size());
        apply_circular_mask(&mut rgb, &mask);
    }

    if rgb.size() == params.size {
        return Ok(rgb);
    }

    let mut resized = Image::<u8, 3>::from_size_val(params.size, 0)?;
    resize_area(&rgb, &mut resized)?;

    Ok(resized)
}
