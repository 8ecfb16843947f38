use crate::image::{Image, ImageSize};

/// An 8-bit image whose channel layout is only known once it has been decoded.
#[derive(Clone, Debug, PartialEq)]
pub enum DynamicImage {
    /// 8-bit grayscale image
    L8(Image<u8, 1>),
    /// 8-bit grayscale image with alpha channel
    La8(Image<u8, 2>),
    /// 8-bit RGB image
    Rgb8(Image<u8, 3>),
    /// 8-bit RGB image with alpha channel
    Rgba8(Image<u8, 4>),
}

impl DynamicImage {
    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        match self {
            DynamicImage::L8(img) => img.size(),
            DynamicImage::La8(img) => img.size(),
            DynamicImage::Rgb8(img) => img.size(),
            DynamicImage::Rgba8(img) => img.size(),
        }
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        match self {
            DynamicImage::L8(_) => 1,
            DynamicImage::La8(_) => 2,
            DynamicImage::Rgb8(_) => 3,
            DynamicImage::Rgba8(_) => 4,
        }
    }
}

impl From<Image<u8, 3>> for DynamicImage {
    fn from(image: Image<u8, 3>) -> Self {
        DynamicImage::Rgb8(image)
    }
}

impl From<Image<u8, 4>> for DynamicImage {
    fn from(image: Image<u8, 4>) -> Self {
        DynamicImage::Rgba8(image)
    }
}
