use std::path::Path;

use posereg_image::{DynamicImage, Image};

use crate::{error::IoError, png};

/// Whether the path names a PNG file, judging by its extension.
///
/// # Example
///
/// ```
/// use posereg_io::functional::is_png_path;
///
/// assert!(is_png_path("renders/obj_0001_style01.png"));
/// assert!(is_png_path("renders/OBJ.PNG"));
/// assert!(!is_png_path("renders/poses.json"));
/// ```
pub fn is_png_path(file_path: impl AsRef<Path>) -> bool {
    file_path
        .as_ref()
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

/// Reads an image from the given file path.
///
/// The image format is chosen by the file extension. Only PNG is supported.
///
/// # Arguments
///
/// * `file_path` - The path to the image.
pub fn read_image(file_path: impl AsRef<Path>) -> Result<DynamicImage, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    if !is_png_path(file_path) {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let image = png::read_image_png(file_path)?;
    log::trace!(
        "decoded {} ({} channels, {})",
        file_path.display(),
        image.num_channels(),
        image.size()
    );
    Ok(image)
}

/// Writes an RGB image to the given file path.
///
/// # Arguments
///
/// * `file_path` - The path to the image. Must have the `.png` extension.
/// * `image` - The image to write.
pub fn write_image_rgb8(file_path: impl AsRef<Path>, image: &Image<u8, 3>) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    if !is_png_path(file_path) {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }
    png::write_image_png_rgb8(file_path, image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use posereg_image::ImageSize;

    #[test]
    fn write_read_image() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("out.png");
        let image = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 5,
                height: 4,
            },
            42,
        )?;
        write_image_rgb8(&file_path, &image)?;

        let read = read_image(&file_path)?;
        assert_eq!(read, DynamicImage::Rgb8(image));
        Ok(())
    }

    #[test]
    fn write_rejects_other_extensions() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let image = Image::<u8, 3>::from_size_val([1, 1].into(), 0)?;
        let res = write_image_rgb8(tmp_dir.path().join("out.jpg"), &image);
        assert!(matches!(res, Err(IoError::InvalidFileExtension(_))));
        Ok(())
    }
}
