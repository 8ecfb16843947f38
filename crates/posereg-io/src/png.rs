use std::{fs, fs::File, io::Read, path::Path};

use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use posereg_image::{DynamicImage, Image, ImageSize};

use crate::error::IoError;

/// Read a PNG image as an 8-bit image with its stored channel layout.
///
/// Palettes are expanded, sub-byte gray levels are widened and 16-bit samples are
/// reduced to 8 bits.
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// The decoded image as gray, gray+alpha, RGB or RGBA.
pub fn read_image_png(file_path: impl AsRef<Path>) -> Result<DynamicImage, IoError> {
    // verify the file exists
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    // verify the file extension
    match file_path.extension() {
        Some(extension) if extension.eq_ignore_ascii_case("png") => {}
        _ => return Err(IoError::InvalidFileExtension(file_path.to_path_buf())),
    }

    let file = fs::File::open(file_path)?;
    decode_png_impl(file)
}

fn decode_png_impl(source: impl Read) -> Result<DynamicImage, IoError> {
    let mut decoder = Decoder::new(source);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);

    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;
    buf.truncate(info.buffer_size());

    if info.bit_depth != BitDepth::Eight {
        return Err(IoError::PngDecodeError(format!(
            "unsupported output bit depth {:?}",
            info.bit_depth
        )));
    }

    let size = ImageSize {
        width: info.width as usize,
        height: info.height as usize,
    };

    let image = match info.color_type {
        ColorType::Grayscale => DynamicImage::L8(Image::new(size, buf)?),
        ColorType::GrayscaleAlpha => DynamicImage::La8(Image::new(size, buf)?),
        ColorType::Rgb => DynamicImage::Rgb8(Image::new(size, buf)?),
        ColorType::Rgba => DynamicImage::Rgba8(Image::new(size, buf)?),
        ColorType::Indexed => {
            return Err(IoError::PngDecodeError(
                "indexed image was not expanded".to_string(),
            ))
        }
    };

    Ok(image)
}

/// Writes the given PNG _(rgb8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image to write.
pub fn write_image_png_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
) -> Result<(), IoError> {
    write_png_impl(
        file_path,
        image.as_slice(),
        image.size(),
        BitDepth::Eight,
        ColorType::Rgb,
    )
}

fn write_png_impl(
    file_path: impl AsRef<Path>,
    image_data: &[u8],
    image_size: ImageSize,
    depth: BitDepth,
    color_type: ColorType,
) -> Result<(), IoError> {
    let file = File::create(file_path)?;

    let mut encoder = Encoder::new(file, image_size.width as u32, image_size.height as u32);
    encoder.set_color(color_type);
    encoder.set_depth(depth);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .write_image_data(image_data)
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    Ok(())
}
