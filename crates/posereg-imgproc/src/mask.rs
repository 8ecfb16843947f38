use posereg_image::{Image, ImageSize};
use rayon::prelude::*;

/// A filled circle used to keep only the central region of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircleMask {
    /// Center of the circle as `(x, y)` in pixels.
    pub center: (usize, usize),
    /// Radius of the circle in pixels.
    pub radius: usize,
}

impl CircleMask {
    /// The mask used to crop rendered samples.
    ///
    /// The center is the integer image center `(width / 2, height / 2)` and the radius is
    /// `height / 3`. The radius always follows the height, so on wide images the circle does
    /// not reach the left and right borders.
    ///
    /// # Example
    ///
    /// ```
    /// use posereg_image::ImageSize;
    /// use posereg_imgproc::mask::CircleMask;
    ///
    /// let mask = CircleMask::for_size(ImageSize { width: 640, height: 480 });
    /// assert_eq!(mask.center, (320, 240));
    /// assert_eq!(mask.radius, 160);
    /// ```
    pub fn for_size(size: ImageSize) -> Self {
        Self {
            center: (size.width / 2, size.height / 2),
            radius: size.height / 3,
        }
    }

    /// Whether the pixel `(x, y)` lies inside the filled circle.
    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        let dx = x as i64 - self.center.0 as i64;
        let dy = y as i64 - self.center.1 as i64;
        let r = self.radius as i64;
        dx * dx + dy * dy <= r * r
    }
}

/// Zero every pixel of `image` that falls outside `mask`.
///
/// # Arguments
///
/// * `image` - The image to mask in place.
/// * `mask` - The circle to keep.
pub fn apply_circular_mask<const C: usize>(image: &mut Image<u8, C>, mask: &CircleMask) {
    let cols = image.cols();
    image
        .as_slice_mut()
        .par_chunks_exact_mut(C * cols)
        .enumerate()
        .for_each(|(y, row)| {
            row.chunks_exact_mut(C)
                .enumerate()
                .filter(|(x, _)| !mask.contains(*x, y))
                .for_each(|(_, pixel)| pixel.fill(0));
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use posereg_image::ImageError;

    #[test]
    fn mask_geometry_uses_height() {
        let mask = CircleMask::for_size(ImageSize {
            width: 90,
            height: 30,
        });
        assert_eq!(mask.center, (45, 15));
        assert_eq!(mask.radius, 10);
        assert!(mask.contains(45, 15));
        assert!(mask.contains(55, 15));
        assert!(!mask.contains(56, 15));
        assert!(!mask.contains(0, 15));
    }

    #[test]
    fn mask_zeroes_outside() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 9,
            height: 9,
        };
        let mut image = Image::<u8, 3>::from_size_val(size, 200)?;
        let mask = CircleMask::for_size(size);
        apply_circular_mask(&mut image, &mask);

        // corners are outside, center and the radius tip are inside
        assert_eq!(image.pixel(0, 0)?, &[0, 0, 0]);
        assert_eq!(image.pixel(8, 8)?, &[0, 0, 0]);
        assert_eq!(image.pixel(4, 4)?, &[200, 200, 200]);
        assert_eq!(image.pixel(7, 4)?, &[200, 200, 200]);
        assert_eq!(image.pixel(8, 4)?, &[0, 0, 0]);

        let kept = image.as_slice().chunks_exact(3).filter(|p| p[0] > 0).count();
        assert_eq!(kept, 29);
        Ok(())
    }
}
