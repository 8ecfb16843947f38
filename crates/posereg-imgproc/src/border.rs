/// How samples that fall outside the image are mapped back inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderMode {
    /// Reflect the pixel values at the boundary, starting with the edge pixel itself.
    ///
    /// Example: ...d c b a | a b c d...
    Reflect,

    /// Reflect the pixel values at the boundary, starting with the pixel 'next' to the edge.
    ///
    /// Example: ...d c b a | b c d e...
    Reflect101,
}

impl BorderMode {
    /// Maps index `i` to a valid index within `[0, len)` according to the border mode.
    ///
    /// PRECONDITION: `len > 0`.
    ///
    /// # Example
    ///
    /// ```
    /// use posereg_imgproc::border::BorderMode;
    ///
    /// assert_eq!(BorderMode::Reflect.map_index(-1, 4), 0);
    /// assert_eq!(BorderMode::Reflect101.map_index(-1, 4), 1);
    /// assert_eq!(BorderMode::Reflect.map_index(7, 4), 0);
    /// ```
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let n = len as isize;
        if (0..n).contains(&i) {
            return i as usize;
        }
        match self {
            BorderMode::Reflect => {
                let period = 2 * n;
                let m = i.rem_euclid(period);
                (if m >= n { period - 1 - m } else { m }) as usize
            }
            BorderMode::Reflect101 => {
                let period = 2 * n - 2;
                let m = i.rem_euclid(period);
                (if m >= n { period - m } else { m }) as usize
            }
        }
    }
}
