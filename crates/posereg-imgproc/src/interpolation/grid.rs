/// Create a pair of sampling maps by evaluating `f` on every destination pixel.
///
/// # Arguments
///
/// * `cols` - The number of columns indicating the width of the grid
/// * `rows` - The number of rows indicating the height of the grid
/// * `f` - Maps the destination pixel `(x, y)` to a source position `(u, v)`.
///
/// # Returns
///
/// A tuple of row-major maps of length `rows * cols` with the x and y source coordinates.
///
/// # Example
///
/// ```
/// use posereg_imgproc::interpolation::grid::meshgrid_from_fn;
///
/// let (map_x, map_y) = meshgrid_from_fn(2, 2, |x, y| (x as f32 + 0.5, y as f32));
/// assert_eq!(map_x, vec![0.5, 1.5, 0.5, 1.5]);
/// assert_eq!(map_y, vec![0.0, 0.0, 1.0, 1.0]);
/// ```
pub fn meshgrid_from_fn(
    cols: usize,
    rows: usize,
    f: impl Fn(usize, usize) -> (f32, f32),
) -> (Vec<f32>, Vec<f32>) {
    let mut map_x = Vec::with_capacity(rows * cols);
    let mut map_y = Vec::with_capacity(rows * cols);

    for y in 0..rows {
        for x in 0..cols {
            let (u, v) = f(x, y);
            map_x.push(u);
            map_y.push(v);
        }
    }

    (map_x, map_y)
}

#[cfg(test)]
mod tests {
    use super::meshgrid_from_fn;

    #[test]
    fn meshgrid_identity() {
        let (map_x, map_y) = meshgrid_from_fn(3, 2, |x, y| (x as f32, y as f32));
        assert_eq!(map_x, vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0]);
        assert_eq!(map_y, vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    }
}
