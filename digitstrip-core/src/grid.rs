//! Row-major pixel grids shared by the store, the transforms, and the composer.

use thiserror::Error;

/// Raw intensities of one dataset record.
pub type DigitImage = Grid<u8>;
/// Unit-scale intensities of an image under composition.
pub type Canvas = Grid<f32>;

/// Shape disagreement between a buffer and its declared dimensions.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum ShapeError {
    /// The buffer length is not `width * height`.
    #[error("buffer of {len} values does not fit a {width}x{height} grid")]
    Length {
        /// Declared width.
        width: usize,
        /// Declared height.
        height: usize,
        /// Actual buffer length.
        len: usize,
    },
    /// Grids joined side by side must share a height.
    #[error("cannot join grids of height {left} and {right}")]
    HeightMismatch {
        /// Height of the left grid.
        left: usize,
        /// Height of the right grid.
        right: usize,
    },
}

/// A `width x height` grid stored row by row.
///
/// # Examples
/// ```
/// use digitstrip_core::Grid;
///
/// let mut left = Grid::filled(2, 3, 0_u8);
/// let right = Grid::filled(1, 3, 9_u8);
/// left.hconcat(&right).expect("heights match");
/// assert_eq!(left.width(), 3);
/// assert_eq!(left.row(0), Some(&[0, 0, 9][..]));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Copy> Grid<T> {
    /// Wraps `data` as a grid after checking its length.
    ///
    /// # Errors
    /// Returns [`ShapeError::Length`] when `data.len() != width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, ShapeError> {
        if width.checked_mul(height) != Some(data.len()) {
            return Err(ShapeError::Length {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates a grid with every cell set to `value`.
    #[must_use]
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Creates a zero-width grid of the given height, ready for [`Self::hconcat`].
    #[must_use]
    pub fn empty(height: usize) -> Self {
        Self {
            width: 0,
            height,
            data: Vec::new(),
        }
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cells in row-major order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consumes the grid, returning its row-major cells.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Cell at column `x`, row `y`.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if x >= self.width {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Row `y`, or `None` past the last row.
    #[must_use]
    pub fn row(&self, y: usize) -> Option<&[T]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.data.get(start..start + self.width)
    }

    /// Mutable access to row `y`.
    pub fn row_mut(&mut self, y: usize) -> Option<&mut [T]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.data.get_mut(start..start + self.width)
    }

    /// Applies `f` to every cell, producing a grid of the same shape.
    #[must_use]
    pub fn map<U: Copy>(&self, f: impl FnMut(T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().copied().map(f).collect(),
        }
    }

    /// Appends `other` to the right of this grid.
    ///
    /// # Errors
    /// Returns [`ShapeError::HeightMismatch`] when the heights differ.
    pub fn hconcat(&mut self, other: &Self) -> Result<(), ShapeError> {
        if self.height != other.height {
            return Err(ShapeError::HeightMismatch {
                left: self.height,
                right: other.height,
            });
        }
        let width = self.width + other.width;
        let mut data = Vec::with_capacity(width * self.height);
        for y in 0..self.height {
            data.extend_from_slice(self.row(y).unwrap_or_default());
            data.extend_from_slice(other.row(y).unwrap_or_default());
        }
        self.width = width;
        self.data = data;
        Ok(())
    }
}

impl Grid<u8> {
    /// Sum of all intensities.
    #[must_use]
    pub fn sum(&self) -> u64 {
        self.data.iter().map(|value| u64::from(*value)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::too_short(2, 2, 3)]
    #[case::too_long(2, 2, 5)]
    fn from_vec_rejects_wrong_length(
        #[case] width: usize,
        #[case] height: usize,
        #[case] len: usize,
    ) {
        let err = Grid::from_vec(width, height, vec![0_u8; len]).expect_err("length must mismatch");
        assert_eq!(err, ShapeError::Length { width, height, len });
    }

    #[test]
    fn rows_follow_row_major_order() {
        let grid = Grid::from_vec(3, 2, vec![1_u8, 2, 3, 4, 5, 6]).expect("shape is valid");
        assert_eq!(grid.row(1), Some(&[4, 5, 6][..]));
        assert_eq!(grid.get(2, 0), Some(3));
        assert_eq!(grid.get(3, 0), None);
        assert_eq!(grid.row(2), None);
    }

    #[test]
    fn hconcat_grows_from_empty() {
        let mut canvas = Grid::empty(2);
        let block = Grid::from_vec(2, 2, vec![1.0_f32, 2.0, 3.0, 4.0]).expect("shape is valid");
        canvas.hconcat(&block).expect("heights match");
        canvas.hconcat(&Grid::filled(1, 2, 9.0)).expect("heights match");
        assert_eq!(canvas.width(), 3);
        assert_eq!(canvas.as_slice(), &[1.0, 2.0, 9.0, 3.0, 4.0, 9.0]);
    }

    #[test]
    fn hconcat_rejects_height_mismatch() {
        let mut canvas = Grid::filled(1, 2, 0_u8);
        let err = canvas
            .hconcat(&Grid::filled(1, 3, 0))
            .expect_err("heights differ");
        assert_eq!(err, ShapeError::HeightMismatch { left: 2, right: 3 });
    }

    #[test]
    fn sum_adds_every_cell() {
        let grid = Grid::from_vec(2, 2, vec![255_u8, 255, 1, 0]).expect("shape is valid");
        assert_eq!(grid.sum(), 511);
    }
}
