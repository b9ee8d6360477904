//! Grid types shared by the imaging stages and the card builder.
//!
//! Both grids are stored row-major in a flat `Vec` and are always rectangular:
//! a ragged input is rejected at construction time, so downstream stages can
//! index freely without re-checking row lengths.
//!
//! - [`PixelGrid`]: scalar intensities in `[0, 1]` (grayscale, resampled,
//!   and the working buffer during dithering).
//! - [`BinaryGrid`]: the dithered result; every cell is `0` or `1`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        actual: usize,
        expected: usize,
    },
}

/// Rectangular grid of intensities. `0.0` is black, `1.0` is white.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl PixelGrid {
    /// Create a black grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0.0)
    }

    pub fn filled(width: usize, height: usize, value: f64) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Build a grid by evaluating `f(x, y)` for every cell.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, GridError> {
        let (width, height, data) = flatten(rows)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Panics if `(x, y)` is outside the grid.
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.data[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        let i = self.index(x, y);
        self.data[i] = value;
    }

    /// Add `delta` to a cell. Used for error diffusion.
    pub fn add(&mut self, x: usize, y: usize, delta: f64) {
        let i = self.index(x, y);
        self.data[i] += delta;
    }

    pub fn row(&self, y: usize) -> &[f64] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    pub fn values(&self) -> &[f64] {
        &self.data
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        y * self.width + x
    }
}

/// Rectangular grid of `0`/`1` cells. `1` is a punched hole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryGrid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl BinaryGrid {
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, GridError> {
        let (width, height, cells) = flatten(rows)?;
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub(crate) fn from_cells(width: usize, height: usize, cells: Vec<u8>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.cells[y * self.width + x]
    }

    pub fn row(&self, y: usize) -> &[u8] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // zero-width grids hold no cells, so the chunk size only has to be non-zero
        self.cells.chunks(self.width.max(1))
    }

    pub fn count_ones(&self) -> usize {
        self.cells.iter().filter(|&&c| c == 1).count()
    }
}

fn flatten<T: Copy>(rows: Vec<Vec<T>>) -> Result<(usize, usize, Vec<T>), GridError> {
    let height = rows.len();
    let width = rows.first().map_or(0, Vec::len);
    let mut data = Vec::with_capacity(width * height);
    for (row, cells) in rows.into_iter().enumerate() {
        if cells.len() != width {
            return Err(GridError::RaggedRow {
                row,
                actual: cells.len(),
                expected: width,
            });
        }
        data.extend(cells);
    }
    Ok((width, height, data))
}
