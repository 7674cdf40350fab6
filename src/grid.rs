use std::{
	fmt,
	ops::{Index, IndexMut},
};

use crate::error::{Error, Result};

/// Dense rectangular grid stored row-major in one buffer.
///
/// Indexed as `[(row, col)]`; width and height are always at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
	width: usize,
	height: usize,
	cells: Vec<T>,
}

impl<T: Copy + Default> Grid<T> {
	/// Allocates a grid filled with `T::default()`.
	pub fn zeroed(width: usize, height: usize) -> Result<Grid<T>> {
		let len = match width.checked_mul(height) {
			Some(len) if len > 0 => len,
			_ => return Err(Error::Allocation { width, height }),
		};
		let mut cells = Vec::new();
		if cells.try_reserve_exact(len).is_err() {
			return Err(Error::Allocation { width, height });
		}
		cells.resize(len, T::default());
		Ok(Grid {
			width,
			height,
			cells,
		})
	}

	pub fn from_rows(rows: Vec<Vec<T>>) -> std::result::Result<Grid<T>, &'static str> {
		if rows.is_empty() {
			return Err("Empty graph");
		}
		let width = rows[0].len();
		if width == 0 {
			return Err("Empty first row");
		}
		if rows.iter().any(|row| row.len() != width) {
			return Err("Rows of unequal lengths");
		}
		let height = rows.len();
		Ok(Grid {
			width,
			height,
			cells: rows.into_iter().flatten().collect(),
		})
	}

	/// Copy of this grid surrounded by the given number of default-valued
	/// rows and columns on each side.
	pub fn padded(&self, top: usize, bottom: usize, left: usize, right: usize) -> Result<Grid<T>> {
		let width = self.width.checked_add(left + right);
		let height = self.height.checked_add(top + bottom);
		let (width, height) = match (width, height) {
			(Some(w), Some(h)) => (w, h),
			_ => return Err(Error::Allocation {
				width: usize::MAX,
				height: usize::MAX,
			}),
		};
		let mut grown = Grid::zeroed(width, height)?;
		for (i, row) in self.rows().enumerate() {
			let start = (i + top) * width + left;
			grown.cells[start..start + self.width].copy_from_slice(row);
		}
		Ok(grown)
	}

	pub fn get(&self, row: usize, col: usize) -> Option<T> {
		if row < self.height && col < self.width {
			Some(self.cells[row * self.width + col])
		} else {
			None
		}
	}

	/// Writes `value` and returns `false` if the cell is outside the grid.
	pub fn set(&mut self, row: usize, col: usize, value: T) -> bool {
		match self.get_mut(row, col) {
			Some(cell) => {
				*cell = value;
				true
			},
			None => false,
		}
	}

	pub fn into_rows(self) -> Vec<Vec<T>> {
		self.cells.chunks_exact(self.width).map(|row| row.to_vec()).collect()
	}

	pub fn map<U, F>(&self, f: F) -> Grid<U>
	where
		F: Fn(T) -> U,
	{
		Grid {
			width: self.width,
			height: self.height,
			cells: self.cells.iter().map(|&c| f(c)).collect(),
		}
	}
}

impl<T> Grid<T> {
	pub fn width(&self) -> usize {
		self.width
	}

	pub fn height(&self) -> usize {
		self.height
	}

	pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
		if row < self.height && col < self.width {
			Some(&mut self.cells[row * self.width + col])
		} else {
			None
		}
	}

	pub fn rows(&self) -> std::slice::ChunksExact<'_, T> {
		self.cells.chunks_exact(self.width)
	}

	pub fn row(&self, row: usize) -> &[T] {
		&self.cells[row * self.width..(row + 1) * self.width]
	}

	pub fn column(&self, col: usize) -> impl Iterator<Item = &T> + '_ {
		self.cells.iter().skip(col).step_by(self.width)
	}

	pub fn cells(&self) -> &[T] {
		&self.cells
	}
}

impl<T> Index<(usize, usize)> for Grid<T> {
	type Output = T;

	fn index(&self, (row, col): (usize, usize)) -> &T {
		assert!(col < self.width, "column {} out of bounds (width {})", col, self.width);
		&self.cells[row * self.width + col]
	}
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
	fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
		assert!(col < self.width, "column {} out of bounds (width {})", col, self.width);
		&mut self.cells[row * self.width + col]
	}
}

impl fmt::Display for Grid<u64> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let vis = [" ", ".", ":", "&"];
		for row in self.rows() {
			for &el in row {
				f.write_str(vis.get(el as usize).unwrap_or(&"#"))?;
			}
			f.write_str("\n")?;
		}
		Ok(())
	}
}
