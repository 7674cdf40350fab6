//! Abelian sandpile on a grid that grows with the sand.
//!
//! A cell holding more than [`THRESHOLD`] grains topples, sending one
//! grain to each orthogonal neighbor. The grid starts as the bounding
//! rectangle of the sparse input and gains a row or column on a side
//! whenever that side's border holds an unstable cell, so overflow always
//! has somewhere to go.

use std::{
	fmt,
	fs::File,
	io::{BufRead, BufReader},
	path::Path,
};

pub mod bmp;
pub mod error;
pub mod grid;
pub mod loader;
pub mod output;
pub mod palette;
pub mod png;

pub use crate::{
	error::{Error, Result},
	grid::Grid,
	loader::Record,
	palette::{Categories, Color},
};

pub type Cell = u64;

/// A cell with more grains than this is unstable.
pub const THRESHOLD: Cell = 3;

const TOPPLE_LOSS: Cell = THRESHOLD + 1;

#[derive(Debug, Clone, PartialEq)]
pub struct Sandpile {
	grid: Grid<Cell>,
	stable: bool,
	topples: u64,
}

impl Sandpile {
	pub fn from_grid(grid: Grid<Cell>) -> Sandpile {
		Sandpile {
			grid,
			stable: false,
			topples: 0,
		}
	}

	pub fn from_reader<R: BufRead>(reader: R) -> Result<Sandpile> {
		let records = loader::parse_records(reader)?;
		let grid = loader::grid_from_records(&records)?;
		Ok(Sandpile::from_grid(grid))
	}

	pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Sandpile> {
		let path = path.as_ref();
		let open_err = |source| Error::InputOpen {
			path: path.to_owned(),
			source,
		};
		let file = File::open(path).map_err(open_err)?;
		Sandpile::from_reader(BufReader::new(file)).map_err(|e| match e {
			Error::Io(source) => open_err(source),
			e => e,
		})
	}

	/// Performs one row-major sweep over the grid.
	///
	/// Cells are visited by index, and the loop bounds are re-read after
	/// every step, so a cell pushed over the threshold by a topple earlier
	/// in the sweep is toppled in the same sweep only if the scan has not
	/// passed it yet. Growth shifts the contents under the scan without
	/// moving the scan position.
	pub fn update(&mut self) -> Result<()> {
		// Overflow present from the loaded state needs room before it topples.
		self.expand_if_needed()?;
		let mut stable = true;
		let mut i = 0;
		while i < self.grid.height() {
			let mut j = 0;
			while j < self.grid.width() {
				if self.grid[(i, j)] > THRESHOLD {
					self.topple(i, j)?;
					stable = false;
				}
				j += 1;
			}
			i += 1;
		}
		self.stable = stable;
		Ok(())
	}

	fn topple(&mut self, i: usize, j: usize) -> Result<()> {
		let (h, w) = (self.grid.height(), self.grid.width());
		let neighbours = [
			(i > 0).then(|| (i - 1, j)),
			(i + 1 < h).then(|| (i + 1, j)),
			(j > 0).then(|| (i, j - 1)),
			(j + 1 < w).then(|| (i, j + 1)),
		];
		// Nothing is touched unless every neighbour can take its grain.
		for &(row, col) in neighbours.iter().flatten() {
			if self.grid[(row, col)] == Cell::MAX {
				return Err(Error::Overflow { row, col });
			}
		}
		self.grid[(i, j)] -= TOPPLE_LOSS;
		self.topples += 1;
		for &(row, col) in neighbours.iter().flatten() {
			self.grid[(row, col)] += 1;
		}
		self.expand_if_needed()
	}

	/// Adds at most one row or column on each side whose border holds an
	/// unstable cell.
	fn expand_if_needed(&mut self) -> Result<()> {
		let (h, w) = (self.grid.height(), self.grid.width());
		let unstable = |c: &Cell| *c > THRESHOLD;
		let up = self.grid.row(0).iter().any(unstable);
		let down = self.grid.row(h - 1).iter().any(unstable);
		let left = self.grid.column(0).any(unstable);
		let right = self.grid.column(w - 1).any(unstable);
		if !(up || down || left || right) {
			return Ok(());
		}
		self.grid = self.grid.padded(up as usize, down as usize, left as usize, right as usize)?;
		log::debug!(
			"Grid grown from {}x{} to {}x{} (up: {}, down: {}, left: {}, right: {})",
			w, h, self.grid.width(), self.grid.height(), up, down, left, right
		);
		Ok(())
	}

	/// Whether the last [`update`](Sandpile::update) toppled nothing.
	/// `false` before the first update.
	pub fn is_stable(&self) -> bool {
		self.stable
	}

	pub fn width(&self) -> usize {
		self.grid.width()
	}

	pub fn height(&self) -> usize {
		self.grid.height()
	}

	/// Topples performed since construction.
	pub fn topples(&self) -> u64 {
		self.topples
	}

	pub fn grid(&self) -> &Grid<Cell> {
		&self.grid
	}

	pub fn total_grains(&self) -> u128 {
		self.grid.cells().iter().map(|&c| u128::from(c)).sum()
	}

	pub fn category_grid(&self, categories: &Categories) -> Grid<u8> {
		palette::categorize(&self.grid, categories)
	}
}

impl fmt::Display for Sandpile {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.grid)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn pile(rows: Vec<Vec<Cell>>) -> Sandpile {
		Sandpile::from_grid(Grid::from_rows(rows).unwrap())
	}

	fn rows(s: &Sandpile) -> Vec<Vec<Cell>> {
		s.grid().clone().into_rows()
	}

	#[test]
	fn single_interior_topple() {
		let mut s = pile(vec![
			vec![0, 0, 0],
			vec![0, 4, 0],
			vec![0, 0, 0],
		]);
		assert!(!s.is_stable());
		s.update().unwrap();
		assert_eq!(rows(&s), vec![
			vec![0, 1, 0],
			vec![1, 0, 1],
			vec![0, 1, 0],
		]);
		assert!(!s.is_stable());
		assert_eq!(s.topples(), 1);
		s.update().unwrap();
		assert!(s.is_stable());
		assert_eq!(s.topples(), 1);
		assert_eq!((s.width(), s.height()), (3, 3));
	}

	#[test]
	fn lone_cell_grows_on_every_side() {
		let mut s = pile(vec![vec![4]]);
		s.update().unwrap();
		assert_eq!(rows(&s), vec![
			vec![0, 1, 0],
			vec![1, 0, 1],
			vec![0, 1, 0],
		]);
		assert!(!s.is_stable());
		assert_eq!(s.total_grains(), 4);
		s.update().unwrap();
		assert!(s.is_stable());
	}

	#[test]
	fn cascade_only_reaches_cells_ahead_of_the_scan() {
		let mut s = pile(vec![
			vec![0, 0, 0, 0, 0],
			vec![0, 0, 3, 0, 0],
			vec![0, 3, 4, 0, 0],
			vec![0, 0, 3, 0, 0],
			vec![0, 0, 0, 0, 0],
		]);
		s.update().unwrap();
		assert_eq!(rows(&s), vec![
			vec![0, 0, 0, 0, 0],
			vec![0, 0, 4, 0, 0],
			vec![0, 4, 1, 1, 0],
			vec![0, 1, 0, 1, 0],
			vec![0, 0, 1, 0, 0],
		]);
		assert_eq!(s.topples(), 2);
		assert!(!s.is_stable());
	}

	#[test]
	fn growth_shifts_contents_under_the_scan() {
		let mut s = pile(vec![
			vec![0, 3, 0],
			vec![0, 4, 0],
			vec![0, 0, 0],
		]);
		s.update().unwrap();
		assert_eq!(rows(&s), vec![
			vec![0, 0, 0],
			vec![0, 4, 0],
			vec![1, 0, 1],
			vec![0, 1, 0],
		]);
		assert_eq!(s.topples(), 1);
		s.update().unwrap();
		assert_eq!(rows(&s), vec![
			vec![0, 1, 0],
			vec![1, 0, 1],
			vec![1, 1, 1],
			vec![0, 1, 0],
		]);
		s.update().unwrap();
		assert!(s.is_stable());
	}

	#[test]
	fn full_neighbour_stops_the_sweep() {
		let mut s = Sandpile::from_reader("0 0 4\n1 0 18446744073709551615".as_bytes()).unwrap();
		match s.update() {
			Err(Error::Overflow { row, col }) => assert_eq!((row, col), (1, 2)),
			other => panic!("unexpected {:?}", other),
		}
		assert_eq!((s.width(), s.height()), (4, 3));
		assert_eq!(s.grid().row(1), &[0, 4, u64::MAX, 0]);
		assert_eq!(s.topples(), 0);
	}

	#[test]
	fn stable_grid_is_a_fixed_point() {
		let mut s = pile(vec![
			vec![3, 2],
			vec![1, 0],
		]);
		s.update().unwrap();
		assert!(s.is_stable());
		let before = s.clone();
		s.update().unwrap();
		assert_eq!(s, before);
	}

	#[test]
	fn relaxation_conserves_grains_and_is_symmetric() {
		let mut s = pile(vec![vec![256]]);
		let mut sweeps = 0;
		while !s.is_stable() {
			s.update().unwrap();
			assert_eq!(s.total_grains(), 256);
			sweeps += 1;
			assert!(sweeps < 10_000);
		}
		let g = rows(&s);
		assert!(g.iter().flatten().all(|&c| c <= THRESHOLD));
		assert_eq!(s.width(), s.height());
		let n = g.len();
		for i in 0..n {
			for j in 0..n {
				assert_eq!(g[i][j], g[j][i]);
				assert_eq!(g[i][j], g[i][n - 1 - j]);
			}
		}
	}

	#[test]
	fn loads_from_reader() {
		let s = Sandpile::from_reader("0 0 5\n2 0 1\n0 2 1\n".as_bytes()).unwrap();
		assert_eq!((s.width(), s.height()), (3, 3));
		assert_eq!(s.grid()[(0, 0)], 5);
		assert_eq!(s.grid()[(0, 2)], 1);
		assert_eq!(s.grid()[(2, 0)], 1);
		assert_eq!(s.total_grains(), 7);
	}

	#[test]
	fn missing_file_is_an_open_error() {
		let err = Sandpile::from_path("/definitely/not/here.tsv").unwrap_err();
		assert!(matches!(err, Error::InputOpen { .. }));
	}

	#[test]
	fn category_grid_leaves_sand_alone() {
		let s = pile(vec![vec![0, 1, 2, 3, 7]]);
		let cats = s.category_grid(&Categories([5, 6, 7, 8, 9]));
		assert_eq!(cats.into_rows(), vec![vec![5, 6, 7, 8, 9]]);
		assert_eq!(s.grid()[(0, 4)], 7);
	}

	#[test]
	fn display_renders_glyphs() {
		let s = pile(vec![vec![0, 1], vec![2, 3]]);
		assert_eq!(s.to_string(), " .\n:&\n");
	}
}
