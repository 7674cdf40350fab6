//! The 16-color palette shared by the image writers, and the mapping from
//! grain counts to palette indices.

use std::fmt;

use crate::{grid::Grid, Cell};

/// Named entries of the fixed palette, in palette-index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Color {
	White,
	Green,
	Purple,
	Yellow,
	Black,
	Maroon,
	Pink,
	Red,
	Orange,
	Beige,
	Grey,
	Violet,
	Cyan,
	Blue,
	Navy,
	Lime,
}

/// RGB values indexed by `Color as usize`.
pub const PALETTE: [[u8; 3]; 16] = [
	[255, 255, 255],
	[0, 127, 0],
	[130, 0, 90],
	[255, 200, 0],
	[0, 0, 0],
	[139, 0, 0],
	[240, 128, 128],
	[255, 0, 0],
	[255, 100, 0],
	[255, 228, 196],
	[192, 192, 192],
	[255, 0, 255],
	[135, 206, 250],
	[0, 0, 255],
	[0, 0, 139],
	[0, 255, 0],
];

impl Color {
	pub fn index(self) -> u8 {
		self as u8
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let name = format!("{:?}", self).to_lowercase();
		f.write_str(&name)
	}
}

/// Palette indices for grain counts 0, 1, 2, 3 and anything above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Categories(pub [u8; 5]);

impl Categories {
	pub fn from_colors(colors: [Color; 5]) -> Categories {
		let mut ids = [0; 5];
		for (id, color) in ids.iter_mut().zip(colors.iter()) {
			*id = color.index();
		}
		Categories(ids)
	}

	pub fn category(&self, grains: Cell) -> u8 {
		self.0[grains.min(4) as usize]
	}
}

/// Same-shaped grid of palette indices; the sand grid is left untouched.
pub fn categorize(grid: &Grid<Cell>, categories: &Categories) -> Grid<u8> {
	grid.map(|grains| categories.category(grains))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn counts_map_to_categories() {
		let grid = Grid::from_rows(vec![vec![0, 1, 2, 3, 7]]).unwrap();
		let cats = Categories([10, 11, 12, 13, 14]);
		assert_eq!(categorize(&grid, &cats).into_rows(), vec![vec![10, 11, 12, 13, 14]]);
		assert_eq!(cats.category(4), 14);
		assert_eq!(cats.category(u64::MAX), 14);
	}

	#[test]
	fn categories_from_colors_use_palette_indices() {
		let cats = Categories::from_colors([Color::White, Color::Green, Color::Purple, Color::Yellow, Color::Black]);
		assert_eq!(cats, Categories([0, 1, 2, 3, 4]));
	}

	#[test]
	fn color_indices_follow_palette_order() {
		assert_eq!(Color::White.index(), 0);
		assert_eq!(Color::Lime.index(), 15);
		assert_eq!(PALETTE[Color::Purple.index() as usize], [130, 0, 90]);
		assert_eq!(Color::Navy.to_string(), "navy");
	}
}
