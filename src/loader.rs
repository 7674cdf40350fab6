//! Sparse `x y grains` input.

use std::io::BufRead;

use crate::{
	error::{Error, Result},
	grid::Grid,
	Cell,
};

/// One `x y grains` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
	pub x: i16,
	pub y: i16,
	pub grains: Cell,
}

/// Reads whitespace-separated triples until end of stream.
///
/// Triples may span lines or share one. Any token that isn't a number of
/// the right type, or a trailing incomplete triple, aborts the whole read.
pub fn parse_records<R: BufRead>(reader: R) -> Result<Vec<Record>> {
	let mut records = Vec::new();
	let (mut x, mut y) = (0, 0);
	let mut field = 0;
	for line in reader.lines() {
		let line = line?;
		for token in line.split_whitespace() {
			let record = records.len() + 1;
			match field {
				0 => x = parse_field(record, token)?,
				1 => y = parse_field(record, token)?,
				_ => {
					let grains = parse_field(record, token)?;
					records.push(Record { x, y, grains });
				},
			}
			field = (field + 1) % 3;
		}
	}
	if field != 0 {
		let token = if field == 1 { x } else { y };
		return Err(Error::Parse {
			record: records.len() + 1,
			token: token.to_string(),
			reason: format!("expected 3 fields, got {}", field),
		});
	}
	Ok(records)
}

fn parse_field<T>(record: usize, token: &str) -> Result<T>
where
	T: std::str::FromStr,
	T::Err: std::fmt::Display,
{
	token.parse().map_err(|e: T::Err| Error::Parse {
		record,
		token: token.to_owned(),
		reason: e.to_string(),
	})
}

/// Materializes the minimal grid covering every record.
///
/// Record `(x, y)` lands in cell `(y - min_y, x - min_x)`; a later record
/// for the same coordinates overwrites an earlier one.
pub fn grid_from_records(records: &[Record]) -> Result<Grid<Cell>> {
	let first = records.first().ok_or(Error::EmptyInput)?;
	let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
	for r in records {
		min_x = min_x.min(r.x);
		max_x = max_x.max(r.x);
		min_y = min_y.min(r.y);
		max_y = max_y.max(r.y);
	}
	let width = (i32::from(max_x) - i32::from(min_x) + 1) as usize;
	let height = (i32::from(max_y) - i32::from(min_y) + 1) as usize;
	let mut grid: Grid<Cell> = Grid::zeroed(width, height)?;
	for r in records {
		let row = (i32::from(r.y) - i32::from(min_y)) as usize;
		let col = (i32::from(r.x) - i32::from(min_x)) as usize;
		grid[(row, col)] = r.grains;
	}
	log::debug!("Loaded {} records into a {}x{} grid (origin {}, {})", records.len(), width, height, min_x, min_y);
	Ok(grid)
}
