//! Error types for the sandpile simulation.

use std::{
	io,
	path::PathBuf,
};

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure is terminal for the run: nothing here is retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Input file could not be opened or read
	#[error("Can't open input file {}: {source}", .path.display())]
	InputOpen {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	/// A record is not three numeric fields
	#[error("Malformed record #{record} at '{token}': {reason}")]
	Parse {
		record: usize,
		token: String,
		reason: String,
	},

	/// No records at all, so there is no bounding rectangle
	#[error("Input contains no records")]
	EmptyInput,

	/// Grid storage of the requested size can't be obtained
	#[error("Can't allocate a {width}x{height} grid")]
	Allocation {
		width: usize,
		height: usize,
	},

	/// A topple would push a cell past the largest representable count
	#[error("Grain count overflow at cell ({row}, {col})")]
	Overflow {
		row: usize,
		col: usize,
	},

	/// Output location is unusable
	#[error("Output path {}: {reason}", .path.display())]
	OutputDir {
		path: PathBuf,
		reason: &'static str,
	},

	#[error("I/O error: {0}")]
	Io(#[from] io::Error),
}
