//! Per-run output directories.

use std::{
	fs,
	path::{Path, PathBuf},
};

use crate::error::{Error, Result};

/// Creates a fresh directory for one run under `base`.
///
/// The directory is named after the input file without its extension;
/// if that name is taken, `name(1)`, `name(2)`, ... are tried in turn.
pub fn create_run_dir(base: &Path, input: &Path) -> Result<PathBuf> {
	if base.exists() {
		if !base.is_dir() {
			return Err(Error::OutputDir {
				path: base.to_owned(),
				reason: "not a directory",
			});
		}
	} else {
		fs::create_dir_all(base)?;
		log::debug!("Created output directory {}", base.display());
	}

	let stem = input
		.file_stem()
		.map(|s| s.to_string_lossy().into_owned())
		.unwrap_or_else(|| "sandpile".to_owned());
	let mut count = 0u32;
	loop {
		let name = if count == 0 {
			stem.clone()
		} else {
			format!("{}({})", stem, count)
		};
		let candidate = base.join(name);
		if !candidate.exists() {
			fs::create_dir(&candidate)?;
			return Ok(candidate);
		}
		if !candidate.is_dir() {
			return Err(Error::OutputDir {
				path: candidate,
				reason: "exists and is not a directory",
			});
		}
		count += 1;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	#[test]
	fn creates_base_and_run_dir() {
		let tmp = TempDir::new().unwrap();
		let base = tmp.path().join("out");
		let dir = create_run_dir(&base, Path::new("data/pile.tsv")).unwrap();
		assert_eq!(dir, base.join("pile"));
		assert!(dir.is_dir());
	}

	#[test]
	fn collisions_get_numbered_suffixes() {
		let tmp = TempDir::new().unwrap();
		let input = Path::new("/some/where/pile.txt");
		let first = create_run_dir(tmp.path(), input).unwrap();
		let second = create_run_dir(tmp.path(), input).unwrap();
		let third = create_run_dir(tmp.path(), input).unwrap();
		assert_eq!(first, tmp.path().join("pile"));
		assert_eq!(second, tmp.path().join("pile(1)"));
		assert_eq!(third, tmp.path().join("pile(2)"));
	}

	#[test]
	fn only_the_last_extension_is_dropped() {
		let tmp = TempDir::new().unwrap();
		let dir = create_run_dir(tmp.path(), Path::new("pile.big.tsv")).unwrap();
		assert_eq!(dir, tmp.path().join("pile.big"));
	}

	#[test]
	fn base_that_is_a_file_is_rejected() {
		let tmp = TempDir::new().unwrap();
		let base = tmp.path().join("file");
		fs::write(&base, b"x").unwrap();
		assert!(matches!(create_run_dir(&base, Path::new("a.tsv")), Err(Error::OutputDir { .. })));
	}

	#[test]
	fn candidate_that_is_a_file_is_rejected() {
		let tmp = TempDir::new().unwrap();
		fs::write(tmp.path().join("pile"), b"x").unwrap();
		assert!(matches!(create_run_dir(tmp.path(), Path::new("pile.tsv")), Err(Error::OutputDir { .. })));
	}
}
