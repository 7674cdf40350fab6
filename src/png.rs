use std::{
	convert::TryFrom,
	fs::File,
	io,
	path::Path,
};

use crate::{grid::Grid, palette::PALETTE};

/// Writes palette indices as an RGBA PNG, grid row 0 at the top.
pub fn write(path: &Path, pixels: &Grid<u8>) -> io::Result<()> {
	let too_large = || io::Error::new(io::ErrorKind::InvalidInput, "image too large for PNG");
	let width = u32::try_from(pixels.width()).map_err(|_| too_large())?;
	let height = u32::try_from(pixels.height()).map_err(|_| too_large())?;
	let rgba = to_rgba(pixels)?;
	repng::encode(File::create(path)?, width, height, &rgba)
}

fn to_rgba(pixels: &Grid<u8>) -> io::Result<Vec<u8>> {
	let mut rgba = vec![0; pixels.cells().len() * 4];
	for (p, &el) in rgba.chunks_exact_mut(4).zip(pixels.cells()) {
		let [r, g, b] = *PALETTE.get(el as usize).ok_or_else(|| {
			io::Error::new(io::ErrorKind::InvalidInput, format!("palette index {} out of range", el))
		})?;
		p.copy_from_slice(&[r, g, b, 255]);
	}
	Ok(rgba)
}
