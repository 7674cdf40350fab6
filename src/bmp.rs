//! 4-bit indexed BMP writer.

use std::{
	convert::TryFrom,
	fs::File,
	io::{self, BufWriter, Write},
	path::Path,
};

use crate::{grid::Grid, palette::PALETTE};

const FILE_HEADER_LEN: u32 = 14;
const INFO_HEADER_LEN: u32 = 40;
const PALETTE_LEN: u32 = 16 * 4;
const PIXELS_PER_METER: u32 = 2835;

fn row_stride(width: usize) -> usize {
	let packed = (width + 1) / 2;
	packed + (4 - packed % 4) % 4
}

/// Encodes `pixels` (palette indices 0..=15) as a 16-color bitmap.
///
/// Grid row 0 is written first, so with the positive height in the header
/// it is the bottom row of the displayed image.
pub fn encode<W: Write>(mut out: W, pixels: &Grid<u8>) -> io::Result<()> {
	if let Some(bad) = pixels.cells().iter().find(|&&p| p > 15) {
		return Err(io::Error::new(io::ErrorKind::InvalidInput, format!("palette index {} out of range", bad)));
	}
	let too_large = || io::Error::new(io::ErrorKind::InvalidInput, "image too large for BMP");
	let width = pixels.width();
	let stride = row_stride(width);
	let data_len = stride.checked_mul(pixels.height()).ok_or_else(too_large)?;
	let offset = FILE_HEADER_LEN + INFO_HEADER_LEN + PALETTE_LEN;
	let data_len = u32::try_from(data_len).map_err(|_| too_large())?;
	let file_len = offset.checked_add(data_len).ok_or_else(too_large)?;
	let w = i32::try_from(width).map_err(|_| too_large())?;
	let h = i32::try_from(pixels.height()).map_err(|_| too_large())?;

	out.write_all(b"BM")?;
	out.write_all(&file_len.to_le_bytes())?;
	out.write_all(&0u32.to_le_bytes())?;
	out.write_all(&offset.to_le_bytes())?;

	out.write_all(&INFO_HEADER_LEN.to_le_bytes())?;
	out.write_all(&w.to_le_bytes())?;
	out.write_all(&h.to_le_bytes())?;
	out.write_all(&1u16.to_le_bytes())?;
	out.write_all(&4u16.to_le_bytes())?;
	out.write_all(&0u32.to_le_bytes())?;
	out.write_all(&data_len.to_le_bytes())?;
	out.write_all(&PIXELS_PER_METER.to_le_bytes())?;
	out.write_all(&PIXELS_PER_METER.to_le_bytes())?;
	out.write_all(&16u32.to_le_bytes())?;
	out.write_all(&0u32.to_le_bytes())?;

	for [r, g, b] in PALETTE.iter() {
		out.write_all(&[*b, *g, *r, 0])?;
	}

	let mut line = vec![0u8; stride];
	for row in pixels.rows() {
		for b in line.iter_mut() {
			*b = 0;
		}
		for (i, pair) in row.chunks(2).enumerate() {
			let hi = pair[0];
			let lo = pair.get(1).copied().unwrap_or(0);
			line[i] = (hi << 4) | lo;
		}
		out.write_all(&line)?;
	}
	Ok(())
}

pub fn write(path: &Path, pixels: &Grid<u8>) -> io::Result<()> {
	let mut out = BufWriter::new(File::create(path)?);
	encode(&mut out, pixels)?;
	out.flush()
}
