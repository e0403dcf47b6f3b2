use std::io::{
	Write,
	Seek, SeekFrom,
};

use crate::{
	ioext::*,
	StoreResult, StoreError,
};

use super::{
	chunkdata::*,
	header::*,
	sector::*,
	first_data_sector,
	is_multiple,
	pad_size,
	MAX_CHUNK_SECTORS,
};

/// Largest sector offset that fits in the upper 24 bits of a location.
const MAX_SECTOR_OFFSET: u64 = 0xFF_FFFF;

/// An abstraction for writing Region files.
/// Write an empty header, write each chunk (each lands on the next sector
/// boundary), then go back and write the real header. Call `.finish()`
/// to take the writer back.
pub struct RegionWriter<W: Write + Seek> {
	writer: W,
	sector_size: u64,
}

impl<W: Write + Seek> RegionWriter<W> {
	pub fn new(writer: W, sector_size: u64) -> Self {
		Self {
			writer,
			sector_size,
		}
	}

	/// Returns the offset of the sector that the writer is writing to.
	/// This is NOT the stream position.
	pub fn sector_offset(&mut self) -> StoreResult<u64> {
		Ok(self.writer.stream_position()? / self.sector_size)
	}

	/// Writes a zeroed header, padded out to the first data sector.
	/// Assumes the writer is at the start of the stream.
	pub fn write_empty_header(&mut self) -> StoreResult<u64> {
		Ok(self.writer.write_zeroes(first_data_sector(self.sector_size) * self.sector_size)?)
	}

	/// Seeks to the beginning of the stream and writes a header.
	pub fn write_header(&mut self, header: &RegionHeader) -> StoreResult<()> {
		let ret = self.writer.seek_return()?;
		self.writer.seek(SeekFrom::Start(0))?;
		header.write_to(&mut self.writer)?;
		self.writer.seek(ret)?;
		Ok(())
	}

	/// Writes one chunk at the current position, which must be on a sector
	/// boundary, then pads to the next boundary.
	/// Returns the location to store in the header.
	pub fn write_chunk(&mut self, data: &ChunkData) -> StoreResult<RegionSector> {
		let position = self.writer.stream_position()?;
		if !is_multiple(position, self.sector_size) {
			return StoreError::format(format!("Stream position {position} is not on a sector boundary."));
		}
		let sector_offset = position / self.sector_size;
		let sector_count = data.sector_count(self.sector_size);
		if sector_count > MAX_CHUNK_SECTORS {
			return StoreError::format(format!("Chunk needs {sector_count} sectors, more than {MAX_CHUNK_SECTORS}."));
		}
		if sector_offset > MAX_SECTOR_OFFSET {
			return StoreError::format(format!("Sector offset {sector_offset} does not fit in a location."));
		}
		let length = data.length();
		self.writer.write_value(length as u32)?;
		self.writer.write_value(data.scheme)?;
		self.writer.write_all(&data.bytes)?;
		// + 4 for the length field.
		self.writer.write_zeroes(pad_size(length + 4, self.sector_size))?;
		Ok(RegionSector::new(sector_offset as u32, sector_count as u8))
	}

	/// Returns the inner writer.
	pub fn finish(self) -> W {
		self.writer
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ErrorKind;
	use crate::world::io::region::compressionscheme::CompressionScheme;
	use std::io::Cursor;

	#[test]
	fn chunks_land_on_boundaries() {
		let mut writer = RegionWriter::new(Cursor::new(Vec::new()), 4096);
		assert_eq!(writer.write_empty_header().unwrap(), 8192);
		let first = ChunkData::new(CompressionScheme::Uncompressed, vec![1, 2, 3]);
		let second = ChunkData::new(CompressionScheme::ZLib, vec![7; 5000]);
		assert_eq!(writer.write_chunk(&first).unwrap(), RegionSector::new(2, 1));
		assert_eq!(writer.sector_offset().unwrap(), 3);
		assert_eq!(writer.write_chunk(&second).unwrap(), RegionSector::new(3, 2));
		let file = writer.finish().into_inner();
		assert_eq!(file.len(), 5 * 4096);
		assert_eq!(&file[8192..8200], &[0, 0, 0, 4, 3, 1, 2, 3]);
		assert_eq!(&file[12288..12293], &[0, 0, 0x13, 0x89, 2]);
	}

	#[test]
	fn small_sectors() {
		let mut writer = RegionWriter::new(Cursor::new(Vec::new()), 256);
		writer.write_empty_header().unwrap();
		let data = ChunkData::new(CompressionScheme::Uncompressed, vec![0; 300]);
		assert_eq!(writer.write_chunk(&data).unwrap(), RegionSector::new(32, 2));
		assert_eq!(writer.finish().into_inner().len(), 8192 + 512);
	}

	#[test]
	fn rejects_oversized_chunk() {
		let mut writer = RegionWriter::new(Cursor::new(Vec::new()), 256);
		writer.write_empty_header().unwrap();
		let data = ChunkData::new(CompressionScheme::Uncompressed, vec![0; 256 * 255]);
		assert_eq!(writer.write_chunk(&data).unwrap_err().kind(), ErrorKind::FormatError);
	}

	#[test]
	fn rejects_unaligned_position() {
		let mut writer = RegionWriter::new(Cursor::new(vec![0u8; 10]), 4096);
		writer.writer.seek(SeekFrom::End(0)).unwrap();
		let data = ChunkData::new(CompressionScheme::Uncompressed, vec![1]);
		assert_eq!(writer.write_chunk(&data).unwrap_err().kind(), ErrorKind::FormatError);
	}
}
