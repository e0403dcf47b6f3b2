use std::io::{
	Read,
	Seek, SeekFrom,
};

use crate::{
	StoreResult, StoreError,
	ioext::*,
};

use super::{
	chunkdata::*,
	compressionscheme::*,
	header::*,
	sector::*,
	first_data_sector,
	HEADER_SIZE,
};

/// An abstraction for reading Region files.
/// Hand it a reader over the whole file, read the header, then read
/// the chunk each location points to. Every location is checked against
/// the header and the length of the stream before anything is read.
pub struct RegionReader<R: Read + Seek> {
	reader: R,
	sector_size: u64,
	stream_length: u64,
}

impl<R: Read + Seek> RegionReader<R> {
	pub fn new(mut reader: R, sector_size: u64) -> StoreResult<Self> {
		let stream_length = reader.seek(SeekFrom::End(0))?;
		reader.seek(SeekFrom::Start(0))?;
		Ok(Self {
			reader,
			sector_size,
			stream_length,
		})
	}

	pub fn stream_length(&self) -> u64 {
		self.stream_length
	}

	/// Reads both tables from the start of the stream.
	pub fn read_header(&mut self) -> StoreResult<RegionHeader> {
		if self.stream_length < HEADER_SIZE {
			return StoreError::format(format!("Region file is {} bytes, shorter than its {HEADER_SIZE} byte header.", self.stream_length));
		}
		let ret = self.reader.seek_return()?;
		self.reader.seek(SeekFrom::Start(0))?;
		let header = RegionHeader::read_from(&mut self.reader)?;
		self.reader.seek(ret)?;
		Ok(header)
	}

	/// Reads the length, the scheme byte, and the compressed bytes stored at `sector`.
	/// Nothing is decompressed.
	pub fn read_chunk(&mut self, sector: RegionSector) -> StoreResult<ChunkData> {
		if sector.sector_offset() < first_data_sector(self.sector_size) {
			return StoreError::format(format!("Sector {} overlaps the header.", sector.sector_offset()));
		}
		let start = sector.offset(self.sector_size);
		if start + 5 > self.stream_length {
			return StoreError::format(format!("Sector {} starts past the end of the file.", sector.sector_offset()));
		}
		self.reader.seek(sector.seeker(self.sector_size))?;
		let length = self.reader.read_value::<u32>()? as u64;
		if length == 0 {
			return StoreError::format(format!("Chunk at sector {} has zero length.", sector.sector_offset()));
		}
		// The length field itself is not counted in `length`.
		if length + 4 > sector.size(self.sector_size) {
			return StoreError::format(format!(
				"Chunk length {length} does not fit in {} sectors.",
				sector.sector_count(),
			));
		}
		if start + 4 + length > self.stream_length {
			return StoreError::format(format!("Chunk at sector {} runs past the end of the file.", sector.sector_offset()));
		}
		let scheme = CompressionScheme::read_from(&mut self.reader)?;
		let mut bytes = vec![0u8; (length - 1) as usize];
		self.reader.read_exact(&mut bytes)?;
		Ok(ChunkData::new(scheme, bytes))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ErrorKind;
	use std::io::Cursor;

	fn file_with_chunk(length: u32, scheme: u8, payload: &[u8]) -> Vec<u8> {
		let mut file = vec![0u8; 8192];
		file.extend_from_slice(&length.to_be_bytes());
		file.push(scheme);
		file.extend_from_slice(payload);
		file.resize(8192 + 4096, 0);
		file
	}

	#[test]
	fn reads_raw_chunk() {
		let file = file_with_chunk(4, 3, &[9, 8, 7]);
		let mut reader = RegionReader::new(Cursor::new(file), 4096).unwrap();
		assert_eq!(reader.stream_length(), 12288);
		let data = reader.read_chunk(RegionSector::new(2, 1)).unwrap();
		assert_eq!(data, ChunkData::new(CompressionScheme::Uncompressed, vec![9, 8, 7]));
	}

	#[test]
	fn rejects_bad_locations() {
		let file = file_with_chunk(4, 3, &[9, 8, 7]);
		let mut reader = RegionReader::new(Cursor::new(file), 4096).unwrap();
		let kind = |result: StoreResult<ChunkData>| result.unwrap_err().kind();
		assert_eq!(kind(reader.read_chunk(RegionSector::new(1, 1))), ErrorKind::FormatError);
		assert_eq!(kind(reader.read_chunk(RegionSector::new(3, 1))), ErrorKind::FormatError);
	}

	#[test]
	fn rejects_bad_lengths_and_schemes() {
		let zero = file_with_chunk(0, 2, &[]);
		let mut reader = RegionReader::new(Cursor::new(zero), 4096).unwrap();
		assert_eq!(reader.read_chunk(RegionSector::new(2, 1)).unwrap_err().kind(), ErrorKind::FormatError);

		let too_long = file_with_chunk(5000, 2, &[]);
		let mut reader = RegionReader::new(Cursor::new(too_long), 4096).unwrap();
		assert_eq!(reader.read_chunk(RegionSector::new(2, 1)).unwrap_err().kind(), ErrorKind::FormatError);

		let unknown = file_with_chunk(2, 9, &[0]);
		let mut reader = RegionReader::new(Cursor::new(unknown), 4096).unwrap();
		assert_eq!(reader.read_chunk(RegionSector::new(2, 1)).unwrap_err().kind(), ErrorKind::FormatError);
	}

	#[test]
	fn short_header() {
		let mut reader = RegionReader::new(Cursor::new(vec![0u8; 100]), 4096).unwrap();
		assert_eq!(reader.read_header().unwrap_err().kind(), ErrorKind::FormatError);
	}
}
