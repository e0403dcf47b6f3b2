use std::io::{self, Read, Write};

use flate2::{
	Compression,
	read::{GzDecoder, ZlibDecoder},
	write::{GzEncoder, ZlibEncoder},
};

use crate::{
	StoreResult, StoreError,
	ioext::*,
};

/// Compression scheme used for writing or reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum CompressionScheme {
	/// GZip compression is used.
	GZip = 1,
	/// ZLib compression is used.
	#[default]
	ZLib = 2,
	/// Data is uncompressed.
	Uncompressed = 3,
}

impl CompressionScheme {
	/// Creates an encoder that compresses into a fresh buffer.
	pub fn encoder(self, level: Compression) -> ChunkEncoder {
		match self {
			CompressionScheme::GZip => ChunkEncoder::GZip(GzEncoder::new(Vec::new(), level)),
			CompressionScheme::ZLib => ChunkEncoder::ZLib(ZlibEncoder::new(Vec::new(), level)),
			CompressionScheme::Uncompressed => ChunkEncoder::Uncompressed(Vec::new()),
		}
	}

	/// Inflates `data`. Corrupt input fails with [StoreError::CompressionError].
	pub fn decompress(self, data: &[u8]) -> StoreResult<Vec<u8>> {
		let mut output = Vec::new();
		let result = match self {
			CompressionScheme::GZip => GzDecoder::new(data).read_to_end(&mut output),
			CompressionScheme::ZLib => ZlibDecoder::new(data).read_to_end(&mut output),
			CompressionScheme::Uncompressed => return Ok(data.to_vec()),
		};
		result.map_err(|err| StoreError::CompressionError(format!("{self:?}: {err}")))?;
		Ok(output)
	}
}

impl TryFrom<u8> for CompressionScheme {
	type Error = StoreError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			1 => Ok(Self::GZip),
			2 => Ok(Self::ZLib),
			3 => Ok(Self::Uncompressed),
			// The high bit marks a chunk stored in a separate file.
			external if external & 0x80 != 0 => StoreError::format(format!("Externally stored chunks are not supported (scheme {external}).")),
			unexpected => StoreError::format(format!("Invalid compression scheme: {unexpected}")),
		}
	}
}

impl Writable for CompressionScheme {
	fn write_to<W: Write>(&self, writer: &mut W) -> StoreResult<usize> {
		writer.write_value(*self as u8)
	}
}

impl Readable for CompressionScheme {
	fn read_from<R: Read>(reader: &mut R) -> StoreResult<Self> {
		CompressionScheme::try_from(reader.read_value::<u8>()?)
	}
}

/// A compressor for one chunk payload, picked by [CompressionScheme].
pub enum ChunkEncoder {
	GZip(GzEncoder<Vec<u8>>),
	ZLib(ZlibEncoder<Vec<u8>>),
	Uncompressed(Vec<u8>),
}

impl ChunkEncoder {
	/// Flushes the compressor and returns the compressed bytes.
	pub fn finish(self) -> io::Result<Vec<u8>> {
		match self {
			ChunkEncoder::GZip(encoder) => encoder.finish(),
			ChunkEncoder::ZLib(encoder) => encoder.finish(),
			ChunkEncoder::Uncompressed(buffer) => Ok(buffer),
		}
	}
}

impl Write for ChunkEncoder {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		match self {
			ChunkEncoder::GZip(encoder) => encoder.write(buf),
			ChunkEncoder::ZLib(encoder) => encoder.write(buf),
			ChunkEncoder::Uncompressed(buffer) => buffer.write(buf),
		}
	}

	fn flush(&mut self) -> io::Result<()> {
		match self {
			ChunkEncoder::GZip(encoder) => encoder.flush(),
			ChunkEncoder::ZLib(encoder) => encoder.flush(),
			ChunkEncoder::Uncompressed(buffer) => buffer.flush(),
		}
	}
}
