use flate2::Compression;

use crate::nbt::{
	io::{read_named_tag, write_named_tag},
	stream::{ByteCursor, WriteStream},
	tag::{NamedTag, TagID},
};
use crate::{StoreError, StoreResult};

use super::compressionscheme::CompressionScheme;
use super::required_sectors;

/// The stored form of one chunk: the scheme byte and the compressed tag
/// bytes exactly as they appear in the file. Decompression is deferred
/// until the chunk is asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkData {
	pub scheme: CompressionScheme,
	pub bytes: Vec<u8>,
}

impl ChunkData {
	pub fn new(scheme: CompressionScheme, bytes: Vec<u8>) -> Self {
		Self {
			scheme,
			bytes,
		}
	}

	/// Serializes `root` straight into the compressor for `scheme`.
	/// The root must be a Compound.
	pub fn encode(root: &NamedTag, scheme: CompressionScheme, level: Compression) -> StoreResult<Self> {
		if root.tag.id() != TagID::Compound {
			return StoreError::format(format!("Chunk root must be a Compound, found {}.", root.tag.id()));
		}
		let mut stream = WriteStream::new(scheme.encoder(level));
		write_named_tag(&mut stream, &root.tag, &root.name)?;
		let bytes = stream.finish().finish()?;
		Ok(Self::new(scheme, bytes))
	}

	/// Decompresses and parses the stored tree. Bytes that do not parse as
	/// a Compound root fail with [StoreError::FormatError].
	pub fn decode(&self) -> StoreResult<NamedTag> {
		let decompressed = self.scheme.decompress(&self.bytes)?;
		let mut cursor = ByteCursor::from_vec(decompressed);
		let root = read_named_tag(&mut cursor)
			.map_err(|err| StoreError::FormatError(format!("Chunk does not parse: {err}")))?;
		if root.tag.id() != TagID::Compound {
			return StoreError::format(format!("Chunk root is {}, not a Compound.", root.tag.id()));
		}
		Ok(root)
	}

	/// The value of the length field: compressed bytes plus the scheme byte.
	pub fn length(&self) -> u64 {
		self.bytes.len() as u64 + 1
	}

	/// The number of sectors this chunk occupies, including the length field.
	pub fn sector_count(&self, sector_size: u64) -> u64 {
		required_sectors(self.length() + 4, sector_size)
	}
}
