//! A single compressed file holding one tag tree.

use std::{
	fs::File,
	io::{Read, Write},
	path::Path,
};

use flate2::{
	Compression,
	read::{GzDecoder, ZlibDecoder},
	write::GzEncoder,
};
use tempfile::NamedTempFile;

use crate::nbt::io::{read_named_tag, write_named_tag};
use crate::nbt::stream::ByteCursor;
use crate::nbt::tag::NamedTag;
use crate::{StoreError, StoreResult};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentOptions {
	/// Gzip level used by [NbtDocument::save].
	pub compression: Compression,
}

impl Default for DocumentOptions {
	fn default() -> Self {
		Self {
			compression: Compression::default(),
		}
	}
}

impl DocumentOptions {
	pub fn compression(mut self, compression: Compression) -> Self {
		self.compression = compression;
		self
	}
}

/// The decompressed bytes of one document, plus a cursor over them.
/// The document knows nothing about tags; [NbtDocument::read_root] and
/// [NbtDocument::write_root] just drive the tag protocol over its stream.
#[derive(Debug, Clone, Default)]
pub struct NbtDocument {
	stream: ByteCursor,
	options: DocumentOptions,
}

impl NbtDocument {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_options(options: DocumentOptions) -> Self {
		Self {
			stream: ByteCursor::new(),
			options,
		}
	}

	/// Creates a document and loads `path` into it.
	pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
		let mut document = Self::new();
		document.load(path)?;
		Ok(document)
	}

	pub fn options(&self) -> DocumentOptions {
		self.options
	}

	/// Replaces the buffer with the decompressed contents of `path`.
	/// The cursor is left at position 0.
	pub fn load<P: AsRef<Path>>(&mut self, path: P) -> StoreResult<()> {
		let path = path.as_ref();
		let mut compressed = Vec::new();
		File::open(path)?.read_to_end(&mut compressed)?;
		let decompressed = decompress(&compressed)?;
		log::debug!("Loaded {} bytes ({} compressed) from {}", decompressed.len(), compressed.len(), path.display());
		self.stream = ByteCursor::from_vec(decompressed);
		Ok(())
	}

	/// Gzips the whole buffer into `path`. The file is written next to the
	/// destination first and then moved over it, so a failed save leaves
	/// the old file intact.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> StoreResult<()> {
		let path = path.as_ref();
		let directory = match path.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent,
			_ => Path::new("."),
		};
		let mut temp = NamedTempFile::new_in(directory)?;
		{
			let mut encoder = GzEncoder::new(temp.as_file_mut(), self.options.compression);
			encoder.write_all(self.stream.as_slice())?;
			encoder.finish()?;
		}
		temp.as_file().sync_all()?;
		temp.persist(path).map_err(|err| err.error)?;
		log::debug!("Saved {} bytes to {}", self.stream.len(), path.display());
		Ok(())
	}

	/// Discards the buffer and rewinds the cursor.
	pub fn clear(&mut self) {
		self.stream.clear();
	}

	pub fn stream(&self) -> &ByteCursor {
		&self.stream
	}

	pub fn stream_mut(&mut self) -> &mut ByteCursor {
		&mut self.stream
	}

	/// Reads the root tag starting at the beginning of the buffer.
	pub fn read_root(&mut self) -> StoreResult<NamedTag> {
		self.stream.set_position(0);
		read_named_tag(&mut self.stream)
	}

	/// Replaces the buffer with the encoding of `root`.
	pub fn write_root(&mut self, root: &NamedTag) -> StoreResult<()> {
		self.stream.clear();
		write_named_tag(&mut self.stream, &root.tag, &root.name)?;
		self.stream.set_position(0);
		Ok(())
	}
}

/// Inflates a gzip or zlib stream, picked by the leading magic bytes.
fn decompress(compressed: &[u8]) -> StoreResult<Vec<u8>> {
	let mut decompressed = Vec::new();
	let result = if compressed.starts_with(&GZIP_MAGIC) {
		GzDecoder::new(compressed).read_to_end(&mut decompressed)
	} else {
		ZlibDecoder::new(compressed).read_to_end(&mut decompressed)
	};
	result.map_err(|err| StoreError::CompressionError(err.to_string()))?;
	Ok(decompressed)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::nbt::tag::Tag;
	use crate::{compound, ErrorKind};
	use flate2::write::ZlibEncoder;

	fn sample() -> NamedTag {
		NamedTag::with_name("", compound! {
			("Level", compound! {
				("Width", 16i16),
				("Name", "sample"),
			}),
		})
	}

	#[test]
	fn save_then_load() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("level.dat");
		let mut document = NbtDocument::new();
		document.write_root(&sample()).unwrap();
		document.save(&path).unwrap();

		let mut raw = Vec::new();
		File::open(&path).unwrap().read_to_end(&mut raw).unwrap();
		assert_eq!(&raw[..2], &GZIP_MAGIC);

		let mut loaded = NbtDocument::open(&path).unwrap();
		assert_eq!(loaded.stream().position(), 0);
		assert_eq!(loaded.stream().as_slice(), document.stream().as_slice());
		let root = loaded.read_root().unwrap();
		assert_eq!(root, sample());
		assert_eq!(root.get_tag("Level.Width").unwrap(), &Tag::Short(16));
	}

	#[test]
	fn load_accepts_zlib() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("zlib.dat");
		let mut source = NbtDocument::new();
		source.write_root(&sample()).unwrap();
		let mut encoder = ZlibEncoder::new(Vec::new(), Compression::fast());
		encoder.write_all(source.stream().as_slice()).unwrap();
		std::fs::write(&path, encoder.finish().unwrap()).unwrap();

		let mut loaded = NbtDocument::open(&path).unwrap();
		assert_eq!(loaded.read_root().unwrap(), sample());
	}

	#[test]
	fn load_failures() {
		let dir = tempfile::tempdir().unwrap();
		let missing = NbtDocument::open(dir.path().join("missing.dat")).unwrap_err();
		assert_eq!(missing.kind(), ErrorKind::IoError);

		let garbage = dir.path().join("garbage.dat");
		std::fs::write(&garbage, b"definitely not compressed").unwrap();
		assert_eq!(NbtDocument::open(&garbage).unwrap_err().kind(), ErrorKind::CompressionError);

		// Valid gzip header followed by a deflate block of reserved type.
		let corrupt = dir.path().join("corrupt.dat");
		std::fs::write(&corrupt, [0x1f, 0x8b, 8, 0, 0, 0, 0, 0, 0, 0, 0x07, 0, 0]).unwrap();
		assert_eq!(NbtDocument::open(&corrupt).unwrap_err().kind(), ErrorKind::CompressionError);
	}

	#[test]
	fn failed_save_leaves_destination() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("missing_dir").join("level.dat");
		let document = NbtDocument::new();
		assert_eq!(document.save(&path).unwrap_err().kind(), ErrorKind::IoError);
		assert!(!path.exists());
	}

	#[test]
	fn clear_resets() {
		let mut document = NbtDocument::new();
		document.write_root(&sample()).unwrap();
		assert!(!document.stream().is_empty());
		document.clear();
		assert!(document.stream().is_empty());
		assert_eq!(document.read_root().unwrap_err().kind(), ErrorKind::OutOfRange);
	}
}
