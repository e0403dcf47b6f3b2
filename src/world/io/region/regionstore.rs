//! An in-memory region: 1024 chunk slots loaded from, and saved to, one
//! region file.
//!
//! The whole file is read on [RegionStore::load] and rewritten on
//! [RegionStore::save]. Slots keep their chunks compressed, so a chunk that
//! was loaded and never replaced is written back byte for byte.

use std::{
	fs,
	io::{self, Cursor, Write},
	path::{Path, PathBuf},
};

use flate2::Compression;
use tempfile::NamedTempFile;

use crate::nbt::tag::NamedTag;
use crate::world::chunk::{AirChunk, EmptyChunk};
use crate::{StoreError, StoreResult};

use super::{
	chunkdata::ChunkData,
	compressionscheme::CompressionScheme,
	coord::RegionCoord,
	header::RegionHeader,
	reader::RegionReader,
	sector::RegionSector,
	timestamp::Timestamp,
	writer::RegionWriter,
	region_of,
	region_path,
	DEFAULT_SECTOR_SIZE,
	MAX_CHUNK_SECTORS,
};

/// Settings for how a [RegionStore] lays out and compresses its chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionOptions {
	/// Bytes per sector. A power of two no smaller than 256.
	pub sector_size: u64,
	/// Level used when compressing chunks passed to `put_chunk`.
	pub compression: Compression,
	/// Scheme used when compressing chunks passed to `put_chunk`.
	/// Chunks loaded from a file keep the scheme they were stored with.
	pub scheme: CompressionScheme,
}

impl Default for RegionOptions {
	fn default() -> Self {
		Self {
			sector_size: DEFAULT_SECTOR_SIZE,
			compression: Compression::default(),
			scheme: CompressionScheme::ZLib,
		}
	}
}

impl RegionOptions {
	pub fn sector_size(mut self, sector_size: u64) -> Self {
		self.sector_size = sector_size;
		self
	}

	pub fn compression(mut self, compression: Compression) -> Self {
		self.compression = compression;
		self
	}

	pub fn scheme(mut self, scheme: CompressionScheme) -> Self {
		self.scheme = scheme;
		self
	}

	pub fn validate(&self) -> StoreResult<()> {
		if self.sector_size < 256 || !self.sector_size.is_power_of_two() {
			return Err(StoreError::OutOfRange(format!(
				"Sector size must be a power of two of at least 256, found {}.",
				self.sector_size,
			)));
		}
		Ok(())
	}
}

/// One cell of the 32x32 grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkSlot {
	pub data: Option<ChunkData>,
	pub timestamp: Timestamp,
}

/// The chunks of one region file, held in memory.
/// Two stores over the same file do not see each other's changes.
pub struct RegionStore<E: EmptyChunk = AirChunk> {
	world_path: PathBuf,
	region_x: i32,
	region_z: i32,
	slots: Vec<ChunkSlot>,
	options: RegionOptions,
	empty_chunk: E,
	dirty: bool,
}

impl RegionStore {
	/// Opens region `(region_x, region_z)` of the world at `world_path`.
	/// A missing region file is an empty region.
	pub fn new<P: AsRef<Path>>(world_path: P, region_x: i32, region_z: i32) -> StoreResult<Self> {
		Self::with_options(world_path, region_x, region_z, RegionOptions::default())
	}

	pub fn with_options<P: AsRef<Path>>(
		world_path: P,
		region_x: i32,
		region_z: i32,
		options: RegionOptions,
	) -> StoreResult<Self> {
		RegionStore::with_empty_chunk(world_path, region_x, region_z, options, AirChunk)
	}

	/// Opens the region that holds the absolute chunk `(chunk_x, chunk_z)`.
	pub fn for_chunk<P: AsRef<Path>>(world_path: P, chunk_x: i32, chunk_z: i32) -> StoreResult<Self> {
		Self::new(world_path, region_of(chunk_x), region_of(chunk_z))
	}
}

impl<E: EmptyChunk> RegionStore<E> {
	pub fn with_empty_chunk<P: AsRef<Path>>(
		world_path: P,
		region_x: i32,
		region_z: i32,
		options: RegionOptions,
		empty_chunk: E,
	) -> StoreResult<Self> {
		options.validate()?;
		let mut store = Self {
			world_path: world_path.as_ref().to_owned(),
			region_x,
			region_z,
			slots: vec![ChunkSlot::default(); 1024],
			options,
			empty_chunk,
			dirty: false,
		};
		store.load()?;
		Ok(store)
	}

	pub fn world_path(&self) -> &Path {
		&self.world_path
	}

	/// `<world>/region/r.<x>.<z>.mca`
	pub fn path(&self) -> PathBuf {
		region_path(&self.world_path, self.region_x, self.region_z)
	}

	pub fn region_x(&self) -> i32 {
		self.region_x
	}

	pub fn region_z(&self) -> i32 {
		self.region_z
	}

	pub fn options(&self) -> RegionOptions {
		self.options
	}

	/// True when slots changed since the last load or save.
	pub fn is_dirty(&self) -> bool {
		self.dirty
	}

	/// Replaces every slot with the contents of the region file.
	/// A missing file empties the store. On any other failure the slots
	/// are left as they were.
	pub fn load(&mut self) -> StoreResult<()> {
		let path = self.path();
		let bytes = match fs::read(&path) {
			Ok(bytes) => bytes,
			Err(err) if err.kind() == io::ErrorKind::NotFound => {
				log::trace!("No region file at {}", path.display());
				self.slots = vec![ChunkSlot::default(); 1024];
				self.dirty = false;
				return Ok(());
			}
			Err(err) => return Err(err.into()),
		};
		let mut reader = RegionReader::new(Cursor::new(bytes), self.options.sector_size)?;
		let header = reader.read_header()?;
		let mut slots = vec![ChunkSlot::default(); 1024];
		for coord in RegionCoord::all() {
			let slot = &mut slots[coord.index()];
			slot.timestamp = header.timestamps[coord];
			let sector = header.sectors[coord];
			if !sector.is_empty() {
				let data = reader.read_chunk(sector)
					.map_err(|err| match err {
						StoreError::FormatError(msg) => StoreError::FormatError(format!("Chunk {coord}: {msg}")),
						other => other,
					})?;
				slot.data = Some(data);
			}
		}
		check_overlaps(&header)?;
		self.slots = slots;
		self.dirty = false;
		log::debug!("Loaded {} chunks from {}", self.chunk_count(), path.display());
		Ok(())
	}

	/// Builds the full contents of the region file. Chunks are packed in
	/// slot order directly after the header.
	pub fn to_bytes(&self) -> StoreResult<Vec<u8>> {
		let mut writer = RegionWriter::new(Cursor::new(Vec::new()), self.options.sector_size);
		writer.write_empty_header()?;
		let mut header = RegionHeader::default();
		for coord in RegionCoord::all() {
			let slot = &self.slots[coord.index()];
			header.timestamps[coord] = slot.timestamp;
			if let Some(data) = &slot.data {
				header.sectors[coord] = writer.write_chunk(data)?;
			}
		}
		writer.write_header(&header)?;
		Ok(writer.finish().into_inner())
	}

	/// Writes every slot to the region file. The file is replaced in one
	/// step once the new contents are fully built, so a failed save leaves
	/// the previous file as it was.
	pub fn save(&mut self) -> StoreResult<()> {
		let bytes = self.to_bytes()?;
		let path = self.path();
		let directory = self.world_path.join("region");
		fs::create_dir_all(&directory)?;
		let mut temp = NamedTempFile::new_in(&directory)?;
		temp.write_all(&bytes)?;
		temp.as_file().sync_all()?;
		temp.persist(&path).map_err(|err| err.error)?;
		self.dirty = false;
		log::debug!("Saved {} chunks ({} bytes) to {}", self.chunk_count(), bytes.len(), path.display());
		Ok(())
	}

	/// Returns the chunk stored at `coord`, or the empty chunk if the slot
	/// holds nothing. The returned tree is a copy.
	pub fn get_chunk<C: Into<RegionCoord>>(&self, coord: C) -> StoreResult<NamedTag> {
		let coord: RegionCoord = coord.into();
		match &self.slots[coord.index()].data {
			Some(data) => data.decode(),
			None => Ok(self.get_empty_chunk_nbt(coord)),
		}
	}

	/// Stores `root` at `coord` and stamps it with the current time.
	pub fn put_chunk<C: Into<RegionCoord>>(&mut self, root: &NamedTag, coord: C) -> StoreResult<()> {
		self.put_chunk_timestamped(root, coord, Timestamp::NEVER)
	}

	/// Stores `root` at `coord` with the given timestamp. A zero timestamp
	/// means now. The slot is only replaced once the chunk has been
	/// compressed and found to fit.
	pub fn put_chunk_timestamped<C: Into<RegionCoord>>(
		&mut self,
		root: &NamedTag,
		coord: C,
		timestamp: Timestamp,
	) -> StoreResult<()> {
		let coord: RegionCoord = coord.into();
		let data = ChunkData::encode(root, self.options.scheme, self.options.compression)?;
		let sectors = data.sector_count(self.options.sector_size);
		if sectors > MAX_CHUNK_SECTORS {
			return StoreError::format(format!("Chunk {coord} needs {sectors} sectors, more than {MAX_CHUNK_SECTORS}."));
		}
		let timestamp = if timestamp.is_never() {
			Timestamp::utc_now()
		} else {
			timestamp
		};
		log::trace!("Put chunk {coord} ({} bytes) in region ({}, {})", data.bytes.len(), self.region_x, self.region_z);
		self.slots[coord.index()] = ChunkSlot {
			data: Some(data),
			timestamp,
		};
		self.dirty = true;
		Ok(())
	}

	/// Returns [Timestamp::NEVER] for a slot that was never written.
	pub fn get_chunk_timestamp<C: Into<RegionCoord>>(&self, coord: C) -> Timestamp {
		let coord: RegionCoord = coord.into();
		self.slots[coord.index()].timestamp
	}

	/// Sets the timestamp of `coord` to now. The stored chunk is untouched.
	pub fn update_timestamp<C: Into<RegionCoord>>(&mut self, coord: C) {
		let coord: RegionCoord = coord.into();
		self.slots[coord.index()].timestamp = Timestamp::utc_now();
		self.dirty = true;
	}

	/// The tree returned for an empty slot at `coord`.
	pub fn get_empty_chunk_nbt<C: Into<RegionCoord>>(&self, coord: C) -> NamedTag {
		let coord: RegionCoord = coord.into();
		let (chunk_x, chunk_z) = coord.chunk_coord(self.region_x, self.region_z);
		self.empty_chunk.empty_chunk(chunk_x, chunk_z)
	}

	pub fn has_chunk<C: Into<RegionCoord>>(&self, coord: C) -> bool {
		let coord: RegionCoord = coord.into();
		self.slots[coord.index()].data.is_some()
	}

	/// Empties the slot at `coord`, timestamp included.
	/// Returns true if a chunk was removed.
	pub fn delete_chunk<C: Into<RegionCoord>>(&mut self, coord: C) -> bool {
		let coord: RegionCoord = coord.into();
		let slot = std::mem::take(&mut self.slots[coord.index()]);
		let removed = slot.data.is_some();
		if removed || !slot.timestamp.is_never() {
			self.dirty = true;
		}
		removed
	}

	/// The raw stored form of the chunk at `coord`.
	pub fn chunk_data<C: Into<RegionCoord>>(&self, coord: C) -> Option<&ChunkData> {
		let coord: RegionCoord = coord.into();
		self.slots[coord.index()].data.as_ref()
	}

	pub fn chunk_count(&self) -> usize {
		self.slots.iter().filter(|slot| slot.data.is_some()).count()
	}

	/// The coordinates of every slot that holds a chunk, in slot order.
	pub fn chunks(&self) -> impl Iterator<Item = RegionCoord> + '_ {
		RegionCoord::all().filter(move |coord| self.slots[coord.index()].data.is_some())
	}
}

/// Two chunks may not share a sector.
fn check_overlaps(header: &RegionHeader) -> StoreResult<()> {
	let mut used: Vec<(RegionSector, RegionCoord)> = RegionCoord::all()
		.map(|coord| (header.sectors[coord], coord))
		.filter(|(sector, _)| !sector.is_empty())
		.collect();
	used.sort_by_key(|(sector, _)| sector.sector_offset());
	for pair in used.windows(2) {
		let (first, first_coord) = pair[0];
		let (second, second_coord) = pair[1];
		if first.intersects(second) {
			return StoreError::format(format!(
				"Chunks {first_coord} and {second_coord} overlap at sector {}.",
				second.sector_offset(),
			));
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::nbt::tag::{ListTag, Tag};
	use crate::ioext::Writable;
	use crate::{compound, ErrorKind};
	use rand::{Rng, SeedableRng, rngs::StdRng};

	fn chunk(x: i32, z: i32) -> NamedTag {
		NamedTag::new(compound! {
			("xPos", x),
			("zPos", z),
			("Level", compound! {
				("Width", 16i16),
				("Entities", ListTag::Compound(Vec::new())),
			}),
		})
	}

	fn write_region_file(world: &Path, bytes: &[u8]) {
		let path = region_path(world, 0, 0);
		fs::create_dir_all(path.parent().unwrap()).unwrap();
		fs::write(path, bytes).unwrap();
	}

	#[test]
	fn empty_slot_contract() {
		let dir = tempfile::tempdir().unwrap();
		let store = RegionStore::new(dir.path(), 1, -1).unwrap();
		let root = store.get_chunk((3, 7)).unwrap();
		assert_eq!(root, AirChunk.empty_chunk(35, -25));
		assert_eq!(store.get_chunk_timestamp((3, 7)), Timestamp::NEVER);
		assert!(!store.has_chunk((3, 7)));
		assert_eq!(store.chunk_count(), 0);
		assert!(!store.is_dirty());
		assert!(!store.path().exists());
	}

	#[test]
	fn round_trip_through_file() {
		let _ = env_logger::builder().is_test(true).try_init();
		let dir = tempfile::tempdir().unwrap();
		let mut store = RegionStore::new(dir.path(), 0, 0).unwrap();
		store.put_chunk(&chunk(3, 7), (3, 7)).unwrap();
		store.put_chunk_timestamped(&chunk(0, 0), (0, 0), Timestamp::from(1234u32)).unwrap();
		let stamp = store.get_chunk_timestamp((3, 7));
		assert!(!stamp.is_never());
		assert!(store.is_dirty());
		store.save().unwrap();
		assert!(!store.is_dirty());
		assert!(store.path().ends_with("region/r.0.0.mca"));

		let second = RegionStore::new(dir.path(), 0, 0).unwrap();
		assert_eq!(second.get_chunk((3, 7)).unwrap(), chunk(3, 7));
		assert_eq!(second.get_chunk_timestamp((3, 7)), stamp);
		assert_eq!(second.get_chunk_timestamp((0, 0)), Timestamp::from(1234u32));
		assert_eq!(second.chunks().collect::<Vec<_>>(), vec![RegionCoord::from((0, 0)), RegionCoord::from((3, 7))]);
		assert_eq!(second.chunk_data((3, 7)), store.chunk_data((3, 7)));
	}

	#[test]
	fn returned_chunk_is_a_copy() {
		let dir = tempfile::tempdir().unwrap();
		let mut store = RegionStore::new(dir.path(), 0, 0).unwrap();
		store.put_chunk(&chunk(1, 1), (1, 1)).unwrap();
		let mut copy = store.get_chunk((1, 1)).unwrap();
		copy.tag.set_tag("Level.Width", 32i16).unwrap();
		assert_eq!(store.get_chunk((1, 1)).unwrap().get_tag("Level.Width").unwrap(), &Tag::Short(16));
	}

	#[test]
	fn load_then_save_is_byte_identical() {
		let dir = tempfile::tempdir().unwrap();
		let mut rng = StdRng::seed_from_u64(7);
		let mut store = RegionStore::new(dir.path(), 0, 0).unwrap();
		for index in [0usize, 5, 31, 500, 1023] {
			let noise: Vec<i8> = (0..rng.gen_range(10..9000)).map(|_| rng.gen()).collect();
			let mut root = chunk(index as i32 % 32, index as i32 / 32);
			root.tag.set_tag("Noise", Tag::ByteArray(noise)).unwrap();
			store.put_chunk(&root, RegionCoord::from_index(index)).unwrap();
		}
		store.update_timestamp((9, 9));
		store.save().unwrap();
		let first = fs::read(store.path()).unwrap();
		assert_eq!(first.len() % 4096, 0);

		let mut reloaded = RegionStore::new(dir.path(), 0, 0).unwrap();
		assert_eq!(reloaded.chunk_count(), 5);
		assert!(!reloaded.get_chunk_timestamp((9, 9)).is_never());
		reloaded.save().unwrap();
		assert_eq!(fs::read(reloaded.path()).unwrap(), first);
	}

	#[test]
	fn update_timestamp_keeps_data() {
		let dir = tempfile::tempdir().unwrap();
		let mut store = RegionStore::new(dir.path(), 0, 0).unwrap();
		store.put_chunk_timestamped(&chunk(2, 2), (2, 2), Timestamp::from(10u32)).unwrap();
		let data = store.chunk_data((2, 2)).cloned();
		store.update_timestamp((2, 2));
		assert!(store.get_chunk_timestamp((2, 2)) > Timestamp::from(10u32));
		assert_eq!(store.chunk_data((2, 2)).cloned(), data);
	}

	#[test]
	fn put_rejects_bad_chunks() {
		let dir = tempfile::tempdir().unwrap();
		let options = RegionOptions::default()
			.sector_size(256)
			.scheme(CompressionScheme::Uncompressed);
		let mut store = RegionStore::with_options(dir.path(), 0, 0, options).unwrap();
		store.put_chunk(&chunk(4, 4), (4, 4)).unwrap();
		let before = store.chunk_data((4, 4)).cloned();

		let not_compound = NamedTag::new(Tag::Int(1));
		assert_eq!(store.put_chunk(&not_compound, (4, 4)).unwrap_err().kind(), ErrorKind::FormatError);

		let huge = NamedTag::new(compound! { ("Blocks", Tag::ByteArray(vec![0; 256 * 256])) });
		assert_eq!(store.put_chunk(&huge, (4, 4)).unwrap_err().kind(), ErrorKind::FormatError);
		assert_eq!(store.chunk_data((4, 4)).cloned(), before);
	}

	#[test]
	fn options_validation() {
		let dir = tempfile::tempdir().unwrap();
		for size in [0, 100, 128, 3000] {
			let options = RegionOptions::default().sector_size(size);
			let err = RegionStore::with_options(dir.path(), 0, 0, options).err().unwrap();
			assert_eq!(err.kind(), ErrorKind::OutOfRange);
		}
	}

	#[test]
	fn small_sector_layout() {
		let dir = tempfile::tempdir().unwrap();
		let options = RegionOptions::default()
			.sector_size(512)
			.scheme(CompressionScheme::GZip)
			.compression(Compression::best());
		let mut store = RegionStore::with_options(dir.path(), 0, 0, options).unwrap();
		store.put_chunk(&chunk(0, 1), (0, 1)).unwrap();
		store.save().unwrap();
		let file = fs::read(store.path()).unwrap();
		assert_eq!(file.len() % 512, 0);
		// Location of slot 32: sector 16, one sector long.
		assert_eq!(&file[128..132], &[0, 0, 16, 1]);
		// Scheme byte of the first chunk.
		assert_eq!(file[8196], 1);

		let reloaded = RegionStore::with_options(dir.path(), 0, 0, options).unwrap();
		assert_eq!(reloaded.get_chunk((0, 1)).unwrap(), chunk(0, 1));
	}

	#[test]
	fn delete_then_save() {
		let dir = tempfile::tempdir().unwrap();
		let mut store = RegionStore::new(dir.path(), 0, 0).unwrap();
		store.put_chunk(&chunk(1, 0), (1, 0)).unwrap();
		store.put_chunk(&chunk(2, 0), (2, 0)).unwrap();
		store.save().unwrap();
		assert!(store.delete_chunk((1, 0)));
		assert!(!store.delete_chunk((1, 0)));
		assert!(store.is_dirty());
		store.save().unwrap();

		let reloaded = RegionStore::new(dir.path(), 0, 0).unwrap();
		assert!(!reloaded.has_chunk((1, 0)));
		assert!(reloaded.get_chunk_timestamp((1, 0)).is_never());
		assert_eq!(reloaded.get_chunk((2, 0)).unwrap(), chunk(2, 0));
		assert_eq!(fs::metadata(reloaded.path()).unwrap().len(), 3 * 4096);
	}

	#[test]
	fn truncated_header() {
		let dir = tempfile::tempdir().unwrap();
		write_region_file(dir.path(), &[0u8; 100]);
		let err = RegionStore::new(dir.path(), 0, 0).err().unwrap();
		assert_eq!(err.kind(), ErrorKind::FormatError);
	}

	#[test]
	fn failed_load_keeps_slots() {
		let dir = tempfile::tempdir().unwrap();
		let mut store = RegionStore::new(dir.path(), 0, 0).unwrap();
		store.put_chunk(&chunk(5, 5), (5, 5)).unwrap();

		// A location that points into the header.
		let mut header = RegionHeader::default();
		header.sectors[(0u8, 0u8)] = RegionSector::new(1, 1);
		let mut file = Vec::new();
		header.write_to(&mut file).unwrap();
		file.resize(3 * 4096, 0);
		write_region_file(dir.path(), &file);

		assert_eq!(store.load().unwrap_err().kind(), ErrorKind::FormatError);
		assert!(store.has_chunk((5, 5)));
	}

	#[test]
	fn bad_payloads() {
		let dir = tempfile::tempdir().unwrap();
		let mut header = RegionHeader::default();
		header.sectors[(0u8, 0u8)] = RegionSector::new(2, 1);
		let mut file = Vec::new();
		header.write_to(&mut file).unwrap();
		// length 5, zlib, four bytes that are not a zlib stream.
		file.extend_from_slice(&[0, 0, 0, 5, 2, 0xFF, 0xFF, 0xFF, 0xFF]);
		file.resize(3 * 4096, 0);
		write_region_file(dir.path(), &file);
		let store = RegionStore::new(dir.path(), 0, 0).unwrap();
		assert_eq!(store.get_chunk((0, 0)).unwrap_err().kind(), ErrorKind::CompressionError);

		// Same payload with an unknown scheme byte.
		file[8196] = 7;
		write_region_file(dir.path(), &file);
		let err = RegionStore::new(dir.path(), 0, 0).err().unwrap();
		assert_eq!(err.kind(), ErrorKind::FormatError);

		// Location past the end of the file.
		file.truncate(8192);
		write_region_file(dir.path(), &file);
		let err = RegionStore::new(dir.path(), 0, 0).err().unwrap();
		assert_eq!(err.kind(), ErrorKind::FormatError);
	}

	/// A header whose locations are `sectors`, each pointing at a valid
	/// uncompressed chunk of one sector.
	fn file_with_locations(sectors: &[(usize, RegionSector)]) -> Vec<u8> {
		let mut header = RegionHeader::default();
		for &(index, sector) in sectors {
			header.sectors[RegionCoord::from_index(index)] = sector;
		}
		let mut file = Vec::new();
		header.write_to(&mut file).unwrap();
		let payload = ChunkData::encode(&chunk(0, 0), CompressionScheme::Uncompressed, Compression::default()).unwrap();
		for _ in 2..5 {
			let start = file.len();
			file.extend_from_slice(&(payload.length() as u32).to_be_bytes());
			file.push(CompressionScheme::Uncompressed as u8);
			file.extend_from_slice(&payload.bytes);
			file.resize(start + 4096, 0);
		}
		file
	}

	#[test]
	fn overlapping_locations() {
		let dir = tempfile::tempdir().unwrap();
		let disjoint = file_with_locations(&[(0, RegionSector::new(2, 1)), (1, RegionSector::new(3, 2))]);
		write_region_file(dir.path(), &disjoint);
		let store = RegionStore::new(dir.path(), 0, 0).unwrap();
		assert_eq!(store.get_chunk((0, 0)).unwrap(), chunk(0, 0));
		assert_eq!(store.chunk_count(), 2);

		let shared = file_with_locations(&[(0, RegionSector::new(2, 1)), (7, RegionSector::new(2, 1))]);
		write_region_file(dir.path(), &shared);
		let err = RegionStore::new(dir.path(), 0, 0).err().unwrap();
		assert_eq!(err.kind(), ErrorKind::FormatError);

		let partial = file_with_locations(&[(0, RegionSector::new(2, 2)), (1, RegionSector::new(3, 1))]);
		write_region_file(dir.path(), &partial);
		let err = RegionStore::new(dir.path(), 0, 0).err().unwrap();
		assert_eq!(err.kind(), ErrorKind::FormatError);
	}

	#[test]
	fn failed_save_keeps_previous_file() {
		let dir = tempfile::tempdir().unwrap();
		let mut store = RegionStore::new(dir.path(), 0, 0).unwrap();
		store.put_chunk(&chunk(1, 2), (1, 2)).unwrap();
		store.save().unwrap();
		let before = fs::read(store.path()).unwrap();

		store.put_chunk(&chunk(3, 3), (3, 3)).unwrap();
		// Too large for any location, so building the file fails.
		store.slots[0].data = Some(ChunkData::new(CompressionScheme::Uncompressed, vec![0; 4096 * 256]));
		assert_eq!(store.save().unwrap_err().kind(), ErrorKind::FormatError);
		assert!(store.is_dirty());
		assert_eq!(fs::read(store.path()).unwrap(), before);
		let entries = fs::read_dir(dir.path().join("region")).unwrap().count();
		assert_eq!(entries, 1);
	}

	#[test]
	fn save_writes_built_bytes() {
		let dir = tempfile::tempdir().unwrap();
		let mut store = RegionStore::new(dir.path(), 0, 0).unwrap();
		store.put_chunk(&chunk(0, 0), (0, 0)).unwrap();
		let bytes = store.to_bytes().unwrap();
		store.save().unwrap();
		assert_eq!(fs::read(store.path()).unwrap(), bytes);
	}

	struct MarkedChunk;

	impl EmptyChunk for MarkedChunk {
		fn empty_chunk(&self, chunk_x: i32, chunk_z: i32) -> NamedTag {
			NamedTag::new(compound! { ("Empty", 1i8), ("At", Tag::IntArray(vec![chunk_x, chunk_z])) })
		}
	}

	#[test]
	fn custom_empty_chunk() {
		let dir = tempfile::tempdir().unwrap();
		let store = RegionStore::with_empty_chunk(dir.path(), -1, 0, RegionOptions::default(), MarkedChunk).unwrap();
		let root = store.get_chunk((31, 2)).unwrap();
		assert_eq!(root.get_tag("At").unwrap(), &Tag::IntArray(vec![-1, 2]));
	}

	#[test]
	fn for_chunk_picks_region() {
		let dir = tempfile::tempdir().unwrap();
		let store = RegionStore::for_chunk(dir.path(), -1, 64).unwrap();
		assert_eq!((store.region_x(), store.region_z()), (-1, 2));
		assert!(store.path().ends_with("region/r.-1.2.mca"));
	}
}
