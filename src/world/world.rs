use std::{
	collections::HashMap,
	fs,
	path::{Path, PathBuf},
};

use crate::nbt::{
	document::NbtDocument,
	tag::{NamedTag, Tag, TagID},
	map_remove,
};
use crate::{StoreError, StoreResult};

use super::io::region::{
	region_of,
	RegionOptions,
	RegionStore,
};

pub type CoordTup = (i32, i32);

/// The file under the world directory that holds named metadata.
pub const METADATA_FILE: &str = "metadata.dat";

struct OpenRegion {
	store: RegionStore,
	/// Unreleased loads per chunk. Chunks with no live load have no entry.
	loads: HashMap<CoordTup, usize>,
}

impl OpenRegion {
	fn references(&self) -> usize {
		self.loads.values().sum()
	}
}

/// Chunk access by absolute chunk coordinate, plus a Compound of named
/// metadata entries.
///
/// Regions are opened on first use and kept while any of their chunks
/// are loaded. Releasing the last chunk of a region saves it (if it
/// changed) and drops it, so there is never more than one live
/// [RegionStore] per region file.
pub struct WorldStore {
	world_path: PathBuf,
	options: RegionOptions,
	regions: HashMap<CoordTup, OpenRegion>,
	metadata: NamedTag,
	metadata_dirty: bool,
}

impl WorldStore {
	pub fn open<P: AsRef<Path>>(world_path: P) -> StoreResult<Self> {
		Self::with_options(world_path, RegionOptions::default())
	}

	/// Opens the world at `world_path`. `metadata.dat` is loaded if present.
	pub fn with_options<P: AsRef<Path>>(world_path: P, options: RegionOptions) -> StoreResult<Self> {
		options.validate()?;
		let world_path = world_path.as_ref().to_owned();
		let metadata_path = world_path.join(METADATA_FILE);
		let metadata = if metadata_path.is_file() {
			let root = NbtDocument::open(&metadata_path)?.read_root()?;
			if root.tag.id() != TagID::Compound {
				return StoreError::format(format!("Metadata root is {}, not a Compound.", root.tag.id()));
			}
			root
		} else {
			NamedTag::new(Tag::compound())
		};
		log::debug!("Opened world at {}", world_path.display());
		Ok(Self {
			world_path,
			options,
			regions: HashMap::new(),
			metadata,
			metadata_dirty: false,
		})
	}

	pub fn world_path(&self) -> &Path {
		&self.world_path
	}

	pub fn metadata_path(&self) -> PathBuf {
		self.world_path.join(METADATA_FILE)
	}

	/// The number of regions currently held open.
	pub fn open_regions(&self) -> usize {
		self.regions.len()
	}

	pub fn is_region_open(&self, region_x: i32, region_z: i32) -> bool {
		self.regions.contains_key(&(region_x, region_z))
	}

	/// The number of unreleased chunk loads in a region.
	pub fn references(&self, region_x: i32, region_z: i32) -> usize {
		self.regions.get(&(region_x, region_z))
			.map(OpenRegion::references)
			.unwrap_or(0)
	}

	/// The number of unreleased loads of one chunk.
	pub fn chunk_references(&self, chunk_x: i32, chunk_z: i32) -> usize {
		self.regions.get(&Self::region_key(chunk_x, chunk_z))
			.and_then(|region| region.loads.get(&(chunk_x, chunk_z)))
			.copied()
			.unwrap_or(0)
	}

	fn region_key(chunk_x: i32, chunk_z: i32) -> CoordTup {
		(region_of(chunk_x), region_of(chunk_z))
	}

	fn open_region(&mut self, key: CoordTup) -> StoreResult<&mut OpenRegion> {
		if !self.regions.contains_key(&key) {
			let store = RegionStore::with_options(&self.world_path, key.0, key.1, self.options)?;
			log::trace!("Opened region {key:?}");
			self.regions.insert(key, OpenRegion {
				store,
				loads: HashMap::new(),
			});
		}
		self.regions.get_mut(&key)
			.ok_or_else(|| StoreError::OutOfRange(format!("Region {key:?} is not open.")))
	}

	/// Loads a chunk and holds its region open until the chunk is released.
	pub fn load_chunk(&mut self, chunk_x: i32, chunk_z: i32) -> StoreResult<NamedTag> {
		let key = Self::region_key(chunk_x, chunk_z);
		let region = self.open_region(key)?;
		match region.store.get_chunk((chunk_x, chunk_z)) {
			Ok(chunk) => {
				*region.loads.entry((chunk_x, chunk_z)).or_insert(0) += 1;
				Ok(chunk)
			}
			Err(err) => {
				if region.loads.is_empty() {
					self.regions.remove(&key);
				}
				Err(err)
			}
		}
	}

	/// Stores a chunk. If its region is not held open by a load, the region
	/// is written out straight away.
	pub fn put_chunk(&mut self, chunk_x: i32, chunk_z: i32, root: &NamedTag) -> StoreResult<()> {
		let key = Self::region_key(chunk_x, chunk_z);
		let region = self.open_region(key)?;
		let result = region.store.put_chunk(root, (chunk_x, chunk_z));
		if region.loads.is_empty() {
			self.close_region(key)?;
		}
		result
	}

	/// Releases a chunk obtained from [WorldStore::load_chunk], storing
	/// `root` first if one is given. Releasing the last loaded chunk of a
	/// region saves and closes it.
	pub fn release_chunk(&mut self, chunk_x: i32, chunk_z: i32, root: Option<&NamedTag>) -> StoreResult<()> {
		let key = Self::region_key(chunk_x, chunk_z);
		let region = match self.regions.get_mut(&key) {
			Some(region) if region.loads.contains_key(&(chunk_x, chunk_z)) => region,
			_ => return Err(StoreError::OutOfRange(format!("Chunk ({chunk_x}, {chunk_z}) was not loaded."))),
		};
		if let Some(root) = root {
			region.store.put_chunk(root, (chunk_x, chunk_z))?;
		}
		if let Some(count) = region.loads.get_mut(&(chunk_x, chunk_z)) {
			*count -= 1;
			if *count == 0 {
				region.loads.remove(&(chunk_x, chunk_z));
			}
		}
		if region.loads.is_empty() {
			self.close_region(key)?;
		}
		Ok(())
	}

	/// Saves the region if it changed, then drops it.
	fn close_region(&mut self, key: CoordTup) -> StoreResult<()> {
		if let Some(region) = self.regions.get_mut(&key) {
			if region.store.is_dirty() {
				region.store.save()?;
			}
		}
		self.regions.remove(&key);
		log::trace!("Closed region {key:?}");
		Ok(())
	}

	pub fn get_metadata(&self, module: &str) -> Option<&Tag> {
		self.metadata.tag.as_compound()?.get(module)
	}

	/// Sets a named metadata entry. Returns the previous value.
	pub fn set_metadata<T: Into<Tag>>(&mut self, module: &str, value: T) -> Option<Tag> {
		self.metadata_dirty = true;
		self.metadata.tag.as_compound_mut()?.insert(module.to_owned(), value.into())
	}

	pub fn remove_metadata(&mut self, module: &str) -> Option<Tag> {
		let removed = map_remove(self.metadata.tag.as_compound_mut()?, module);
		if removed.is_some() {
			self.metadata_dirty = true;
		}
		removed
	}

	/// Writes the metadata to `metadata.dat`.
	pub fn save_metadata(&mut self) -> StoreResult<()> {
		fs::create_dir_all(&self.world_path)?;
		let mut document = NbtDocument::new();
		document.write_root(&self.metadata)?;
		document.save(self.metadata_path())?;
		self.metadata_dirty = false;
		Ok(())
	}

	/// Saves every changed region that is open, and the metadata if it changed.
	/// Regions stay open.
	pub fn flush(&mut self) -> StoreResult<()> {
		for region in self.regions.values_mut() {
			if region.store.is_dirty() {
				region.store.save()?;
			}
		}
		if self.metadata_dirty {
			self.save_metadata()?;
		}
		log::debug!("Flushed world at {}", self.world_path.display());
		Ok(())
	}
}
