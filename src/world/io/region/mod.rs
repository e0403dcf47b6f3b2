pub mod header;
pub mod sector;
pub mod timestamp;
pub mod coord;
pub mod reader;
pub mod writer;
pub mod compressionscheme;
pub mod chunkdata;
pub mod regionstore;

use std::path::{Path, PathBuf};

pub use compressionscheme::CompressionScheme;
pub use chunkdata::ChunkData;
pub use coord::RegionCoord;
pub use header::RegionHeader;
pub use regionstore::{ChunkSlot, RegionOptions, RegionStore};
pub use sector::RegionSector;
pub use timestamp::Timestamp;

/// The size in bytes of the offset table plus the timestamp table.
pub const HEADER_SIZE: u64 = 4096 * 2;

/// The conventional sector size.
pub const DEFAULT_SECTOR_SIZE: u64 = 4096;

/// The sector count of a location is a single byte.
pub const MAX_CHUNK_SECTORS: u64 = 255;

/// Tests if `n` is a multiple of `sector_size`, which must be a power of two.
pub const fn is_multiple(n: u64, sector_size: u64) -> bool {
	(n & (sector_size - 1)) == 0
}

/// Counts the number of sectors required to accomodate `size` bytes.
pub const fn required_sectors(size: u64, sector_size: u64) -> u64 {
	let sub = size / sector_size;
	// true => 1 | false => 0
	let overflow = !is_multiple(size, sector_size) as u64;
	sub + overflow
}

/// Returns the number of bytes required to add to `size` in order
/// to make it a multiple of `sector_size`.
pub const fn pad_size(size: u64, sector_size: u64) -> u64 {
	(sector_size - (size & (sector_size - 1))) & (sector_size - 1)
}

/// The first sector that may hold chunk data.
pub const fn first_data_sector(sector_size: u64) -> u64 {
	required_sectors(HEADER_SIZE, sector_size)
}

/// Converts a chunk coordinate to the coordinate of the region that holds it.
pub const fn region_of(chunk: i32) -> i32 {
	chunk >> 5
}

/// `<world>/region/r.<x>.<z>.mca`
pub fn region_path<P: AsRef<Path>>(world_path: P, region_x: i32, region_z: i32) -> PathBuf {
	world_path.as_ref()
		.join("region")
		.join(format!("r.{region_x}.{region_z}.mca"))
}
