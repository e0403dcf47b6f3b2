use crate::compound;
use crate::nbt::tag::{NamedTag, Tag};

/// The number of blocks in one 16x16x16 section.
pub const SECTION_VOLUME: usize = 16 * 16 * 16;

/// Produces the tree returned for a chunk slot that holds no data.
pub trait EmptyChunk {
	/// `chunk_x` and `chunk_z` are absolute chunk coordinates.
	fn empty_chunk(&self, chunk_x: i32, chunk_z: i32) -> NamedTag;
}

/// A chunk of nothing but air:
/// `{ xPos: Int, zPos: Int, Blocks: ByteArray[4096] }`, all blocks `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AirChunk;

impl EmptyChunk for AirChunk {
	fn empty_chunk(&self, chunk_x: i32, chunk_z: i32) -> NamedTag {
		NamedTag::new(compound! {
			("xPos", chunk_x),
			("zPos", chunk_z),
			("Blocks", Tag::ByteArray(vec![0; SECTION_VOLUME])),
		})
	}
}
