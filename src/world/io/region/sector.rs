use std::io::{Read, Write, SeekFrom};
use std::ops::Not;

use crate::ioext::*;
use crate::StoreResult;

/// Offset and size are packed together, the way they are stored in the
/// location table.
/// |Offset:3|Size:1|
/// Both are measured in sectors. The sector size is a property of the
/// region, so the byte helpers take it as an argument.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct RegionSector(u32);

impl RegionSector {
	/// Provide offset and size in sectors.
	pub fn new(offset: u32, size: u8) -> Self {
		Self(offset.overflowing_shl(8).0 | size as u32)
	}

	/// Creates a new empty RegionSector.
	pub const fn empty() -> Self {
		Self(0)
	}

	/// The sector offset.
	pub fn sector_offset(&self) -> u64 {
		self.0.overflowing_shr(8).0 as u64
	}

	/// The sector offset that marks the end of this sector and the start of
	/// the next.
	pub fn sector_end_offset(&self) -> u64 {
		self.sector_offset() + self.sector_count()
	}

	pub fn sector_count(&self) -> u64 {
		(self.0 & 0xFF) as u64
	}

	/// The offset in bytes that this sector begins at in the region file.
	pub fn offset(&self, sector_size: u64) -> u64 {
		self.sector_offset() * sector_size
	}

	/// The size in bytes that this sector occupies.
	pub fn size(&self, sector_size: u64) -> u64 {
		self.sector_count() * sector_size
	}

	pub fn seeker(&self, sector_size: u64) -> SeekFrom {
		SeekFrom::Start(self.offset(sector_size))
	}

	/// Determines if this is an "empty" sector.
	pub fn is_empty(&self) -> bool {
		self.0 == 0
	}

	/// Tests if two sectors intersect.
	pub fn intersects(self, rhs: Self) -> bool {
		(
			self.sector_end_offset() <= rhs.sector_offset()
			|| rhs.sector_end_offset() <= self.sector_offset()
		).not()
	}
}

impl From<RegionSector> for u32 {
	fn from(value: RegionSector) -> Self {
		value.0
	}
}

impl From<u32> for RegionSector {
	fn from(value: u32) -> Self {
		Self(value)
	}
}

impl Readable for RegionSector {
	fn read_from<R: Read>(reader: &mut R) -> StoreResult<Self> {
		Ok(Self(reader.read_value()?))
	}
}

impl Writable for RegionSector {
	fn write_to<W: Write>(&self, writer: &mut W) -> StoreResult<usize> {
		writer.write_value(self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn packing() {
		let sector = RegionSector::new(2, 3);
		assert_eq!(u32::from(sector), 0x0000_0203);
		assert_eq!(sector.sector_offset(), 2);
		assert_eq!(sector.sector_count(), 3);
		assert_eq!(sector.sector_end_offset(), 5);
		assert_eq!(sector.offset(4096), 8192);
		assert_eq!(sector.size(256), 768);
		assert_eq!(sector.seeker(4096), SeekFrom::Start(8192));
		assert!(RegionSector::empty().is_empty());
	}

	#[test]
	fn intersection() {
		let a = RegionSector::new(2, 2);
		assert!(a.intersects(RegionSector::new(3, 1)));
		assert!(!a.intersects(RegionSector::new(4, 1)));
		assert!(!RegionSector::new(0, 2).intersects(a));
	}

	#[test]
	fn big_endian_io() {
		let mut buf = Vec::new();
		RegionSector::new(2, 1).write_to(&mut buf).unwrap();
		assert_eq!(buf, [0, 0, 2, 1]);
		let read = RegionSector::read_from(&mut buf.as_slice()).unwrap();
		assert_eq!(read, RegionSector::new(2, 1));
	}
}
