use crate::{
	ioext::*,
	StoreResult,
};

use super::sector::*;
use super::timestamp::*;
use super::coord::*;

use std::{
	io::{
		Read, Write,
	},
	ops::{
		Index, IndexMut,
	},
};

/// A table of 1024 elements, one for each slot of a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionTable<T>(Box<[T; 1024]>);

/// Where each chunk lives in the file.
pub type SectorTable = RegionTable<RegionSector>;

/// The last modification time of each chunk.
pub type TimestampTable = RegionTable<Timestamp>;

/// The header at the beginning of every region file.
/// It contains 1024 [RegionSector] elements followed by 1024 [Timestamp] elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionHeader {
	pub sectors: SectorTable,
	pub timestamps: TimestampTable,
}

impl<T> RegionTable<T> {
	pub fn iter(&self) -> std::slice::Iter<T> {
		self.0.iter()
	}

	pub fn iter_mut(&mut self) -> std::slice::IterMut<T> {
		self.0.iter_mut()
	}
}

impl<T: Default + Copy> Default for RegionTable<T> {
	fn default() -> Self {
		Self(Box::new([T::default(); 1024]))
	}
}

impl<C: Into<RegionCoord>, T> Index<C> for RegionTable<T> {
	type Output = T;

	fn index(&self, index: C) -> &Self::Output {
		let coord: RegionCoord = index.into();
		&self.0[coord.index()]
	}
}

impl<C: Into<RegionCoord>, T> IndexMut<C> for RegionTable<T> {
	fn index_mut(&mut self, index: C) -> &mut Self::Output {
		let coord: RegionCoord = index.into();
		&mut self.0[coord.index()]
	}
}

impl<T: Readable + Default + Copy> Readable for RegionTable<T> {
	fn read_from<R: Read>(reader: &mut R) -> StoreResult<Self> {
		let mut table = Self::default();
		for item in table.iter_mut() {
			*item = T::read_from(reader)?;
		}
		Ok(table)
	}
}

impl<T: Writable> Writable for RegionTable<T> {
	fn write_to<W: Write>(&self, writer: &mut W) -> StoreResult<usize> {
		let mut write_size: usize = 0;
		for item in self.iter() {
			write_size += item.write_to(writer)?;
		}
		Ok(write_size)
	}
}

impl Readable for RegionHeader {
	fn read_from<R: Read>(reader: &mut R) -> StoreResult<Self> {
		Ok(Self {
			sectors: SectorTable::read_from(reader)?,
			timestamps: TimestampTable::read_from(reader)?,
		})
	}
}

impl Writable for RegionHeader {
	fn write_to<W: Write>(&self, writer: &mut W) -> StoreResult<usize> {
		Ok(
			self.sectors.write_to(writer)? + self.timestamps.write_to(writer)?
		)
	}
}
