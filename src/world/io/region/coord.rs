use crate::for_each_int_type;

/// A region file contains up to 1024 chunks, which is 32x32 chunks.
/// This struct represents a chunk coordinate within a region file.
/// The coordinate can be an absolute coordinate and it will be
/// normalized to relative coordinates.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct RegionCoord(u16);

impl RegionCoord {
	/// Create a new RegionCoord.
	/// The x and z will be mathematically transformed into relative coordinates.
	/// So if the coordinate given to `new()` is `(32, 32)`, the result will be
	/// `(0, 0)`. Negative chunk coordinates wrap the same way, so `-1` is `31`.
	pub fn new(x: u16, z: u16) -> Self {
		let xmod = x & 31;
		let zmod = z & 31;
		Self(xmod | zmod.overflowing_shl(5).0)
	}

	/// The coordinate stored at `index` in the region tables.
	pub fn from_index(index: usize) -> Self {
		Self((index & 1023) as u16)
	}

	/// Every slot of a region, in table order.
	pub fn all() -> impl Iterator<Item = RegionCoord> {
		(0..1024usize).map(RegionCoord::from_index)
	}

	pub fn index(&self) -> usize {
		self.0 as usize
	}

	pub fn x(&self) -> i32 {
		(self.0 & 31) as i32
	}

	pub fn z(&self) -> i32 {
		(self.0.overflowing_shr(5).0 & 31) as i32
	}

	/// The absolute chunk coordinate of this slot in the given region.
	/// Wraps for regions beyond the `i32` chunk range.
	pub fn chunk_coord(&self, region_x: i32, region_z: i32) -> (i32, i32) {
		(
			region_x.wrapping_mul(32).wrapping_add(self.x()),
			region_z.wrapping_mul(32).wrapping_add(self.z()),
		)
	}

	pub fn tuple<T>(self) -> (T, T)
	where
	(T, T): From<Self> {
		self.into()
	}
}

macro_rules! __regioncoord_impl {
	($type:ty) => {

		impl From<($type, $type)> for RegionCoord {
			fn from(value: ($type, $type)) -> Self {
				Self::new(value.0 as u16, value.1 as u16)
			}
		}

		impl From<RegionCoord> for ($type, $type) {
			fn from(value: RegionCoord) -> Self {
				(value.x() as $type, value.z() as $type)
			}
		}
	};
}

for_each_int_type!(__regioncoord_impl);

impl<T: Into<RegionCoord> + Copy> From<&T> for RegionCoord {
	fn from(value: &T) -> Self {
		T::into(*value)
	}
}

impl std::fmt::Display for RegionCoord {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "({}, {})", self.x(), self.z())
	}
}
