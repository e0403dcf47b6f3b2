//! Extensions to `std::io` used by the region container code.

use std::io::{
	self,
	Read, Write,
	Seek, SeekFrom,
};

use byteorder::{
	BigEndian,
	ReadBytesExt,
	WriteBytesExt,
};

use crate::StoreResult;

/// A type that can be read from a big-endian binary stream.
pub trait Readable: Sized {
	fn read_from<R: Read>(reader: &mut R) -> StoreResult<Self>;
}

/// A type that can be written to a big-endian binary stream.
/// Returns the number of bytes written.
pub trait Writable {
	fn write_to<W: Write>(&self, writer: &mut W) -> StoreResult<usize>;
}

macro_rules! __primitive_io_impls {
	($($type:ty => $read:ident, $write:ident;)+) => {
		$(
			impl Readable for $type {
				fn read_from<R: Read>(reader: &mut R) -> StoreResult<Self> {
					Ok(reader.$read::<BigEndian>()?)
				}
			}

			impl Writable for $type {
				fn write_to<W: Write>(&self, writer: &mut W) -> StoreResult<usize> {
					writer.$write::<BigEndian>(*self)?;
					Ok(std::mem::size_of::<$type>())
				}
			}
		)+
	};
}

__primitive_io_impls!(
	u16 => read_u16, write_u16;
	u32 => read_u32, write_u32;
	i32 => read_i32, write_i32;
	u64 => read_u64, write_u64;
);

impl Readable for u8 {
	fn read_from<R: Read>(reader: &mut R) -> StoreResult<Self> {
		Ok(reader.read_u8()?)
	}
}

impl Writable for u8 {
	fn write_to<W: Write>(&self, writer: &mut W) -> StoreResult<usize> {
		writer.write_u8(*self)?;
		Ok(1)
	}
}

pub trait ReadExt {
	fn read_value<T: Readable>(&mut self) -> StoreResult<T>;
}

impl<R: Read> ReadExt for R {
	fn read_value<T: Readable>(&mut self) -> StoreResult<T> {
		T::read_from(self)
	}
}

pub trait WriteExt {
	fn write_value<T: Writable>(&mut self, value: T) -> StoreResult<usize>;
}

impl<W: Write> WriteExt for W {
	fn write_value<T: Writable>(&mut self, value: T) -> StoreResult<usize> {
		value.write_to(self)
	}
}

pub trait SeekExt {
	/// Returns a [SeekFrom] that returns the stream to its current position.
	fn seek_return(&mut self) -> io::Result<SeekFrom>;
}

impl<S: Seek> SeekExt for S {
	fn seek_return(&mut self) -> io::Result<SeekFrom> {
		Ok(SeekFrom::Start(self.stream_position()?))
	}
}

pub trait WriteZeroes {
	fn write_zeroes(&mut self, count: u64) -> io::Result<u64>;
}

impl<T: Write> WriteZeroes for T {
	fn write_zeroes(&mut self, count: u64) -> io::Result<u64> {
		const ZEROES: &'static [u8; 4096] = &[0u8; 4096];
		let mut remainder = count;
		while remainder >= ZEROES.len() as u64 {
			self.write_all(ZEROES)?;
			remainder -= ZEROES.len() as u64;
		}
		if remainder != 0 {
			self.write_all(&ZEROES[0..remainder as usize])?;
		}
		Ok(count)
	}
}
