//! The binary read/write protocol for tag trees.
//!
//! A named entry is `id:u8`, `name:string`, `payload`. A Compound payload
//! is a run of named entries closed by a single `0` byte. A List payload is
//! `element_id:u8`, `count:i32`, then `count` bare payloads.

use crate::nbt::Map;
use crate::nbt::stream::{ByteRead, ByteWrite};
use crate::nbt::tag::*;
use crate::{StoreError, StoreResult};

/// A payload that can be read once its type id is known.
pub trait NbtRead: Sized {
	fn nbt_read<S: ByteRead>(stream: &mut S) -> StoreResult<Self>;
}

/// A payload that can be written without its type id or name.
pub trait NbtWrite {
	fn nbt_write<S: ByteWrite>(&self, stream: &mut S) -> StoreResult<()>;
}

macro_rules! primitive_payload_impls {
	($($type:ty => $read:ident, $write:ident;)+) => {
		$(
			impl NbtRead for $type {
				fn nbt_read<S: ByteRead>(stream: &mut S) -> StoreResult<Self> {
					stream.$read()
				}
			}

			impl NbtWrite for $type {
				fn nbt_write<S: ByteWrite>(&self, stream: &mut S) -> StoreResult<()> {
					stream.$write(*self)
				}
			}
		)+
	};
}

primitive_payload_impls!(
	i8 => read_i8, write_i8;
	i16 => read_i16, write_i16;
	i32 => read_i32, write_i32;
	i64 => read_i64, write_i64;
	f32 => read_f32, write_f32;
	f64 => read_f64, write_f64;
);

/// Reads an `i32` length and rejects negative values.
fn read_length<S: ByteRead>(stream: &mut S) -> StoreResult<usize> {
	let length = stream.read_i32()?;
	if length < 0 {
		return StoreError::format(format!("Negative length: {length}"));
	}
	Ok(length as usize)
}

fn write_length<S: ByteWrite>(stream: &mut S, length: usize) -> StoreResult<()> {
	let length: i32 = length.try_into()
		.map_err(|_| StoreError::FormatError(format!("Length {length} does not fit an i32.")))?;
	stream.write_i32(length)
}

macro_rules! array_payload_impls {
	($($type:ty;)+) => {
		$(
			impl NbtRead for Vec<$type> {
				fn nbt_read<S: ByteRead>(stream: &mut S) -> StoreResult<Self> {
					let length = read_length(stream)?;
					let mut items = Vec::with_capacity(length.min(4096));
					for _ in 0..length {
						items.push(<$type>::nbt_read(stream)?);
					}
					Ok(items)
				}
			}

			impl NbtWrite for Vec<$type> {
				fn nbt_write<S: ByteWrite>(&self, stream: &mut S) -> StoreResult<()> {
					write_length(stream, self.len())?;
					self.iter().try_for_each(|item| item.nbt_write(stream))
				}
			}
		)+
	};
}

array_payload_impls!(
	i8;
	i32;
);

impl NbtRead for String {
	fn nbt_read<S: ByteRead>(stream: &mut S) -> StoreResult<Self> {
		stream.read_string()
	}
}

impl NbtWrite for String {
	fn nbt_write<S: ByteWrite>(&self, stream: &mut S) -> StoreResult<()> {
		stream.write_string(self)
	}
}

/// Compounds and Lists nested deeper than this are rejected.
pub const MAX_DEPTH: usize = 512;

fn check_depth(depth: usize) -> StoreResult<()> {
	if depth > MAX_DEPTH {
		return StoreError::format(format!("Tags nested deeper than {MAX_DEPTH} levels."));
	}
	Ok(())
}

fn read_compound<S: ByteRead>(stream: &mut S, depth: usize) -> StoreResult<Map> {
	check_depth(depth)?;
	let mut map = Map::new();
	while let Some(NamedTag { name, tag }) = read_entry_at(stream, depth)? {
		map.insert(name, tag);
	}
	Ok(map)
}

fn read_items<S: ByteRead, T>(
	stream: &mut S,
	length: usize,
	mut read: impl FnMut(&mut S) -> StoreResult<T>,
) -> StoreResult<Vec<T>> {
	let mut items = Vec::with_capacity(length.min(4096));
	for _ in 0..length {
		items.push(read(stream)?);
	}
	Ok(items)
}

fn read_list<S: ByteRead>(stream: &mut S, depth: usize) -> StoreResult<ListTag> {
	check_depth(depth)?;
	let element_id = TagID::try_from(stream.read_byte()?)?;
	let length = read_length(stream)?;
	Ok(match element_id {
		TagID::End if length == 0 => ListTag::Empty,
		TagID::End => return StoreError::format(format!("List of {length} End elements.")),
		TagID::Byte => ListTag::Byte(read_items(stream, length, i8::nbt_read)?),
		TagID::Short => ListTag::Short(read_items(stream, length, i16::nbt_read)?),
		TagID::Int => ListTag::Int(read_items(stream, length, i32::nbt_read)?),
		TagID::Long => ListTag::Long(read_items(stream, length, i64::nbt_read)?),
		TagID::Float => ListTag::Float(read_items(stream, length, f32::nbt_read)?),
		TagID::Double => ListTag::Double(read_items(stream, length, f64::nbt_read)?),
		TagID::ByteArray => ListTag::ByteArray(read_items(stream, length, Vec::<i8>::nbt_read)?),
		TagID::String => ListTag::String(read_items(stream, length, String::nbt_read)?),
		TagID::List => ListTag::List(read_items(stream, length, |stream| read_list(stream, depth + 1))?),
		TagID::Compound => ListTag::Compound(read_items(stream, length, |stream| read_compound(stream, depth + 1))?),
		TagID::IntArray => ListTag::IntArray(read_items(stream, length, Vec::<i32>::nbt_read)?),
	})
}

fn read_payload_at<S: ByteRead>(id: TagID, stream: &mut S, depth: usize) -> StoreResult<Tag> {
	Ok(match id {
		TagID::End => return StoreError::format("Expected a payload, found the End tag."),
		TagID::Byte => Tag::Byte(i8::nbt_read(stream)?),
		TagID::Short => Tag::Short(i16::nbt_read(stream)?),
		TagID::Int => Tag::Int(i32::nbt_read(stream)?),
		TagID::Long => Tag::Long(i64::nbt_read(stream)?),
		TagID::Float => Tag::Float(f32::nbt_read(stream)?),
		TagID::Double => Tag::Double(f64::nbt_read(stream)?),
		TagID::ByteArray => Tag::ByteArray(Vec::<i8>::nbt_read(stream)?),
		TagID::String => Tag::String(String::nbt_read(stream)?),
		TagID::List => Tag::List(read_list(stream, depth + 1)?),
		TagID::Compound => Tag::Compound(read_compound(stream, depth + 1)?),
		TagID::IntArray => Tag::IntArray(Vec::<i32>::nbt_read(stream)?),
	})
}

/// `depth` is the nesting level of the enclosing Compound.
fn read_entry_at<S: ByteRead>(stream: &mut S, depth: usize) -> StoreResult<Option<NamedTag>> {
	let id = TagID::try_from(stream.peek_byte()?)?;
	stream.read_byte()?;
	if id == TagID::End {
		return Ok(None);
	}
	let name = stream.read_string()?;
	let tag = read_payload_at(id, stream, depth)?;
	Ok(Some(NamedTag { name, tag }))
}

impl NbtRead for Map {
	fn nbt_read<S: ByteRead>(stream: &mut S) -> StoreResult<Self> {
		read_compound(stream, 0)
	}
}

impl NbtWrite for Map {
	fn nbt_write<S: ByteWrite>(&self, stream: &mut S) -> StoreResult<()> {
		for (name, tag) in self.iter() {
			write_named_tag(stream, tag, name)?;
		}
		stream.write_byte(TagID::End as u8)
	}
}

impl NbtRead for ListTag {
	fn nbt_read<S: ByteRead>(stream: &mut S) -> StoreResult<Self> {
		read_list(stream, 0)
	}
}

impl NbtWrite for ListTag {
	fn nbt_write<S: ByteWrite>(&self, stream: &mut S) -> StoreResult<()> {
		stream.write_byte(self.element_id() as u8)?;
		write_length(stream, self.len())?;
		list_dispatch!(self, items => items.iter().try_for_each(|item| item.nbt_write(stream)), Empty => Ok(()))
	}
}

impl Tag {
	/// Reads the payload of a tag whose type id has already been read.
	pub fn read_payload<S: ByteRead>(id: TagID, stream: &mut S) -> StoreResult<Tag> {
		read_payload_at(id, stream, 0)
	}

	/// Writes only the payload: no type id, no name.
	pub fn write_payload<S: ByteWrite>(&self, stream: &mut S) -> StoreResult<()> {
		self.nbt_write(stream)
	}
}

impl NbtWrite for Tag {
	fn nbt_write<S: ByteWrite>(&self, stream: &mut S) -> StoreResult<()> {
		match self {
			Tag::Byte(value) => value.nbt_write(stream),
			Tag::Short(value) => value.nbt_write(stream),
			Tag::Int(value) => value.nbt_write(stream),
			Tag::Long(value) => value.nbt_write(stream),
			Tag::Float(value) => value.nbt_write(stream),
			Tag::Double(value) => value.nbt_write(stream),
			Tag::ByteArray(value) => value.nbt_write(stream),
			Tag::String(value) => value.nbt_write(stream),
			Tag::List(value) => value.nbt_write(stream),
			Tag::Compound(value) => value.nbt_write(stream),
			Tag::IntArray(value) => value.nbt_write(stream),
		}
	}
}

/// Reads one named entry. Returns `None` when the entry is the End tag.
pub fn read_entry<S: ByteRead>(stream: &mut S) -> StoreResult<Option<NamedTag>> {
	read_entry_at(stream, 0)
}

/// Reads a root tag. An End tag in root position is a format error.
pub fn read_named_tag<S: ByteRead>(stream: &mut S) -> StoreResult<NamedTag> {
	match read_entry(stream)? {
		Some(root) => Ok(root),
		None => StoreError::format("Found the End tag where a root tag was expected."),
	}
}

/// Writes the type id, the name, then the payload.
pub fn write_named_tag<S: ByteWrite>(stream: &mut S, tag: &Tag, name: &str) -> StoreResult<()> {
	stream.write_byte(tag.id() as u8)?;
	stream.write_string(name)?;
	tag.nbt_write(stream)
}

impl NbtRead for NamedTag {
	fn nbt_read<S: ByteRead>(stream: &mut S) -> StoreResult<Self> {
		read_named_tag(stream)
	}
}

impl NbtWrite for NamedTag {
	fn nbt_write<S: ByteWrite>(&self, stream: &mut S) -> StoreResult<()> {
		write_named_tag(stream, &self.tag, &self.name)
	}
}
