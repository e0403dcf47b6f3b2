/*
A borrowed view of a value in a tag tree.
List elements are stored unboxed (a ListTag::Short holds a Vec<i16>, not
a Vec<Tag>), so a reference to an element cannot be a &Tag. ValueRef
gives elements and whole tags the same shape.
*/
use crate::nbt::tag::*;
use crate::nbt::tagtype::*;

/// Allows immutable access to a value within a tag hierarchy,
/// including the elements of a [ListTag].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueRef<'a> {
	Byte(&'a Byte),
	Short(&'a Short),
	Int(&'a Int),
	Long(&'a Long),
	Float(&'a Float),
	Double(&'a Double),
	ByteArray(&'a ByteArray),
	String(&'a String),
	List(&'a ListTag),
	Compound(&'a Compound),
	IntArray(&'a IntArray),
}

impl<'a> ValueRef<'a> {
	pub fn id(self) -> TagID {
		match self {
			ValueRef::Byte(_) => TagID::Byte,
			ValueRef::Short(_) => TagID::Short,
			ValueRef::Int(_) => TagID::Int,
			ValueRef::Long(_) => TagID::Long,
			ValueRef::Float(_) => TagID::Float,
			ValueRef::Double(_) => TagID::Double,
			ValueRef::ByteArray(_) => TagID::ByteArray,
			ValueRef::String(_) => TagID::String,
			ValueRef::List(_) => TagID::List,
			ValueRef::Compound(_) => TagID::Compound,
			ValueRef::IntArray(_) => TagID::IntArray,
		}
	}

	/// Clones the referenced value into an owned [Tag].
	pub fn to_tag(self) -> Tag {
		Tag::from(self)
	}
}

impl ListTag {
	/// Borrows the element at `index`.
	pub fn get(&self, index: usize) -> Option<ValueRef<'_>> {
		match self {
			ListTag::Empty => None,
			ListTag::Byte(items) => items.get(index).map(ValueRef::Byte),
			ListTag::Short(items) => items.get(index).map(ValueRef::Short),
			ListTag::Int(items) => items.get(index).map(ValueRef::Int),
			ListTag::Long(items) => items.get(index).map(ValueRef::Long),
			ListTag::Float(items) => items.get(index).map(ValueRef::Float),
			ListTag::Double(items) => items.get(index).map(ValueRef::Double),
			ListTag::ByteArray(items) => items.get(index).map(ValueRef::ByteArray),
			ListTag::String(items) => items.get(index).map(ValueRef::String),
			ListTag::List(items) => items.get(index).map(ValueRef::List),
			ListTag::Compound(items) => items.get(index).map(ValueRef::Compound),
			ListTag::IntArray(items) => items.get(index).map(ValueRef::IntArray),
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = ValueRef<'_>> + '_ {
		(0..self.len()).filter_map(move |index| self.get(index))
	}
}

impl<'a> From<&'a Tag> for ValueRef<'a> {
	fn from(value: &'a Tag) -> Self {
		match value {
			Tag::Byte(val) => ValueRef::Byte(val),
			Tag::Short(val) => ValueRef::Short(val),
			Tag::Int(val) => ValueRef::Int(val),
			Tag::Long(val) => ValueRef::Long(val),
			Tag::Float(val) => ValueRef::Float(val),
			Tag::Double(val) => ValueRef::Double(val),
			Tag::ByteArray(val) => ValueRef::ByteArray(val),
			Tag::String(val) => ValueRef::String(val),
			Tag::List(val) => ValueRef::List(val),
			Tag::Compound(val) => ValueRef::Compound(val),
			Tag::IntArray(val) => ValueRef::IntArray(val),
		}
	}
}

impl<'a> From<ValueRef<'a>> for Tag {
	fn from(value: ValueRef<'a>) -> Self {
		match value {
			ValueRef::Byte(val) => Tag::Byte(*val),
			ValueRef::Short(val) => Tag::Short(*val),
			ValueRef::Int(val) => Tag::Int(*val),
			ValueRef::Long(val) => Tag::Long(*val),
			ValueRef::Float(val) => Tag::Float(*val),
			ValueRef::Double(val) => Tag::Double(*val),
			ValueRef::ByteArray(val) => Tag::ByteArray(val.clone()),
			ValueRef::String(val) => Tag::String(val.clone()),
			ValueRef::List(val) => Tag::List(val.clone()),
			ValueRef::Compound(val) => Tag::Compound(val.clone()),
			ValueRef::IntArray(val) => Tag::IntArray(val.clone()),
		}
	}
}
