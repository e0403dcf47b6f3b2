use crate::nbt::Map;
use crate::nbt::tag::{
	Tag,
	TagID,
	ListTag,
};

pub type Byte = i8;
pub type Short = i16;
pub type Int = i32;
pub type Long = i64;
pub type Float = f32;
pub type Double = f64;
pub type ByteArray = Vec<i8>;
pub type String = std::string::String;
pub type List = ListTag;
pub type Compound = Map;
pub type IntArray = Vec<i32>;

/// A Rust type that is the payload of exactly one tag type.
pub trait TagType: Sized {
	const ID: TagID;

	fn tag_id() -> TagID {
		Self::ID
	}

	/// Borrows the payload if `tag` is of this type.
	fn from_tag(tag: &Tag) -> Option<&Self>;

	fn from_tag_mut(tag: &mut Tag) -> Option<&mut Self>;
}

macro_rules! tagtype_impls {
	($($types:ty => $variant:ident;)+) => {
		$(
			impl TagType for $types {
				const ID: TagID = TagID::$variant;

				fn from_tag(tag: &Tag) -> Option<&Self> {
					match tag {
						Tag::$variant(value) => Some(value),
						_ => None,
					}
				}

				fn from_tag_mut(tag: &mut Tag) -> Option<&mut Self> {
					match tag {
						Tag::$variant(value) => Some(value),
						_ => None,
					}
				}
			}
		)+
	};
}

tagtype_impls!(
	Byte => Byte;
	Short => Short;
	Int => Int;
	Long => Long;
	Float => Float;
	Double => Double;
	ByteArray => ByteArray;
	String => String;
	List => List;
	Compound => Compound;
	IntArray => IntArray;
);

impl Tag {
	/// Borrows the payload as `T`, if the tag holds a `T`.
	pub fn as_type<T: TagType>(&self) -> Option<&T> {
		T::from_tag(self)
	}

	pub fn as_type_mut<T: TagType>(&mut self) -> Option<&mut T> {
		T::from_tag_mut(self)
	}
}
