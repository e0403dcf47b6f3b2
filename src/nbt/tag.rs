use std::fmt::Display;

use crate::nbt::Map;
use crate::{StoreError, StoreResult};

/// The closed set of tag type ids.
/// `End` only appears on the wire, where it terminates a Compound
/// (or marks the element type of an empty List).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum TagID {
	End = 0,
	Byte = 1,
	Short = 2,
	Int = 3,
	Long = 4,
	Float = 5,
	Double = 6,
	ByteArray = 7,
	String = 8,
	List = 9,
	Compound = 10,
	IntArray = 11,
}

impl TagID {
	pub fn title(self) -> &'static str {
		match self {
			TagID::End => "End",
			TagID::Byte => "Byte",
			TagID::Short => "Short",
			TagID::Int => "Int",
			TagID::Long => "Long",
			TagID::Float => "Float",
			TagID::Double => "Double",
			TagID::ByteArray => "ByteArray",
			TagID::String => "String",
			TagID::List => "List",
			TagID::Compound => "Compound",
			TagID::IntArray => "IntArray",
		}
	}
}

impl TryFrom<u8> for TagID {
	type Error = StoreError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		Ok(match value {
			0 => TagID::End,
			1 => TagID::Byte,
			2 => TagID::Short,
			3 => TagID::Int,
			4 => TagID::Long,
			5 => TagID::Float,
			6 => TagID::Double,
			7 => TagID::ByteArray,
			8 => TagID::String,
			9 => TagID::List,
			10 => TagID::Compound,
			11 => TagID::IntArray,
			unknown => return Err(StoreError::UnknownTagType(unknown)),
		})
	}
}

impl From<TagID> for u8 {
	fn from(value: TagID) -> Self {
		value as u8
	}
}

impl Display for TagID {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}({})", self.title(), *self as u8)
	}
}

/// One node of a tag tree. The name of a tag lives with its owner:
/// the key in the parent [Map], or [NamedTag::name] for a root.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
	Byte(i8),
	Short(i16),
	Int(i32),
	Long(i64),
	Float(f32),
	Double(f64),
	ByteArray(Vec<i8>),
	String(String),
	List(ListTag),
	Compound(Map),
	IntArray(Vec<i32>),
}

impl Tag {
	pub fn id(&self) -> TagID {
		match self {
			Tag::Byte(_) => TagID::Byte,
			Tag::Short(_) => TagID::Short,
			Tag::Int(_) => TagID::Int,
			Tag::Long(_) => TagID::Long,
			Tag::Float(_) => TagID::Float,
			Tag::Double(_) => TagID::Double,
			Tag::ByteArray(_) => TagID::ByteArray,
			Tag::String(_) => TagID::String,
			Tag::List(_) => TagID::List,
			Tag::Compound(_) => TagID::Compound,
			Tag::IntArray(_) => TagID::IntArray,
		}
	}

	/// Creates an empty Compound tag.
	pub fn compound() -> Self {
		Tag::Compound(Map::new())
	}

	pub fn as_compound(&self) -> Option<&Map> {
		match self {
			Tag::Compound(map) => Some(map),
			_ => None,
		}
	}

	pub fn as_compound_mut(&mut self) -> Option<&mut Map> {
		match self {
			Tag::Compound(map) => Some(map),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&ListTag> {
		match self {
			Tag::List(list) => Some(list),
			_ => None,
		}
	}

	/// Removes a child from a Compound by name.
	/// Returns `None` if this is not a Compound or the name is absent.
	pub fn remove(&mut self, name: &str) -> Option<Tag> {
		self.as_compound_mut().and_then(|map| crate::nbt::map_remove(map, name))
	}
}

/// The root of a tag tree: a tag and the name it was stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTag {
	pub name: String,
	pub tag: Tag,
}

impl NamedTag {
	pub fn new(tag: Tag) -> Self {
		Self {
			name: String::new(),
			tag,
		}
	}

	pub fn with_name<S: Into<String>>(name: S, tag: Tag) -> Self {
		Self {
			name: name.into(),
			tag,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn tag(&self) -> &Tag {
		&self.tag
	}

	pub fn tag_mut(&mut self) -> &mut Tag {
		&mut self.tag
	}

	pub fn take_tag(self) -> Tag {
		self.tag
	}
}

impl From<Tag> for NamedTag {
	fn from(value: Tag) -> Self {
		NamedTag::new(value)
	}
}

/// A homogeneous list. The variant is the element type, so an empty
/// list still knows what it was declared to hold.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ListTag {
	#[default]
	Empty,
	Byte(Vec<i8>),
	Short(Vec<i16>),
	Int(Vec<i32>),
	Long(Vec<i64>),
	Float(Vec<f32>),
	Double(Vec<f64>),
	ByteArray(Vec<Vec<i8>>),
	String(Vec<String>),
	List(Vec<ListTag>),
	Compound(Vec<Map>),
	IntArray(Vec<Vec<i32>>),
}

macro_rules! list_dispatch {
	($list:expr, $items:ident => $body:expr, Empty => $empty:expr) => {
		match $list {
			ListTag::Empty => $empty,
			ListTag::Byte($items) => $body,
			ListTag::Short($items) => $body,
			ListTag::Int($items) => $body,
			ListTag::Long($items) => $body,
			ListTag::Float($items) => $body,
			ListTag::Double($items) => $body,
			ListTag::ByteArray($items) => $body,
			ListTag::String($items) => $body,
			ListTag::List($items) => $body,
			ListTag::Compound($items) => $body,
			ListTag::IntArray($items) => $body,
		}
	};
}

pub(crate) use list_dispatch;

impl ListTag {
	/// Creates an empty list that is declared to hold `id` elements.
	pub fn empty_of(id: TagID) -> Self {
		match id {
			TagID::End => ListTag::Empty,
			TagID::Byte => ListTag::Byte(Vec::new()),
			TagID::Short => ListTag::Short(Vec::new()),
			TagID::Int => ListTag::Int(Vec::new()),
			TagID::Long => ListTag::Long(Vec::new()),
			TagID::Float => ListTag::Float(Vec::new()),
			TagID::Double => ListTag::Double(Vec::new()),
			TagID::ByteArray => ListTag::ByteArray(Vec::new()),
			TagID::String => ListTag::String(Vec::new()),
			TagID::List => ListTag::List(Vec::new()),
			TagID::Compound => ListTag::Compound(Vec::new()),
			TagID::IntArray => ListTag::IntArray(Vec::new()),
		}
	}

	/// The declared element type.
	pub fn element_id(&self) -> TagID {
		match self {
			ListTag::Empty => TagID::End,
			ListTag::Byte(_) => TagID::Byte,
			ListTag::Short(_) => TagID::Short,
			ListTag::Int(_) => TagID::Int,
			ListTag::Long(_) => TagID::Long,
			ListTag::Float(_) => TagID::Float,
			ListTag::Double(_) => TagID::Double,
			ListTag::ByteArray(_) => TagID::ByteArray,
			ListTag::String(_) => TagID::String,
			ListTag::List(_) => TagID::List,
			ListTag::Compound(_) => TagID::Compound,
			ListTag::IntArray(_) => TagID::IntArray,
		}
	}

	pub fn len(&self) -> usize {
		list_dispatch!(self, items => items.len(), Empty => 0)
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Appends a tag. An `Empty` list adopts the type of its first element;
	/// any other list fails with [StoreError::TypeMismatch] on a foreign type.
	pub fn push(&mut self, tag: Tag) -> StoreResult<()> {
		if let ListTag::Empty = self {
			*self = ListTag::empty_of(tag.id());
		}
		match (self, tag) {
			(ListTag::Byte(items), Tag::Byte(value)) => items.push(value),
			(ListTag::Short(items), Tag::Short(value)) => items.push(value),
			(ListTag::Int(items), Tag::Int(value)) => items.push(value),
			(ListTag::Long(items), Tag::Long(value)) => items.push(value),
			(ListTag::Float(items), Tag::Float(value)) => items.push(value),
			(ListTag::Double(items), Tag::Double(value)) => items.push(value),
			(ListTag::ByteArray(items), Tag::ByteArray(value)) => items.push(value),
			(ListTag::String(items), Tag::String(value)) => items.push(value),
			(ListTag::List(items), Tag::List(value)) => items.push(value),
			(ListTag::Compound(items), Tag::Compound(value)) => items.push(value),
			(ListTag::IntArray(items), Tag::IntArray(value)) => items.push(value),
			(list, tag) => return Err(StoreError::TypeMismatch {
				path: String::new(),
				expected: list.element_id(),
				found: tag.id(),
			}),
		}
		Ok(())
	}

	/// Removes the element at `index`. The list keeps its element type
	/// even when it becomes empty.
	pub fn remove(&mut self, index: usize) -> Option<Tag> {
		if index >= self.len() {
			return None;
		}
		Some(match self {
			ListTag::Empty => return None,
			ListTag::Byte(items) => Tag::Byte(items.remove(index)),
			ListTag::Short(items) => Tag::Short(items.remove(index)),
			ListTag::Int(items) => Tag::Int(items.remove(index)),
			ListTag::Long(items) => Tag::Long(items.remove(index)),
			ListTag::Float(items) => Tag::Float(items.remove(index)),
			ListTag::Double(items) => Tag::Double(items.remove(index)),
			ListTag::ByteArray(items) => Tag::ByteArray(items.remove(index)),
			ListTag::String(items) => Tag::String(items.remove(index)),
			ListTag::List(items) => Tag::List(items.remove(index)),
			ListTag::Compound(items) => Tag::Compound(items.remove(index)),
			ListTag::IntArray(items) => Tag::IntArray(items.remove(index)),
		})
	}
}

impl TryFrom<Vec<Tag>> for ListTag {
	type Error = StoreError;

	fn try_from(value: Vec<Tag>) -> Result<Self, Self::Error> {
		let mut list = ListTag::Empty;
		value.into_iter().try_for_each(|tag| list.push(tag))?;
		Ok(list)
	}
}

macro_rules! tag_from_impls {
	($($type:ty => $variant:ident;)+) => {
		$(
			impl From<$type> for Tag {
				fn from(value: $type) -> Self {
					Tag::$variant(value)
				}
			}

			impl From<Vec<$type>> for ListTag {
				fn from(value: Vec<$type>) -> Self {
					ListTag::$variant(value)
				}
			}
		)+
	};
}

tag_from_impls!(
	i8 => Byte;
	i16 => Short;
	i32 => Int;
	i64 => Long;
	f32 => Float;
	f64 => Double;
	Vec<i8> => ByteArray;
	String => String;
	ListTag => List;
	Map => Compound;
	Vec<i32> => IntArray;
);

impl From<&str> for Tag {
	fn from(value: &str) -> Self {
		Tag::String(value.to_owned())
	}
}

impl From<bool> for Tag {
	fn from(value: bool) -> Self {
		Tag::Byte(value as i8)
	}
}

impl From<Vec<&str>> for ListTag {
	fn from(value: Vec<&str>) -> Self {
		ListTag::String(value.into_iter().map(str::to_owned).collect())
	}
}
