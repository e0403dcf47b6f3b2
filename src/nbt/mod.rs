//! The tag tree model and its binary format.

pub mod stream;
pub mod tag;
pub mod tagtype;
pub mod tagref;
pub mod tagpath;
pub mod io;
pub mod document;
pub mod macros;

/// The name-to-tag mapping of a Compound.
/// Names are kept sorted unless the `preserve_order` feature is enabled,
/// in which case insertion order is kept.
#[cfg(not(feature = "preserve_order"))]
pub type Map = std::collections::BTreeMap<String, tag::Tag>;

#[cfg(feature = "preserve_order")]
pub type Map = indexmap::IndexMap<String, tag::Tag>;

#[cfg(not(feature = "preserve_order"))]
pub(crate) fn map_remove(map: &mut Map, name: &str) -> Option<tag::Tag> {
	map.remove(name)
}

#[cfg(feature = "preserve_order")]
pub(crate) fn map_remove(map: &mut Map, name: &str) -> Option<tag::Tag> {
	map.shift_remove(name)
}

pub use document::{NbtDocument, DocumentOptions};
pub use io::{read_named_tag, write_named_tag, NbtRead, NbtWrite};
pub use stream::{ByteCursor, ByteRead, ByteWrite, WriteStream};
pub use tag::{ListTag, NamedTag, Tag, TagID};
pub use tagpath::TagPath;
pub use tagref::ValueRef;
pub use tagtype::TagType;
